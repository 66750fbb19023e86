//! Object-safe traits a media backend implements.
//!
//! The send/receive protocol mirrors what every mainstream codec API
//! exposes: submit input (or a null sentinel to begin draining), then
//! pull output until the codec reports it needs more input or has
//! reached end of stream. The core never catches panics; all failures
//! travel as typed errors.

use crate::descriptor::{AudioSpec, StreamDescriptor, StreamKind};
use crate::params::EncoderParams;
use crate::support::CapabilityTable;
use recode_core::{ContainerFormat, Frame, Packet, PixelFormat, Result, Sample, TimeBase};
use std::path::Path;

/// Result of polling a codec for output.
#[derive(Debug)]
pub enum CodecPoll<T> {
    /// One unit of output.
    Ready(T),
    /// The codec needs more input before it can produce output.
    NeedsMore,
    /// The codec has been drained; no further output will appear.
    EndOfStream,
}

impl<T> CodecPoll<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, CodecPoll::Ready(_))
    }
}

/// Demuxer handle for one open container.
///
/// Implementations must normalise packet timestamps so that the first
/// packet of a stream has `pts` 0 whenever the container declares a
/// start time; the core relies on this and does not re-base input
/// timestamps itself.
pub trait Reader: Send {
    /// Streams discovered while probing, in container order.
    fn streams(&self) -> &[StreamDescriptor];

    /// The preferred stream of a kind, typically the default track.
    fn best_stream(&self, kind: StreamKind) -> Option<usize> {
        self.streams().iter().find(|s| s.kind == kind).map(|s| s.index)
    }

    /// The next packet in container order, or `None` at end of stream.
    fn read_packet(&mut self) -> Result<Option<Packet>>;

    /// Seek backward to at latest `pts` (in the stream's time base).
    fn seek(&mut self, stream_index: usize, pts: i64) -> Result<()>;
}

/// Muxer handle for one output container.
///
/// The call sequence is fixed: all `add_stream` calls, then
/// `write_header`, then packets, then `write_trailer` exactly once.
pub trait Writer: Send {
    /// Register an output stream. The muxer may veto the requested
    /// time base; the returned base is authoritative and every packet
    /// written to this stream must already be expressed in it.
    fn add_stream(&mut self, params: &EncoderParams, requested: TimeBase)
        -> Result<(usize, TimeBase)>;

    /// The actual time base of a registered stream.
    fn time_base(&self, stream_index: usize) -> TimeBase;

    fn write_header(&mut self) -> Result<()>;

    fn write_packet(&mut self, packet: Packet) -> Result<()>;

    fn write_trailer(&mut self) -> Result<()>;
}

/// Video decoder for one stream.
pub trait VideoDecoder: Send {
    /// Submit a packet, or `None` to signal end of input and begin the
    /// drain.
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()>;

    /// Pull the next decoded frame.
    fn receive_frame(&mut self) -> Result<CodecPoll<Frame>>;
}

/// Audio decoder for one stream.
pub trait AudioDecoder: Send {
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()>;

    /// Pull the next decoded sample block.
    fn receive_block(&mut self) -> Result<CodecPoll<Sample>>;
}

/// Video encoder for one output stream.
pub trait VideoEncoder: Send {
    /// Time base the encoder stamps output packets in.
    fn time_base(&self) -> TimeBase;

    /// Submit a frame, or `None` to signal end of input.
    fn send_frame(&mut self, frame: Option<&Frame>) -> Result<()>;

    fn receive_packet(&mut self) -> Result<CodecPoll<Packet>>;
}

/// Audio encoder for one output stream.
pub trait AudioEncoder: Send {
    fn time_base(&self) -> TimeBase;

    /// Samples per input block the encoder requires, or 0 when it
    /// accepts variable-sized blocks.
    fn frame_size(&self) -> usize;

    /// Submit a sample block, or `None` to signal end of input.
    fn send_block(&mut self, block: Option<&Sample>) -> Result<()>;

    fn receive_packet(&mut self) -> Result<CodecPoll<Packet>>;
}

/// Audio resampler converting between two [`AudioSpec`]s.
pub trait Resampler: Send {
    /// Feed a sample block, or `None` to signal end of input.
    fn push(&mut self, block: Option<&Sample>) -> Result<()>;

    /// Pull exactly `num_samples` converted samples. `NeedsMore` when
    /// the internal buffer holds fewer (and input has not ended);
    /// `EndOfStream` once the drained buffer cannot fill a block.
    fn pull_exact(&mut self, num_samples: usize) -> Result<CodecPoll<Sample>>;

    /// After the drain, the final short block of fewer than
    /// `num_samples` samples, if any. May be called once.
    fn pull_remainder(&mut self) -> Result<Option<Sample>>;
}

/// Factory for every codec-library primitive the core needs.
///
/// One backend instance is shared read-only across jobs; the handles it
/// opens are owned by a single job worker and never cross threads.
pub trait MediaBackend: Send + Sync {
    fn open_reader(&self, path: &Path) -> Result<Box<dyn Reader>>;

    fn open_writer(&self, path: &Path, format: ContainerFormat) -> Result<Box<dyn Writer>>;

    fn open_video_decoder(
        &self,
        stream: &StreamDescriptor,
        threads: u32,
    ) -> Result<Box<dyn VideoDecoder>>;

    fn open_audio_decoder(
        &self,
        stream: &StreamDescriptor,
        threads: u32,
    ) -> Result<Box<dyn AudioDecoder>>;

    fn open_video_encoder(&self, params: &EncoderParams) -> Result<Box<dyn VideoEncoder>>;

    fn open_audio_encoder(&self, params: &EncoderParams) -> Result<Box<dyn AudioEncoder>>;

    fn open_resampler(&self, src: AudioSpec, dst: AudioSpec) -> Result<Box<dyn Resampler>>;

    /// Convert a frame to the given format and dimensions. Called even
    /// for identity conversions; the scaler normalises plane alignment.
    fn scale_frame(
        &self,
        frame: &Frame,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Frame>;

    /// The static support matrix used for configuration validation.
    fn capabilities(&self) -> &CapabilityTable;
}
