//! Per-stream transcode pipelines.
//!
//! One pipeline owns everything between the demuxer and the muxer for
//! a single kept stream: the decoder, the scaler or resampler, the
//! encoder, and the timestamp mapper. The scheduler feeds packets in
//! and receives muxer-ready packets back; at end of input it walks the
//! pipeline through the flush phases one step at a time.

use crate::timestamp_map::TimestampMapper;
use recode_core::{Error, Frame, Packet, PixelFormat, Result, Timestamp};
use recode_codec::{
    AudioDecoder, AudioEncoder, CodecPoll, MediaBackend, Resampler, VideoDecoder, VideoEncoder,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Where a pipeline stands in the end-of-stream drain.
///
/// Phases advance monotonically; a pipeline that has left `Active`
/// never accepts another input packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPhase {
    Active,
    DecoderDrained,
    ResamplerDrained,
    EncoderDrained,
    Done,
}

/// Fallback block size for encoders that accept variable-sized input.
const VARIABLE_BLOCK_SAMPLES: usize = 1024;

/// Video path: decode → scale → encode on a frame-index grid.
///
/// Output frames live on a grid of `total_frames = round(duration *
/// fps)` slots; slot `i` carries the logical timestamp `i / fps`
/// seconds. Decoded frames fill slots in decode order and frames past
/// the end of the grid are dropped.
pub struct VideoPipeline {
    backend: Arc<dyn MediaBackend>,
    decoder: Box<dyn VideoDecoder>,
    encoder: Box<dyn VideoEncoder>,
    mapper: TimestampMapper,
    input_index: usize,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    fps: f64,
    total_frames: u64,
    frames_emitted: u64,
    phase: FlushPhase,
}

impl VideoPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend: Arc<dyn MediaBackend>,
        decoder: Box<dyn VideoDecoder>,
        encoder: Box<dyn VideoEncoder>,
        mapper: TimestampMapper,
        input_index: usize,
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        fps: f64,
        duration_seconds: f64,
    ) -> Self {
        let total_frames = ((duration_seconds * fps).round() as i64).max(1) as u64;
        debug!(
            input_index,
            width, height, fps, total_frames, "video pipeline ready"
        );
        Self {
            backend,
            decoder,
            encoder,
            mapper,
            input_index,
            width,
            height,
            pixel_format,
            fps,
            total_frames,
            frames_emitted: 0,
            phase: FlushPhase::Active,
        }
    }

    pub fn input_index(&self) -> usize {
        self.input_index
    }

    pub fn phase(&self) -> FlushPhase {
        self.phase
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    /// All grid slots are filled; further input packets carry nothing
    /// this pipeline wants.
    pub fn grid_complete(&self) -> bool {
        self.frames_emitted >= self.total_frames
    }

    /// Seconds of output media produced so far.
    pub fn media_time(&self) -> f64 {
        self.frames_emitted as f64 / self.fps
    }

    /// Fraction of the grid filled, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.frames_emitted as f64 / self.total_frames.max(1) as f64).min(1.0)
    }

    /// Feed one input packet; returns the muxer-ready packets this push
    /// produced. Packets for other streams are absorbed.
    pub fn push_packet(&mut self, packet: &Packet) -> Result<Vec<Packet>> {
        if self.phase != FlushPhase::Active {
            return Err(Error::Decoder(
                "video pipeline received a packet after end of input".into(),
            ));
        }
        if packet.stream_index != self.input_index {
            return Ok(Vec::new());
        }
        trace!(dts = packet.dts.value, "video packet in");

        self.decoder.send_packet(Some(packet))?;

        let mut out = Vec::new();
        self.drain_decoded(&mut out)?;
        Ok(out)
    }

    /// Advance one flush phase. `Ok(Some(..))` carries the packets the
    /// phase produced; `Ok(None)` means the pipeline is done.
    pub fn flush_step(&mut self) -> Result<Option<Vec<Packet>>> {
        match self.phase {
            FlushPhase::Active => {
                self.decoder.send_packet(None)?;
                let mut out = Vec::new();
                self.drain_decoded(&mut out)?;
                self.phase = FlushPhase::DecoderDrained;
                debug!(emitted = self.frames_emitted, "video decoder drained");
                Ok(Some(out))
            }
            FlushPhase::DecoderDrained | FlushPhase::ResamplerDrained => {
                self.encoder.send_frame(None)?;
                let mut out = Vec::new();
                self.drain_encoder(&mut out)?;
                self.phase = FlushPhase::EncoderDrained;
                Ok(Some(out))
            }
            FlushPhase::EncoderDrained => {
                self.phase = FlushPhase::Done;
                debug!(
                    emitted = self.frames_emitted,
                    total = self.total_frames,
                    "video pipeline done"
                );
                Ok(None)
            }
            FlushPhase::Done => Ok(None),
        }
    }

    /// Pull decoded frames and run each through scale → grid pts →
    /// encode.
    fn drain_decoded(&mut self, out: &mut Vec<Packet>) -> Result<()> {
        loop {
            match self.decoder.receive_frame()? {
                CodecPoll::Ready(frame) => self.encode_frame(&frame, out)?,
                CodecPoll::NeedsMore | CodecPoll::EndOfStream => return Ok(()),
            }
        }
    }

    fn encode_frame(&mut self, frame: &Frame, out: &mut Vec<Packet>) -> Result<()> {
        if self.grid_complete() {
            trace!("dropping frame past the output grid");
            return Ok(());
        }

        // Scale unconditionally; the scaler also normalises plane
        // alignment when formats and dimensions already match.
        let mut scaled = self
            .backend
            .scale_frame(frame, self.pixel_format, self.width, self.height)?;

        let tb = self.encoder.time_base();
        let seconds = self.frames_emitted as f64 / self.fps;
        scaled.pts = Timestamp::from_seconds(seconds, tb);
        self.frames_emitted += 1;

        self.encoder.send_frame(Some(&scaled))?;
        self.drain_encoder(out)
    }

    fn drain_encoder(&mut self, out: &mut Vec<Packet>) -> Result<()> {
        loop {
            match self.encoder.receive_packet()? {
                CodecPoll::Ready(mut packet) => {
                    self.mapper.finalize(&mut packet);
                    out.push(packet);
                }
                CodecPoll::NeedsMore | CodecPoll::EndOfStream => return Ok(()),
            }
        }
    }
}

/// Audio path: decode → resample → encode with sample-accurate pts.
///
/// Every block handed to the encoder carries `pts = sample_offset` in
/// the encoder's one-tick-per-sample base, and the offset advances by
/// the block size, so consecutive encoded frames are exactly
/// `frame_size` samples apart.
pub struct AudioPipeline {
    decoder: Box<dyn AudioDecoder>,
    resampler: Box<dyn Resampler>,
    encoder: Box<dyn AudioEncoder>,
    mapper: TimestampMapper,
    input_index: usize,
    out_rate: u32,
    block_samples: usize,
    sample_offset: i64,
    expected_samples: i64,
    phase: FlushPhase,
}

impl AudioPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        decoder: Box<dyn AudioDecoder>,
        resampler: Box<dyn Resampler>,
        encoder: Box<dyn AudioEncoder>,
        mapper: TimestampMapper,
        input_index: usize,
        out_rate: u32,
        duration_seconds: f64,
    ) -> Self {
        let frame_size = encoder.frame_size();
        let block_samples = if frame_size == 0 {
            VARIABLE_BLOCK_SAMPLES
        } else {
            frame_size
        };
        let expected_samples = (duration_seconds * out_rate as f64).round() as i64;
        debug!(
            input_index,
            out_rate, block_samples, expected_samples, "audio pipeline ready"
        );
        Self {
            decoder,
            resampler,
            encoder,
            mapper,
            input_index,
            out_rate,
            block_samples,
            sample_offset: 0,
            expected_samples,
            phase: FlushPhase::Active,
        }
    }

    pub fn input_index(&self) -> usize {
        self.input_index
    }

    pub fn phase(&self) -> FlushPhase {
        self.phase
    }

    pub fn sample_offset(&self) -> i64 {
        self.sample_offset
    }

    /// Seconds of output media produced so far.
    pub fn media_time(&self) -> f64 {
        self.sample_offset as f64 / self.out_rate as f64
    }

    /// Fraction of the expected sample count produced, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.sample_offset as f64 / self.expected_samples.max(1) as f64).min(1.0)
    }

    /// Feed one input packet; returns the muxer-ready packets this push
    /// produced. Packets for other streams are absorbed.
    pub fn push_packet(&mut self, packet: &Packet) -> Result<Vec<Packet>> {
        if self.phase != FlushPhase::Active {
            return Err(Error::Decoder(
                "audio pipeline received a packet after end of input".into(),
            ));
        }
        if packet.stream_index != self.input_index {
            return Ok(Vec::new());
        }
        trace!(dts = packet.dts.value, "audio packet in");

        self.decoder.send_packet(Some(packet))?;

        let mut out = Vec::new();
        self.drain_decoded(&mut out)?;
        Ok(out)
    }

    /// Advance one flush phase. `Ok(Some(..))` carries the packets the
    /// phase produced; `Ok(None)` means the pipeline is done.
    pub fn flush_step(&mut self) -> Result<Option<Vec<Packet>>> {
        match self.phase {
            FlushPhase::Active => {
                self.decoder.send_packet(None)?;
                let mut out = Vec::new();
                self.drain_decoded(&mut out)?;
                self.phase = FlushPhase::DecoderDrained;
                debug!(samples = self.sample_offset, "audio decoder drained");
                Ok(Some(out))
            }
            FlushPhase::DecoderDrained => {
                let mut out = Vec::new();
                self.resampler.push(None)?;
                self.drain_resampler(&mut out)?;

                // The drain may leave a final block shorter than the
                // encoder's frame size. It goes out with the current
                // sample offset, and the offset stays put: the frame is
                // short, and nothing follows it.
                if let Some(mut remainder) = self.resampler.pull_remainder()? {
                    let tb = self.encoder.time_base();
                    remainder.pts = Timestamp::new(self.sample_offset, tb);
                    debug!(
                        samples = remainder.num_samples(),
                        "encoding short remainder block"
                    );
                    self.encoder.send_block(Some(&remainder))?;
                    self.drain_encoder(&mut out)?;
                }
                self.phase = FlushPhase::ResamplerDrained;
                Ok(Some(out))
            }
            FlushPhase::ResamplerDrained => {
                self.encoder.send_block(None)?;
                let mut out = Vec::new();
                self.drain_encoder(&mut out)?;
                self.phase = FlushPhase::EncoderDrained;
                Ok(Some(out))
            }
            FlushPhase::EncoderDrained => {
                self.phase = FlushPhase::Done;
                debug!(samples = self.sample_offset, "audio pipeline done");
                Ok(None)
            }
            FlushPhase::Done => Ok(None),
        }
    }

    fn drain_decoded(&mut self, out: &mut Vec<Packet>) -> Result<()> {
        loop {
            match self.decoder.receive_block()? {
                CodecPoll::Ready(block) => {
                    self.resampler.push(Some(&block))?;
                    self.drain_resampler(out)?;
                }
                CodecPoll::NeedsMore | CodecPoll::EndOfStream => return Ok(()),
            }
        }
    }

    /// Pull full-sized blocks out of the resampler and encode them.
    fn drain_resampler(&mut self, out: &mut Vec<Packet>) -> Result<()> {
        loop {
            match self.resampler.pull_exact(self.block_samples)? {
                CodecPoll::Ready(mut block) => {
                    let tb = self.encoder.time_base();
                    block.pts = Timestamp::new(self.sample_offset, tb);
                    self.sample_offset += block.num_samples() as i64;
                    self.encoder.send_block(Some(&block))?;
                    self.drain_encoder(out)?;
                }
                CodecPoll::NeedsMore | CodecPoll::EndOfStream => return Ok(()),
            }
        }
    }

    fn drain_encoder(&mut self, out: &mut Vec<Packet>) -> Result<()> {
        loop {
            match self.encoder.receive_packet()? {
                CodecPoll::Ready(mut packet) => {
                    self.mapper.finalize(&mut packet);
                    out.push(packet);
                }
                CodecPoll::NeedsMore | CodecPoll::EndOfStream => return Ok(()),
            }
        }
    }
}
