//! # Recode Codec
//!
//! The contract the transcode core requires from a codec library.
//!
//! The core owns no codec implementations. Everything that touches
//! compressed bits (container probing, demuxing, decoding, scaling,
//! resampling, encoding, muxing) sits behind the object-safe traits in
//! [`backend`], and a concrete media backend (an FFmpeg binding, a
//! pure-Rust codec stack, a test double) supplies them. The traits are
//! deliberately poll-shaped: `send`/`receive` pairs with an explicit
//! end-of-stream drain, because the flush protocol at the end of a
//! stream depends on being able to push a null sentinel and pull until
//! the codec runs dry.

pub mod backend;
pub mod descriptor;
pub mod params;
pub mod support;

pub use backend::{
    AudioDecoder, AudioEncoder, CodecPoll, MediaBackend, Reader, Resampler, VideoDecoder,
    VideoEncoder, Writer,
};
pub use descriptor::{AudioSpec, AudioStreamInfo, StreamDescriptor, StreamKind, VideoStreamInfo};
pub use params::{video_time_base, AudioEncoderSettings, EncoderParams, VideoEncoderSettings};
pub use support::CapabilityTable;
