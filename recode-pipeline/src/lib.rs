//! # Recode Pipeline
//!
//! The transcode data path for one job: per-stream pipelines that
//! carry packets through decode → (scale | resample) → encode, the
//! timestamp mapper that rebases encoder output onto the muxer's
//! clocks, and the scheduler that interleaves streams in half-second
//! bursts so neither side buffers unboundedly.

pub mod cancel;
pub mod scheduler;
pub mod stream;
pub mod timestamp_map;

pub use cancel::CancelToken;
pub use scheduler::{InterleaveScheduler, BURST_SECONDS};
pub use stream::{AudioPipeline, FlushPhase, VideoPipeline};
pub use timestamp_map::TimestampMapper;
