//! # Recode
//!
//! A batch media transcoder core. Recode reads compressed audio/video
//! from container files, decodes to raw frames, optionally resamples
//! and rescales, re-encodes with caller-chosen codecs, and muxes the
//! result into a new container. It handles many files at once, with a
//! cap on parallel jobs and cooperative cancellation.
//!
//! Recode owns no codec implementations. A [`MediaBackend`]
//! implementation (an FFmpeg binding, a pure-Rust codec stack, a test
//! double) supplies readers, writers, decoders, encoders, the scaler
//! and the resampler; recode supplies everything above that seam: the
//! per-stream pipelines, the flush protocol, timestamp rebasing, job
//! configuration and the job queue.
//!
//! ## Example
//!
//! ```no_run
//! use recode::prelude::*;
//! use std::sync::Arc;
//!
//! fn transcode(backend: Arc<dyn MediaBackend>) {
//!     let config = JobConfig::new(ContainerFormat::Mp4, "out.mp4")
//!         .video(VideoJobConfig::new(VideoCodec::H264).crf(23))
//!         .audio(AudioJobConfig::new(AudioCodec::Aac));
//!
//!     let queue = JobQueue::new(backend, 2);
//!     let events = queue.events();
//!     queue.enqueue("input.mkv", config);
//!     queue.start();
//!
//!     for event in events.iter() {
//!         match event {
//!             JobEvent::Progress(id, p) => println!("{id}: {:.0}%", p * 100.0),
//!             JobEvent::Succeeded(id) => println!("{id}: done"),
//!             JobEvent::Failed(id, err) => println!("{id}: {err}"),
//!             _ => {}
//!         }
//!     }
//! }
//! ```

pub mod prelude;

pub use recode_core::{
    AudioCodec, ChannelLayout, ContainerFormat, Error, ErrorKind, JobError, PixelFormat,
    SampleFormat, VideoCodec,
};
pub use recode_codec::{CapabilityTable, EncoderParams, MediaBackend};
pub use recode_pipeline::{
    AudioPipeline, FlushPhase, InterleaveScheduler, TimestampMapper, VideoPipeline,
};
pub use recode_jobs::{
    AudioJobConfig, CancelToken, JobConfig, JobEvent, JobId, JobQueue, JobRunner, JobState,
    ProgressSink, VideoJobConfig,
};
