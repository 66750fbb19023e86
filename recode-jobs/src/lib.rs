//! # Recode Jobs
//!
//! The job layer of the batch transcoder: immutable per-job
//! configuration with "keep source" sentinels, the resolver that turns
//! it into a concrete validated plan, the single-threaded runner that
//! drives one file through the pipeline layer, and the queue that runs
//! many jobs with a cap on parallelism.

pub mod config;
pub mod queue;
pub mod resolver;
pub mod runner;

pub use config::{AudioJobConfig, JobConfig, Keep, ResolvedJobConfig, VideoJobConfig};
pub use queue::{JobEvent, JobId, JobQueue};
pub use resolver::JobConfigResolver;
pub use runner::{JobRunner, JobState, ProgressSink};

pub use recode_pipeline::CancelToken;
