//! Convenience re-exports for embedders.
//!
//! ```
//! use recode::prelude::*;
//! ```

pub use recode_core::{
    AudioCodec, ChannelLayout, ContainerFormat, Error, ErrorKind, Frame, JobError, Packet,
    PixelFormat, Rational, Result, Sample, SampleFormat, TimeBase, Timestamp, VideoCodec,
};

pub use recode_codec::{
    AudioSpec, CapabilityTable, CodecPoll, EncoderParams, MediaBackend, Reader, StreamDescriptor,
    StreamKind, Writer,
};

pub use recode_jobs::{
    AudioJobConfig, CancelToken, JobConfig, JobEvent, JobId, JobQueue, JobRunner, JobState, Keep,
    ProgressSink, ResolvedJobConfig, VideoJobConfig,
};
