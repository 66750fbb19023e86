//! # Recode Core
//!
//! Foundation types for the recode batch transcoder.
//!
//! This crate holds the vocabulary shared by every layer of the
//! workspace:
//! - Error handling (`Error`, `ErrorKind`, `JobError`)
//! - Rational arithmetic and time bases
//! - Compressed units (`Packet`) and uncompressed units (`Frame`, `Sample`)
//! - Container and codec identifiers

pub mod error;
pub mod format;
pub mod frame;
pub mod packet;
pub mod rational;
pub mod sample;
pub mod time;

pub use error::{Error, ErrorKind, JobError, Result};
pub use format::{AudioCodec, ContainerFormat, VideoCodec};
pub use frame::{Frame, PixelFormat};
pub use packet::{Packet, PacketFlags};
pub use rational::Rational;
pub use sample::{ChannelLayout, Sample, SampleFormat};
pub use time::{TimeBase, Timestamp};
