//! Error types shared across the workspace.
//!
//! Every fallible adapter or pipeline operation returns [`Error`]; the
//! job layer flattens a terminal error into a [`JobError`] (kind plus
//! message) for listeners.

use thiserror::Error;

/// Workspace-wide error type.
///
/// Variants map one-to-one onto the operator-visible failure kinds; the
/// layer an error crosses annotates the message but never changes the
/// kind.
#[derive(Error, Debug)]
pub enum Error {
    /// Input file could not be opened or read at the I/O level.
    #[error("failed to open input: {0}")]
    OpenIo(String),

    /// Input container not recognized or malformed.
    #[error("unrecognized container format: {0}")]
    OpenFormat(String),

    /// No codec implementation available for a stream.
    #[error("codec unavailable: {0}")]
    CodecUnavailable(String),

    /// Decoder or encoder construction failed.
    #[error("codec initialization failed: {0}")]
    CodecInit(String),

    /// Packet read failed mid-stream.
    #[error("read error: {0}")]
    ReadIo(String),

    /// Decoder rejected a packet or produced an error.
    #[error("decoder error: {0}")]
    Decoder(String),

    /// Encoder rejected a frame or produced an error.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// Muxer write failed.
    #[error("writer error: {0}")]
    Writer(String),

    /// The job was cancelled cooperatively.
    #[error("cancelled")]
    Cancelled,

    /// Job configuration failed validation.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A codec/container/format combination is not supported.
    #[error("unsupported combination: {0}")]
    UnsupportedCombination(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The operator-visible kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OpenIo(_) | Error::Io(_) => ErrorKind::OpenIo,
            Error::OpenFormat(_) => ErrorKind::OpenFormat,
            Error::CodecUnavailable(_) => ErrorKind::CodecUnavailable,
            Error::CodecInit(_) => ErrorKind::CodecInit,
            Error::ReadIo(_) => ErrorKind::ReadIo,
            Error::Decoder(_) => ErrorKind::Decoder,
            Error::Encoder(_) => ErrorKind::Encoder,
            Error::Writer(_) => ErrorKind::Writer,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::ConfigInvalid(_) => ErrorKind::ConfigInvalid,
            Error::UnsupportedCombination(_) => ErrorKind::UnsupportedCombination,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Copyable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OpenIo,
    OpenFormat,
    CodecUnavailable,
    CodecInit,
    ReadIo,
    Decoder,
    Encoder,
    Writer,
    Cancelled,
    ConfigInvalid,
    UnsupportedCombination,
}

/// The error object handed to job listeners: one kind and one message
/// per failed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobError {
    pub kind: ErrorKind,
    pub message: String,
}

impl JobError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&Error> for JobError {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Result alias using the workspace error type.
pub type Result<T> = std::result::Result<T, Error>;
