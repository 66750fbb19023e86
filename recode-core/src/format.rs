//! Container and codec identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerFormat {
    /// ISO base media (MP4, M4V, M4A).
    Mp4,
    /// QuickTime movie.
    Mov,
    /// Matroska.
    Mkv,
    /// WebM (Matroska subset).
    WebM,
    /// Audio Video Interleave.
    Avi,
    /// Raw MP3 audio stream.
    Mp3,
    /// RIFF WAVE audio.
    Wav,
}

impl ContainerFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mov => "mov",
            Self::Mkv => "mkv",
            Self::WebM => "webm",
            Self::Avi => "avi",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    /// Whether the container can carry a video stream at all.
    pub fn supports_video(&self) -> bool {
        !matches!(self, Self::Mp3 | Self::Wav)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" | "m4v" | "m4a" => Some(Self::Mp4),
            "mov" => Some(Self::Mov),
            "mkv" => Some(Self::Mkv),
            "webm" => Some(Self::WebM),
            "avi" => Some(Self::Avi),
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mp4 => "MP4",
            Self::Mov => "QuickTime",
            Self::Mkv => "Matroska",
            Self::WebM => "WebM",
            Self::Avi => "AVI",
            Self::Mp3 => "MP3",
            Self::Wav => "WAV",
        };
        f.write_str(name)
    }
}

/// Video codec identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoCodec {
    H264,
    H265,
    Vp8,
    Vp9,
    Mjpeg,
    Png,
    ProRes,
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::H264 => "H.264",
            Self::H265 => "H.265",
            Self::Vp8 => "VP8",
            Self::Vp9 => "VP9",
            Self::Mjpeg => "MJPEG",
            Self::Png => "PNG",
            Self::ProRes => "ProRes",
        };
        f.write_str(name)
    }
}

/// Audio codec identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCodec {
    Aac,
    Opus,
    Mp3,
    Flac,
    PcmS16le,
    PcmS32le,
}

impl AudioCodec {
    pub fn is_lossless(&self) -> bool {
        matches!(self, Self::Flac | Self::PcmS16le | Self::PcmS32le)
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aac => "AAC",
            Self::Opus => "Opus",
            Self::Mp3 => "MP3",
            Self::Flac => "FLAC",
            Self::PcmS16le => "PCM S16LE",
            Self::PcmS32le => "PCM S32LE",
        };
        f.write_str(name)
    }
}
