//! Stream descriptions reported by a reader.

use recode_core::{AudioCodec, ChannelLayout, PixelFormat, SampleFormat, TimeBase, VideoCodec};

/// Coarse classification of a container stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Other,
}

/// Everything a reader knows about one stream after probing.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    /// Index of the stream within its container.
    pub index: usize,
    pub kind: StreamKind,
    /// Time base of packet timestamps on this stream.
    pub time_base: TimeBase,
    /// Declared duration in seconds; zero when the container does not
    /// say.
    pub duration_seconds: f64,
    /// Video properties, present when `kind` is `Video`.
    pub video: Option<VideoStreamInfo>,
    /// Audio properties, present when `kind` is `Audio`.
    pub audio: Option<AudioStreamInfo>,
    /// Codec-private initialization data.
    pub extradata: Option<Vec<u8>>,
}

/// Video-specific stream properties.
#[derive(Debug, Clone, Copy)]
pub struct VideoStreamInfo {
    pub codec: VideoCodec,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    /// Nominal frame rate, frames per second.
    pub frame_rate: f64,
}

/// Audio-specific stream properties.
#[derive(Debug, Clone, Copy)]
pub struct AudioStreamInfo {
    pub codec: AudioCodec,
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channel_layout: ChannelLayout,
}

/// The three parameters a resampler converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channel_layout: ChannelLayout,
}

impl AudioSpec {
    pub fn new(sample_rate: u32, sample_format: SampleFormat, channel_layout: ChannelLayout) -> Self {
        Self {
            sample_rate,
            sample_format,
            channel_layout,
        }
    }
}

impl From<&AudioStreamInfo> for AudioSpec {
    fn from(info: &AudioStreamInfo) -> Self {
        Self {
            sample_rate: info.sample_rate,
            sample_format: info.sample_format,
            channel_layout: info.channel_layout,
        }
    }
}
