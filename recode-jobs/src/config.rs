//! Job configuration.
//!
//! A [`JobConfig`] is the immutable policy for one transcoding job.
//! Fields that may track the input ("keep the source pixel format")
//! use the [`Keep`] sentinel; the resolver replaces every sentinel with
//! a concrete value before any pipeline is built.

use recode_core::{
    AudioCodec, ChannelLayout, ContainerFormat, PixelFormat, SampleFormat, VideoCodec,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Either "copy this property from the input stream" or an explicit
/// value. One sum type covers every keep-source field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Keep<T> {
    /// Take the value from the input stream.
    Source,
    /// Use this value.
    Value(T),
}

impl<T: Copy> Keep<T> {
    /// The explicit value, or `source` when keeping.
    pub fn resolve(self, source: T) -> T {
        match self {
            Keep::Source => source,
            Keep::Value(v) => v,
        }
    }
}

impl<T> From<T> for Keep<T> {
    fn from(value: T) -> Self {
        Keep::Value(value)
    }
}

/// Policy for one transcoding job. Consumed read-only after the
/// resolver has validated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Output container.
    pub container: ContainerFormat,
    /// Video policy; `None` drops the video stream entirely.
    pub video: Option<VideoJobConfig>,
    /// Audio policy; `None` drops the audio stream entirely.
    pub audio: Option<AudioJobConfig>,
    /// Thread hint handed to decoders.
    pub decode_threads: u32,
    /// Thread hint handed to encoders.
    pub encode_threads: u32,
    /// Fully resolved output path; templating happens in the caller.
    pub output_path: PathBuf,
}

impl JobConfig {
    pub fn new(container: ContainerFormat, output_path: impl Into<PathBuf>) -> Self {
        Self {
            container,
            video: None,
            audio: None,
            decode_threads: 2,
            encode_threads: 2,
            output_path: output_path.into(),
        }
    }

    #[must_use]
    pub fn video(mut self, video: VideoJobConfig) -> Self {
        self.video = Some(video);
        self
    }

    #[must_use]
    pub fn audio(mut self, audio: AudioJobConfig) -> Self {
        self.audio = Some(audio);
        self
    }

    #[must_use]
    pub fn threads(mut self, decode: u32, encode: u32) -> Self {
        self.decode_threads = decode;
        self.encode_threads = encode;
        self
    }
}

/// Video side of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoJobConfig {
    pub codec: VideoCodec,
    /// Output width and height.
    pub dimensions: Keep<(u32, u32)>,
    pub pixel_format: Keep<PixelFormat>,
    /// Constant rate factor, 0..=51.
    pub crf: u32,
    /// Output frame rate driving the frame grid.
    pub fps: f64,
}

impl VideoJobConfig {
    pub fn new(codec: VideoCodec) -> Self {
        Self {
            codec,
            dimensions: Keep::Source,
            pixel_format: Keep::Source,
            crf: 23,
            fps: 30.0,
        }
    }

    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Keep::Value((width, height));
        self
    }

    #[must_use]
    pub fn pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = Keep::Value(format);
        self
    }

    #[must_use]
    pub fn crf(mut self, crf: u32) -> Self {
        self.crf = crf;
        self
    }

    #[must_use]
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }
}

/// Audio side of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioJobConfig {
    pub codec: AudioCodec,
    pub sample_rate: Keep<u32>,
    pub sample_format: SampleFormat,
    pub channel_layout: Keep<ChannelLayout>,
}

impl AudioJobConfig {
    pub fn new(codec: AudioCodec) -> Self {
        Self {
            codec,
            sample_rate: Keep::Source,
            sample_format: SampleFormat::F32p,
            channel_layout: Keep::Source,
        }
    }

    #[must_use]
    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = Keep::Value(rate);
        self
    }

    #[must_use]
    pub fn channel_layout(mut self, layout: ChannelLayout) -> Self {
        self.channel_layout = Keep::Value(layout);
        self
    }

    #[must_use]
    pub fn sample_format(mut self, format: SampleFormat) -> Self {
        self.sample_format = format;
        self
    }
}

/// A fully concrete, validated job plan. Contains no sentinels.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJobConfig {
    pub container: ContainerFormat,
    pub video: Option<ResolvedVideo>,
    pub audio: Option<ResolvedAudio>,
    pub decode_threads: u32,
    pub encode_threads: u32,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVideo {
    pub codec: VideoCodec,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub crf: u32,
    pub fps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAudio {
    pub codec: AudioCodec,
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channel_layout: ChannelLayout,
}

impl ResolvedJobConfig {
    /// Re-express this plan as a config with every field explicit.
    /// Resolving the result yields this plan again.
    pub fn to_config(&self) -> JobConfig {
        JobConfig {
            container: self.container,
            video: self.video.map(|v| VideoJobConfig {
                codec: v.codec,
                dimensions: Keep::Value((v.width, v.height)),
                pixel_format: Keep::Value(v.pixel_format),
                crf: v.crf,
                fps: v.fps,
            }),
            audio: self.audio.map(|a| AudioJobConfig {
                codec: a.codec,
                sample_rate: Keep::Value(a.sample_rate),
                sample_format: a.sample_format,
                channel_layout: Keep::Value(a.channel_layout),
            }),
            decode_threads: self.decode_threads,
            encode_threads: self.encode_threads,
            output_path: self.output_path.clone(),
        }
    }
}
