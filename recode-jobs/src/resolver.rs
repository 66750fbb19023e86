//! Turning a job configuration into a concrete validated plan.

use crate::config::{JobConfig, ResolvedAudio, ResolvedJobConfig, ResolvedVideo};
use recode_core::{Error, PixelFormat, Result, VideoCodec};
use recode_codec::{CapabilityTable, StreamDescriptor};
use tracing::debug;

/// Replaces every `Keep::Source` sentinel with the corresponding input
/// property and validates the result against the capability table.
///
/// Resolution is idempotent: resolving the re-expressed output of a
/// previous resolution yields the same plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobConfigResolver {
    table: CapabilityTable,
}

impl JobConfigResolver {
    pub fn new(table: CapabilityTable) -> Self {
        Self { table }
    }

    /// Resolve `config` against the selected input streams. `video_in`
    /// and `audio_in` are the descriptors of the best video and audio
    /// streams, when the input has them.
    pub fn resolve(
        &self,
        config: &JobConfig,
        video_in: Option<&StreamDescriptor>,
        audio_in: Option<&StreamDescriptor>,
    ) -> Result<ResolvedJobConfig> {
        if config.video.is_none() && config.audio.is_none() {
            return Err(Error::ConfigInvalid(
                "job keeps neither video nor audio".into(),
            ));
        }
        if config.decode_threads == 0 || config.encode_threads == 0 {
            return Err(Error::ConfigInvalid("thread hints must be at least 1".into()));
        }

        let video = config
            .video
            .as_ref()
            .map(|v| self.resolve_video(config, v, video_in))
            .transpose()?;
        let audio = config
            .audio
            .as_ref()
            .map(|a| self.resolve_audio(config, a, audio_in))
            .transpose()?;

        debug!(?video, ?audio, "job configuration resolved");
        Ok(ResolvedJobConfig {
            container: config.container,
            video,
            audio,
            decode_threads: config.decode_threads,
            encode_threads: config.encode_threads,
            output_path: config.output_path.clone(),
        })
    }

    fn resolve_video(
        &self,
        config: &JobConfig,
        video: &crate::config::VideoJobConfig,
        input: Option<&StreamDescriptor>,
    ) -> Result<ResolvedVideo> {
        let info = input
            .and_then(|d| d.video.as_ref())
            .ok_or_else(|| Error::ConfigInvalid("input has no video stream".into()))?;

        if !self
            .table
            .supported_video_codecs(config.container)
            .contains(&video.codec)
        {
            return Err(Error::ConfigInvalid(format!(
                "{} cannot carry {} video",
                config.container, video.codec
            )));
        }
        if video.crf > 51 {
            return Err(Error::ConfigInvalid(format!(
                "crf {} outside 0..=51",
                video.crf
            )));
        }
        if !(video.fps > 0.0) {
            return Err(Error::ConfigInvalid(format!("fps {} not positive", video.fps)));
        }

        let (width, height) = video.dimensions.resolve((info.width, info.height));
        if width == 0 || height == 0 {
            return Err(Error::ConfigInvalid(format!(
                "invalid output dimensions {width}x{height}"
            )));
        }

        // MJPEG only encodes full-range 4:2:0; the sentinel must not
        // drag an incompatible source format in.
        let pixel_format = if video.codec == VideoCodec::Mjpeg {
            PixelFormat::Yuvj420p
        } else {
            video.pixel_format.resolve(info.pixel_format)
        };
        if !self
            .table
            .supported_pixel_formats(video.codec)
            .contains(&pixel_format)
        {
            return Err(Error::ConfigInvalid(format!(
                "{} does not encode {}",
                video.codec, pixel_format
            )));
        }

        Ok(ResolvedVideo {
            codec: video.codec,
            width,
            height,
            pixel_format,
            crf: video.crf,
            fps: video.fps,
        })
    }

    fn resolve_audio(
        &self,
        config: &JobConfig,
        audio: &crate::config::AudioJobConfig,
        input: Option<&StreamDescriptor>,
    ) -> Result<ResolvedAudio> {
        let info = input
            .and_then(|d| d.audio.as_ref())
            .ok_or_else(|| Error::ConfigInvalid("input has no audio stream".into()))?;

        if !self
            .table
            .supported_audio_codecs(config.container)
            .contains(&audio.codec)
        {
            return Err(Error::ConfigInvalid(format!(
                "{} cannot carry {} audio",
                config.container, audio.codec
            )));
        }

        let sample_rate = audio.sample_rate.resolve(info.sample_rate);
        if !self
            .table
            .supported_sample_rates(audio.codec)
            .contains(&sample_rate)
        {
            return Err(Error::ConfigInvalid(format!(
                "{} does not encode at {} Hz",
                audio.codec, sample_rate
            )));
        }

        let channel_layout = audio.channel_layout.resolve(info.channel_layout);
        if !self
            .table
            .supported_channel_layouts(audio.codec)
            .contains(&channel_layout)
        {
            return Err(Error::UnsupportedCombination(format!(
                "{} with {} layout",
                audio.codec, channel_layout
            )));
        }

        Ok(ResolvedAudio {
            codec: audio.codec,
            sample_rate,
            sample_format: audio.sample_format,
            channel_layout,
        })
    }
}
