//! Encoder construction parameters.
//!
//! One tagged union covers every codec the transcoder can target, and
//! two constructors apply the per-codec defaults. This replaces the
//! pattern of one specialised constructor per codec, each repeating the
//! same cleanup on failure.

use recode_core::{
    AudioCodec, ChannelLayout, PixelFormat, SampleFormat, TimeBase, VideoCodec,
};

/// Settings shared by every video encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoEncoderSettings {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub time_base: TimeBase,
    pub threads: u32,
}

/// Settings shared by every audio encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioEncoderSettings {
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channel_layout: ChannelLayout,
    pub time_base: TimeBase,
}

/// QP fallback used by HEVC encoders when rate control is
/// quality-driven.
const H265_GLOBAL_QUALITY: u32 = 75;

/// Everything a backend needs to construct one encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncoderParams {
    H264 {
        settings: VideoEncoderSettings,
        crf: u32,
    },
    H265 {
        settings: VideoEncoderSettings,
        crf: u32,
        /// Global quality QP handed to the encoder alongside CRF.
        global_quality: u32,
        /// Sample entry tag; `hvc1` keeps parameter sets in the
        /// container, which QuickTime players require.
        codec_tag: [u8; 4],
    },
    Vp8(VideoEncoderSettings),
    Vp9(VideoEncoderSettings),
    Mjpeg(VideoEncoderSettings),
    Png(VideoEncoderSettings),
    ProRes(VideoEncoderSettings),
    Aac(AudioEncoderSettings),
    Opus(AudioEncoderSettings),
    Mp3(AudioEncoderSettings),
    Flac(AudioEncoderSettings),
    PcmS16le(AudioEncoderSettings),
    PcmS32le(AudioEncoderSettings),
    Subtitle {
        time_base: TimeBase,
    },
}

/// The time base a video encoder should request: millisecond ticks,
/// unless the frame interval does not land on whole milliseconds (NTSC
/// rates), in which case the 90 kHz MPEG base is used.
pub fn video_time_base(fps: f64) -> TimeBase {
    let ticks = fps * 1000.0;
    if (ticks - ticks.round()).abs() < 1e-9 {
        TimeBase::MILLIS
    } else {
        TimeBase::MPEG
    }
}

impl EncoderParams {
    /// Build video encoder parameters for `codec`, applying per-codec
    /// defaults: MJPEG is forced to full-range 4:2:0, H.265 carries the
    /// quality QP and the `hvc1` tag.
    pub fn video(
        codec: VideoCodec,
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        fps: f64,
        crf: u32,
        threads: u32,
    ) -> Self {
        let pixel_format = match codec {
            VideoCodec::Mjpeg => PixelFormat::Yuvj420p,
            _ => pixel_format,
        };
        let settings = VideoEncoderSettings {
            width,
            height,
            pixel_format,
            time_base: video_time_base(fps),
            threads,
        };
        match codec {
            VideoCodec::H264 => Self::H264 { settings, crf },
            VideoCodec::H265 => Self::H265 {
                settings,
                crf,
                global_quality: H265_GLOBAL_QUALITY,
                codec_tag: *b"hvc1",
            },
            VideoCodec::Vp8 => Self::Vp8(settings),
            VideoCodec::Vp9 => Self::Vp9(settings),
            VideoCodec::Mjpeg => Self::Mjpeg(settings),
            VideoCodec::Png => Self::Png(settings),
            VideoCodec::ProRes => Self::ProRes(settings),
        }
    }

    /// Build audio encoder parameters; the time base is always one tick
    /// per sample.
    pub fn audio(
        codec: AudioCodec,
        sample_rate: u32,
        sample_format: SampleFormat,
        channel_layout: ChannelLayout,
    ) -> Self {
        let settings = AudioEncoderSettings {
            sample_rate,
            sample_format,
            channel_layout,
            time_base: TimeBase::per_sample(sample_rate),
        };
        match codec {
            AudioCodec::Aac => Self::Aac(settings),
            AudioCodec::Opus => Self::Opus(settings),
            AudioCodec::Mp3 => Self::Mp3(settings),
            AudioCodec::Flac => Self::Flac(settings),
            AudioCodec::PcmS16le => Self::PcmS16le(settings),
            AudioCodec::PcmS32le => Self::PcmS32le(settings),
        }
    }

    /// The time base the encoder will be asked to stamp packets in.
    pub fn time_base(&self) -> TimeBase {
        match self {
            Self::H264 { settings, .. } | Self::H265 { settings, .. } => settings.time_base,
            Self::Vp8(s) | Self::Vp9(s) | Self::Mjpeg(s) | Self::Png(s) | Self::ProRes(s) => {
                s.time_base
            }
            Self::Aac(s) | Self::Opus(s) | Self::Mp3(s) | Self::Flac(s) | Self::PcmS16le(s)
            | Self::PcmS32le(s) => s.time_base,
            Self::Subtitle { time_base } => *time_base,
        }
    }

    /// Video settings when this is a video variant.
    pub fn video_settings(&self) -> Option<&VideoEncoderSettings> {
        match self {
            Self::H264 { settings, .. } | Self::H265 { settings, .. } => Some(settings),
            Self::Vp8(s) | Self::Vp9(s) | Self::Mjpeg(s) | Self::Png(s) | Self::ProRes(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    /// Audio settings when this is an audio variant.
    pub fn audio_settings(&self) -> Option<&AudioEncoderSettings> {
        match self {
            Self::Aac(s) | Self::Opus(s) | Self::Mp3(s) | Self::Flac(s) | Self::PcmS16le(s)
            | Self::PcmS32le(s) => Some(s),
            _ => None,
        }
    }
}
