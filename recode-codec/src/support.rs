//! Static codec/container capability matrix.
//!
//! The resolver validates every job configuration against these
//! queries before a single handle is opened. The matrix is the
//! conservative intersection of what common muxers actually accept,
//! not what they merely tolerate.

use recode_core::{AudioCodec, ChannelLayout, ContainerFormat, PixelFormat, VideoCodec};

/// Read-only support table shared freely across jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityTable;

impl CapabilityTable {
    pub fn supported_containers(&self) -> &'static [ContainerFormat] {
        &[
            ContainerFormat::Mp4,
            ContainerFormat::Mov,
            ContainerFormat::Mkv,
            ContainerFormat::WebM,
            ContainerFormat::Avi,
            ContainerFormat::Mp3,
            ContainerFormat::Wav,
        ]
    }

    pub fn supported_video_codecs(&self, container: ContainerFormat) -> &'static [VideoCodec] {
        match container {
            ContainerFormat::Mp4 => &[VideoCodec::H264, VideoCodec::H265, VideoCodec::Mjpeg],
            ContainerFormat::Mov => &[
                VideoCodec::H264,
                VideoCodec::H265,
                VideoCodec::ProRes,
                VideoCodec::Mjpeg,
                VideoCodec::Png,
            ],
            ContainerFormat::Mkv => &[
                VideoCodec::H264,
                VideoCodec::H265,
                VideoCodec::Vp8,
                VideoCodec::Vp9,
                VideoCodec::Mjpeg,
            ],
            ContainerFormat::WebM => &[VideoCodec::Vp8, VideoCodec::Vp9],
            ContainerFormat::Avi => &[VideoCodec::Mjpeg, VideoCodec::H264],
            ContainerFormat::Mp3 | ContainerFormat::Wav => &[],
        }
    }

    pub fn supported_audio_codecs(&self, container: ContainerFormat) -> &'static [AudioCodec] {
        match container {
            ContainerFormat::Mp4 => &[AudioCodec::Aac, AudioCodec::Mp3],
            ContainerFormat::Mov => &[AudioCodec::Aac, AudioCodec::PcmS16le, AudioCodec::PcmS32le],
            ContainerFormat::Mkv => &[
                AudioCodec::Aac,
                AudioCodec::Opus,
                AudioCodec::Mp3,
                AudioCodec::Flac,
                AudioCodec::PcmS16le,
            ],
            ContainerFormat::WebM => &[AudioCodec::Opus],
            ContainerFormat::Avi => &[AudioCodec::Mp3, AudioCodec::PcmS16le],
            ContainerFormat::Mp3 => &[AudioCodec::Mp3],
            ContainerFormat::Wav => &[AudioCodec::PcmS16le, AudioCodec::PcmS32le],
        }
    }

    pub fn supported_pixel_formats(&self, codec: VideoCodec) -> &'static [PixelFormat] {
        match codec {
            VideoCodec::H264 => &[
                PixelFormat::Yuv420p,
                PixelFormat::Yuv422p,
                PixelFormat::Yuv444p,
                PixelFormat::Yuv420p10le,
                PixelFormat::Nv12,
            ],
            VideoCodec::H265 => &[
                PixelFormat::Yuv420p,
                PixelFormat::Yuv422p,
                PixelFormat::Yuv444p,
                PixelFormat::Yuv420p10le,
                PixelFormat::Yuv422p10le,
            ],
            VideoCodec::Vp8 => &[PixelFormat::Yuv420p],
            VideoCodec::Vp9 => &[
                PixelFormat::Yuv420p,
                PixelFormat::Yuv422p,
                PixelFormat::Yuv444p,
                PixelFormat::Yuv420p10le,
            ],
            VideoCodec::Mjpeg => &[PixelFormat::Yuvj420p],
            VideoCodec::Png => &[PixelFormat::Rgb24, PixelFormat::Rgba, PixelFormat::Gray8],
            VideoCodec::ProRes => &[PixelFormat::Yuv422p10le],
        }
    }

    pub fn supported_sample_rates(&self, codec: AudioCodec) -> &'static [u32] {
        match codec {
            AudioCodec::Aac => &[8000, 16000, 22050, 24000, 32000, 44100, 48000, 96000],
            AudioCodec::Opus => &[48000],
            AudioCodec::Mp3 => &[16000, 22050, 24000, 32000, 44100, 48000],
            AudioCodec::Flac | AudioCodec::PcmS16le | AudioCodec::PcmS32le => {
                &[8000, 16000, 22050, 32000, 44100, 48000, 96000, 192000]
            }
        }
    }

    pub fn supported_channel_layouts(&self, codec: AudioCodec) -> &'static [ChannelLayout] {
        match codec {
            AudioCodec::Aac | AudioCodec::Opus => &[
                ChannelLayout::Mono,
                ChannelLayout::Stereo,
                ChannelLayout::Surround51,
            ],
            AudioCodec::Mp3 => &[ChannelLayout::Mono, ChannelLayout::Stereo],
            AudioCodec::Flac | AudioCodec::PcmS16le | AudioCodec::PcmS32le => &[
                ChannelLayout::Mono,
                ChannelLayout::Stereo,
                ChannelLayout::Surround51,
                ChannelLayout::Surround71,
            ],
        }
    }
}
