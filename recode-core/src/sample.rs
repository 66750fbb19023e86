//! Uncompressed audio sample blocks.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage format of one audio sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    /// Signed 16-bit, interleaved.
    S16,
    /// Signed 16-bit, one plane per channel.
    S16p,
    /// Signed 32-bit, interleaved.
    S32,
    /// 32-bit float, interleaved.
    F32,
    /// 32-bit float, one plane per channel.
    F32p,
}

impl SampleFormat {
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::S16 | Self::S16p => 2,
            Self::S32 | Self::F32 | Self::F32p => 4,
        }
    }

    pub fn is_planar(&self) -> bool {
        matches!(self, Self::S16p | Self::F32p)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::S16 => "s16",
            Self::S16p => "s16p",
            Self::S32 => "s32",
            Self::F32 => "flt",
            Self::F32p => "fltp",
        };
        f.write_str(name)
    }
}

/// Speaker arrangement of an audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChannelLayout {
    Mono,
    #[default]
    Stereo,
    /// FL, FR, FC, LFE, BL, BR.
    Surround51,
    /// FL, FR, FC, LFE, BL, BR, SL, SR.
    Surround71,
}

impl ChannelLayout {
    pub fn channels(&self) -> u32 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::Surround51 => 6,
            Self::Surround71 => 8,
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mono => "mono",
            Self::Stereo => "stereo",
            Self::Surround51 => "5.1",
            Self::Surround71 => "7.1",
        };
        f.write_str(name)
    }
}

/// One decoded block of audio samples.
///
/// Planar formats store one buffer per channel; interleaved formats
/// store a single buffer.
#[derive(Clone)]
pub struct Sample {
    data: Vec<Vec<u8>>,
    num_samples: usize,
    format: SampleFormat,
    layout: ChannelLayout,
    sample_rate: u32,
    /// Presentation timestamp in the producer's time base.
    pub pts: Timestamp,
}

impl Sample {
    /// Allocate a silent sample block.
    pub fn new(
        num_samples: usize,
        format: SampleFormat,
        layout: ChannelLayout,
        sample_rate: u32,
    ) -> Self {
        let channels = layout.channels() as usize;
        let bytes = format.bytes_per_sample();
        let data = if format.is_planar() {
            (0..channels).map(|_| vec![0u8; num_samples * bytes]).collect()
        } else {
            vec![vec![0u8; num_samples * channels * bytes]]
        };
        Self {
            data,
            num_samples,
            format,
            layout,
            sample_rate,
            pts: Timestamp::none(),
        }
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u32 {
        self.layout.channels()
    }

    /// Length of this block in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }

    /// Plane data: per-channel for planar formats, single interleaved
    /// buffer (index 0) otherwise.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        self.data.get(index).map(|p| p.as_slice())
    }

    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.data.get_mut(index).map(|p| p.as_mut_slice())
    }
}

impl fmt::Debug for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sample")
            .field("num_samples", &self.num_samples)
            .field("format", &self.format)
            .field("layout", &self.layout)
            .field("sample_rate", &self.sample_rate)
            .field("pts", &self.pts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_allocation() {
        let s = Sample::new(1024, SampleFormat::F32p, ChannelLayout::Stereo, 48000);
        assert_eq!(s.plane(0).unwrap().len(), 4096);
        assert_eq!(s.plane(1).unwrap().len(), 4096);
        assert!(s.plane(2).is_none());
    }

    #[test]
    fn test_interleaved_allocation() {
        let s = Sample::new(1024, SampleFormat::S16, ChannelLayout::Stereo, 44100);
        assert_eq!(s.plane(0).unwrap().len(), 1024 * 2 * 2);
        assert!(s.plane(1).is_none());
    }

    #[test]
    fn test_duration_seconds() {
        let s = Sample::new(48000, SampleFormat::F32p, ChannelLayout::Mono, 48000);
        assert!((s.duration_seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_channels() {
        assert_eq!(ChannelLayout::Mono.channels(), 1);
        assert_eq!(ChannelLayout::Surround51.channels(), 6);
        assert_eq!(ChannelLayout::Surround71.channels(), 8);
    }
}
