//! Uncompressed video frames.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel format of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, limited range.
    Yuv420p,
    /// Planar YUV 4:2:0, full range (JPEG).
    Yuvj420p,
    /// Planar YUV 4:2:2.
    Yuv422p,
    /// Planar YUV 4:4:4.
    Yuv444p,
    /// Planar YUV 4:2:0, 10-bit.
    Yuv420p10le,
    /// Planar YUV 4:2:2, 10-bit.
    Yuv422p10le,
    /// Y plane + interleaved UV plane.
    Nv12,
    /// Packed RGB, 8 bits per channel.
    Rgb24,
    /// Packed RGBA.
    Rgba,
    /// 8-bit grayscale.
    Gray8,
}

impl PixelFormat {
    pub fn num_planes(&self) -> usize {
        match self {
            Self::Yuv420p
            | Self::Yuvj420p
            | Self::Yuv422p
            | Self::Yuv444p
            | Self::Yuv420p10le
            | Self::Yuv422p10le => 3,
            Self::Nv12 => 2,
            Self::Rgb24 | Self::Rgba | Self::Gray8 => 1,
        }
    }

    /// Horizontal/vertical chroma subsampling factors.
    pub fn chroma_subsampling(&self) -> (u32, u32) {
        match self {
            Self::Yuv420p | Self::Yuvj420p | Self::Yuv420p10le | Self::Nv12 => (2, 2),
            Self::Yuv422p | Self::Yuv422p10le => (2, 1),
            _ => (1, 1),
        }
    }

    pub fn is_full_range(&self) -> bool {
        matches!(self, Self::Yuvj420p | Self::Rgb24 | Self::Rgba)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Yuv420p => "yuv420p",
            Self::Yuvj420p => "yuvj420p",
            Self::Yuv422p => "yuv422p",
            Self::Yuv444p => "yuv444p",
            Self::Yuv420p10le => "yuv420p10le",
            Self::Yuv422p10le => "yuv422p10le",
            Self::Nv12 => "nv12",
            Self::Rgb24 => "rgb24",
            Self::Rgba => "rgba",
            Self::Gray8 => "gray8",
        };
        f.write_str(name)
    }
}

/// One decoded video picture.
///
/// The plane layout is owned by whichever backend produced the frame;
/// the core only routes frames between stages and reads the metadata.
#[derive(Clone)]
pub struct Frame {
    planes: Vec<Vec<u8>>,
    width: u32,
    height: u32,
    format: PixelFormat,
    /// Presentation timestamp in the producer's time base.
    pub pts: Timestamp,
}

impl Frame {
    /// Allocate a frame with zeroed planes.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let planes = (0..format.num_planes())
            .map(|p| vec![0u8; plane_size(format, p, width, height)])
            .collect();
        Self {
            planes,
            width,
            height,
            format,
            pts: Timestamp::none(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        self.planes.get(index).map(|p| p.as_slice())
    }

    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.planes.get_mut(index).map(|p| p.as_mut_slice())
    }
}

fn plane_size(format: PixelFormat, plane: usize, width: u32, height: u32) -> usize {
    let (w, h) = (width as usize, height as usize);
    let (hsub, vsub) = format.chroma_subsampling();
    let bytes = match format {
        PixelFormat::Yuv420p10le | PixelFormat::Yuv422p10le => 2,
        _ => 1,
    };
    match format {
        PixelFormat::Rgb24 => w * h * 3,
        PixelFormat::Rgba => w * h * 4,
        PixelFormat::Gray8 => w * h,
        PixelFormat::Nv12 => {
            if plane == 0 {
                w * h
            } else {
                w * (h / 2)
            }
        }
        _ => {
            if plane == 0 {
                w * h * bytes
            } else {
                (w / hsub as usize) * (h / vsub as usize) * bytes
            }
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("pts", &self.pts)
            .finish()
    }
}
