//! Header layout and pixel format rules

use binrw::{BinRead, BinWrite};
use std::fmt;

use crate::error::{Error, Result};

/// Size of [`TpcHeader`] on disk
pub const HEADER_SIZE: u64 = 128;

/// Levels at or above this size in either dimension are rejected
pub const MAX_DIMENSION: u32 = 0x8000;

/// TPC file header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct TpcHeader {
    /// Size of the first level for compressed textures, zero for uncompressed ones
    pub data_size: u32,

    /// Alpha cutoff
    pub alpha_test: f32,

    /// Width of the first level
    pub width: u16,

    /// Height of the first level
    pub height: u16,

    /// Raw [`Encoding`] code
    pub encoding: u8,

    /// Number of levels, zero is read as one
    #[brw(pad_after = 114)]
    pub mipmap_count: u8,
}

impl TpcHeader {
    /// Whether the pixel data is block compressed
    pub fn is_compressed(&self) -> bool {
        self.data_size != 0
    }
}

/// Layout of the pixel data as stored in the file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    Gray,
    Rgb,
    Rgba,
    Bgra,
}

impl TryFrom<u8> for Encoding {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Encoding::Gray),
            2 => Ok(Encoding::Rgb),
            4 => Ok(Encoding::Rgba),
            12 => Ok(Encoding::Bgra),
            other => Err(Error::UnknownEncoding(other)),
        }
    }
}

impl Encoding {
    /// Pixel format of the decoded levels
    pub fn pixel_format(self, compressed: bool) -> PixelFormat {
        match (self, compressed) {
            (Encoding::Rgb, true) => PixelFormat::Dxt1,
            (Encoding::Rgba, true) => PixelFormat::Dxt5,
            (Encoding::Gray | Encoding::Rgb, false) => PixelFormat::Rgb8,
            (Encoding::Rgba, false) => PixelFormat::Rgba8,
            (Encoding::Bgra, _) => PixelFormat::Bgra8,
            // The games never ship compressed gray textures
            (Encoding::Gray, true) => PixelFormat::Rgb8,
        }
    }
}

/// Pixel format of decoded levels
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
    Bgra8,
    Dxt1,
    Dxt5,
}

impl PixelFormat {
    /// Whether levels are stored as 4x4 blocks
    pub fn is_compressed(self) -> bool {
        matches!(self, PixelFormat::Dxt1 | PixelFormat::Dxt5)
    }

    /// Smallest possible level size
    pub fn min_size(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Dxt1 => 8,
            PixelFormat::Dxt5 => 16,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Bgra8 => "bgra8",
            PixelFormat::Dxt1 => "dxt1",
            PixelFormat::Dxt5 => "dxt5",
        })
    }
}

/// Number of bytes a level of the given dimensions occupies
///
/// ```
/// use aurora_tpc::{data_size, PixelFormat};
///
/// assert_eq!(data_size(PixelFormat::Dxt1, 1, 1).unwrap(), 8);
/// assert_eq!(data_size(PixelFormat::Rgba8, 2, 2).unwrap(), 16);
/// assert!(data_size(PixelFormat::Rgb8, 0x8000, 1).is_err());
/// ```
pub fn data_size(format: PixelFormat, width: u32, height: u32) -> Result<usize> {
    if width >= MAX_DIMENSION || height >= MAX_DIMENSION {
        return Err(Error::InvalidDimensions { width, height });
    }

    let (width, height) = (width as usize, height as usize);
    let blocks = ((width + 3) / 4) * ((height + 3) / 4);
    Ok(match format {
        PixelFormat::Rgb8 => width * height * 3,
        PixelFormat::Rgba8 | PixelFormat::Bgra8 => width * height * 4,
        PixelFormat::Dxt1 => (blocks * 8).max(8),
        PixelFormat::Dxt5 => (blocks * 16).max(16),
    })
}
