//! Types for reading TPC files

use binrw::BinRead;
use std::io::{Read, Seek};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    types::{data_size, Encoding, PixelFormat, TpcHeader},
};

/// One level of the mipmap chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipMap {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Pixel format of `data`
    pub format: PixelFormat,

    /// Pixel data
    pub data: Vec<u8>,
}

impl MipMap {
    /// Convert the level to tightly packed 8 bit RGBA
    pub fn to_rgba8(&self) -> Result<Vec<u8>> {
        match self.format {
            PixelFormat::Rgba8 => Ok(self.data.clone()),
            PixelFormat::Rgb8 => Ok(self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
                .collect()),
            PixelFormat::Bgra8 => Ok(self
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[2], px[1], px[0], px[3]])
                .collect()),
            format @ (PixelFormat::Dxt1 | PixelFormat::Dxt5) => Err(Error::Compressed(format)),
        }
    }
}

/// A decoded TPC texture
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Encoding named in the header
    pub encoding: Encoding,

    /// Pixel format of every level
    pub format: PixelFormat,

    /// Alpha cutoff
    pub alpha_test: f32,

    /// Levels, largest first
    pub mipmaps: Vec<MipMap>,

    /// Raw TXI text following the pixel data
    pub txi: Option<String>,

    /// Environment map named by the TXI `envmaptexture` entry
    pub env_map: Option<String>,
}

impl Texture {
    /// Decode a texture from the start of `reader`
    #[instrument(skip(reader), err)]
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<Texture> {
        let header = TpcHeader::read(&mut reader)?;
        let encoding = Encoding::try_from(header.encoding)?;
        let compressed = header.is_compressed();
        let format = encoding.pixel_format(compressed);
        let levels = header.mipmap_count.max(1) as u32;
        debug!(
            width = header.width,
            height = header.height,
            %format,
            levels,
            "tpc header"
        );

        let (width, height) = (header.width as u32, header.height as u32);
        let mut mipmaps = Vec::with_capacity(levels as usize);
        for level in 0..levels {
            let (w, h) = ((width >> level).max(1), (height >> level).max(1));
            let size = data_size(format, w, h)?;
            let stored = match encoding {
                Encoding::Gray => (w * h) as usize,
                _ if compressed && level == 0 => (header.data_size as usize).max(format.min_size()),
                _ => size,
            };

            let mut data = Vec::new();
            reader.by_ref().take(stored as u64).read_to_end(&mut data)?;
            if data.len() < stored {
                return Err(Error::Truncated {
                    level,
                    expected: stored,
                    found: data.len(),
                });
            }
            if encoding == Encoding::Gray {
                data = data.into_iter().flat_map(|g| [g, g, g]).collect();
            }

            mipmaps.push(MipMap {
                width: w,
                height: h,
                format,
                data,
            });
        }

        let mut trailer = Vec::new();
        reader.read_to_end(&mut trailer)?;
        let txi = String::from_utf8_lossy(&trailer)
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_owned();
        let env_map = env_map_texture(&txi);

        Ok(Texture {
            encoding,
            format,
            alpha_test: header.alpha_test,
            mipmaps,
            txi: (!txi.is_empty()).then_some(txi),
            env_map,
        })
    }

    /// Width of the first level
    pub fn width(&self) -> u32 {
        self.mipmaps.first().map_or(0, |m| m.width)
    }

    /// Height of the first level
    pub fn height(&self) -> u32 {
        self.mipmaps.first().map_or(0, |m| m.height)
    }
}

/// Find the token following `envmaptexture` in TXI text
fn env_map_texture(txi: &str) -> Option<String> {
    let mut tokens = txi.split_ascii_whitespace();
    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case("envmaptexture") {
            return tokens.next().map(str::to_owned);
        }
    }
    None
}
