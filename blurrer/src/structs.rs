use std::str::FromStr;

use anyhow::{anyhow, Context};
use tiled_blur as tb;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum Algorithm {
    /// Single pass of 2D convolution with a cache of the tile and its halo.
    Joint,
    /// Horizontal and vertical passes of 1D convolution, every pass has its
    /// own cache.
    Separable,
    /// Single pass of 2D convolution without cache.
    Direct2d,
    /// Horizontal and vertical passes of 1D convolution without cache.
    DirectSeparable,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum CacheFormat {
    /// Four 8-bit channels packed into 32-bit integer.
    Packed,
    /// Four 32-bit floats.
    Float,
}

impl From<CacheFormat> for tb::CacheFormat {
    fn from(cache_format: CacheFormat) -> Self {
        match cache_format {
            CacheFormat::Packed => tb::CacheFormat::PackedRgba8,
            CacheFormat::Float => tb::CacheFormat::Float,
        }
    }
}

/// Size of a tile in the format `WIDTHxHEIGHT`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile(pub tb::TileSize);

impl FromStr for Tile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("Tile size must be in the format WIDTHxHEIGHT"))?;
        let width: u32 = width.trim().parse().context("Invalid width of tile")?;
        let height: u32 = height.trim().parse().context("Invalid height of tile")?;
        Ok(Self(tb::TileSize::new(width, height)?))
    }
}
