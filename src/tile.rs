//! Geometry of tiles and cooperative loading of tiles into shared caches.
use std::num::NonZeroU32;

use crate::cache::SharedCache;
use crate::packing::CacheCodec;
use crate::{ImageView, TileSizeError};

/// Size of the block of output pixels processed by one workgroup.
///
/// Tiling is a partition of work only. Result of convolution doesn't
/// depend on the tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSize {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl TileSize {
    /// Default tile of the single-pass 2D kernel.
    pub const JOINT: Self = Self::from_non_zero(16, 16);
    /// Default tile of the horizontal pass of the separable kernel.
    pub const HORIZONTAL: Self = Self::from_non_zero(64, 1);
    /// Default tile of the vertical pass of the separable kernel.
    pub const VERTICAL: Self = Self::from_non_zero(1, 64);

    pub fn new(width: u32, height: u32) -> Result<Self, TileSizeError> {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(TileSizeError),
        }
    }

    const fn from_non_zero(width: u32, height: u32) -> Self {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => Self { width, height },
            _ => panic!("Size of tile must be non-zero"),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height.get()
    }

    #[inline(always)]
    pub(crate) fn non_zero_height(&self) -> NonZeroU32 {
        self.height
    }

    /// Count of invocations in one workgroup.
    #[inline(always)]
    pub fn invocations(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}

/// Count of extra source pixels required on each side of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Halo {
    pub x: u32,
    pub y: u32,
}

impl Halo {
    /// Halo of 2D kernel with the given radius.
    pub fn both(radius: u32) -> Self {
        Self {
            x: radius,
            y: radius,
        }
    }

    pub fn horizontal(radius: u32) -> Self {
        Self { x: radius, y: 0 }
    }

    pub fn vertical(radius: u32) -> Self {
        Self { x: 0, y: radius }
    }
}

/// Index of workgroup in the dispatch grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkgroupId {
    pub x: u32,
    pub y: u32,
}

/// Grid of workgroups covering the whole image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DispatchGrid {
    pub groups_x: u32,
    pub groups_y: u32,
}

impl DispatchGrid {
    pub fn new(width: u32, height: u32, tile: TileSize) -> Self {
        Self {
            groups_x: width.div_ceil(tile.width()),
            groups_y: height.div_ceil(tile.height()),
        }
    }

    pub fn count(&self) -> usize {
        self.groups_x as usize * self.groups_y as usize
    }
}

/// Layout of a workgroup's shared cache relative to the image.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CacheGeometry {
    pub tile: TileSize,
    pub halo: Halo,
    pub image_width: u32,
    pub image_height: u32,
}

impl CacheGeometry {
    pub fn new(tile: TileSize, halo: Halo, image_width: u32, image_height: u32) -> Self {
        Self {
            tile,
            halo,
            image_width,
            image_height,
        }
    }

    #[inline(always)]
    pub fn cache_width(&self) -> u32 {
        self.tile.width() + 2 * self.halo.x
    }

    #[inline(always)]
    pub fn cache_height(&self) -> u32 {
        self.tile.height() + 2 * self.halo.y
    }

    #[inline(always)]
    pub fn cache_len(&self) -> usize {
        self.cache_width() as usize * self.cache_height() as usize
    }

    /// Count of cache slots loaded by one invocation along each axis.
    #[inline(always)]
    pub fn load_per_invocation(&self) -> (u32, u32) {
        (
            self.cache_width().div_ceil(self.tile.width()),
            self.cache_height().div_ceil(self.tile.height()),
        )
    }

    /// Coordinates of the first output pixel of the workgroup.
    #[inline(always)]
    pub fn tile_origin(&self, group: WorkgroupId) -> (i64, i64) {
        (
            group.x as i64 * self.tile.width() as i64,
            group.y as i64 * self.tile.height() as i64,
        )
    }

    /// Image coordinates of the first slot of the workgroup's cache.
    #[inline(always)]
    pub fn cache_origin(&self, group: WorkgroupId) -> (i64, i64) {
        let (x, y) = self.tile_origin(group);
        (x - self.halo.x as i64, y - self.halo.y as i64)
    }
}

/// Clamp-to-edge addressing: replaces coordinate outside of `[0, size)`
/// by the nearest coordinate inside.
///
/// Loading of tiles and addressing of taps must use this function both,
/// otherwise cache-relative indices point to the wrong source pixels.
#[inline(always)]
pub(crate) fn clamp_coord(coord: i64, size: u32) -> u32 {
    debug_assert!(size > 0);
    coord.clamp(0, size as i64 - 1) as u32
}

/// Cooperatively copies the tile of workgroup with its halo from the source
/// image into the workgroup's cache.
///
/// Every invocation `(lx, ly)` of the workgroup writes the block of
/// `load_x * load_y` cache slots starting at `(lx * load_x, ly * load_y)`.
/// Slots outside the image receive the nearest edge pixel.
pub(crate) fn load_tile<V, C>(
    src: &V,
    group: WorkgroupId,
    geometry: &CacheGeometry,
    cache: &mut SharedCache<C::Cached>,
) where
    V: ImageView,
    C: CacheCodec,
{
    debug_assert_eq!(cache.len(), geometry.cache_len());
    let (load_x, load_y) = geometry.load_per_invocation();
    let cache_width = geometry.cache_width();
    let cache_height = geometry.cache_height();
    let (origin_x, origin_y) = geometry.cache_origin(group);

    for ly in 0..geometry.tile.height() {
        for lx in 0..geometry.tile.width() {
            for j in 0..load_y {
                let slot_y = ly * load_y + j;
                if slot_y >= cache_height {
                    break;
                }
                let src_y = clamp_coord(origin_y + slot_y as i64, geometry.image_height);
                let Some(src_row) = src.get_row(src_y) else {
                    continue;
                };
                for i in 0..load_x {
                    let slot_x = lx * load_x + i;
                    if slot_x >= cache_width {
                        break;
                    }
                    let src_x = clamp_coord(origin_x + slot_x as i64, geometry.image_width);
                    let pixel = src_row[src_x as usize];
                    cache.store(
                        slot_y as usize * cache_width as usize + slot_x as usize,
                        C::encode(pixel),
                    );
                }
            }
        }
    }
}
