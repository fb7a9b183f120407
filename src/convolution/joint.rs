use crate::cache::{SealedCache, SharedCache};
use crate::convolution::accumulate;
use crate::dispatch::{dispatch, Retired};
use crate::packing::CacheCodec;
use crate::pixels::PixelTrait;
use crate::tile::{clamp_coord, load_tile, CacheGeometry, Halo, TileSize, WorkgroupId};
use crate::{ImageView, ImageViewMut};

/// Single-pass 2D convolution with a `(tile + 2 * radius)^2` cache
/// per workgroup.
///
/// `weights` is the `N x N` table of coefficients stored by rows,
/// where `N = 2 * radius + 1`. Costs `N^2` taps per pixel.
pub(crate) fn joint_pass<'a, C, S, D>(
    src: &S,
    dst: &'a mut D,
    weights: &[f32],
    radius: u32,
    tile: TileSize,
) -> Retired<'a, D>
where
    C: CacheCodec,
    S: ImageView,
    D: ImageViewMut,
{
    let size = 2 * radius as usize + 1;
    debug_assert_eq!(weights.len(), size * size);
    debug_assert_eq!((src.width(), src.height()), (dst.width(), dst.height()));

    let geometry = CacheGeometry::new(tile, Halo::both(radius), src.width(), src.height());
    dispatch(
        dst,
        tile,
        || SharedCache::<C::Cached>::new(geometry.cache_len()),
        |group, mut cache, rows| {
            load_tile::<_, C>(src, group, &geometry, &mut cache);
            let cache = cache.barrier();
            convolve_tile::<C, _>(&cache, group, &geometry, weights, radius, rows);
            cache.discard()
        },
    )
}

fn convolve_tile<C: CacheCodec, P: PixelTrait>(
    cache: &SealedCache<C::Cached>,
    group: WorkgroupId,
    geometry: &CacheGeometry,
    weights: &[f32],
    radius: u32,
    rows: &mut [&mut [P]],
) {
    let width = geometry.image_width;
    let height = geometry.image_height;
    let size = 2 * radius as usize + 1;
    let radius = radius as i64;
    let cache_width = geometry.cache_width() as usize;
    let (tile_x, tile_y) = geometry.tile_origin(group);
    let (origin_x, origin_y) = geometry.cache_origin(group);

    for (ly, row) in rows.iter_mut().enumerate() {
        let y = tile_y + ly as i64;
        for lx in 0..geometry.tile.width() as i64 {
            let x = tile_x + lx;
            if x >= width as i64 {
                break;
            }

            let mut sum = [0f32; 4];
            for (j, weights_row) in weights.chunks_exact(size).enumerate() {
                let cy = (clamp_coord(y + j as i64 - radius, height) as i64 - origin_y) as usize;
                let cache_row = cy * cache_width;
                for (i, &weight) in weights_row.iter().enumerate() {
                    let cx = (clamp_coord(x + i as i64 - radius, width) as i64 - origin_x) as usize;
                    let value = C::decode(cache.get(cache_row + cx));
                    accumulate(&mut sum, weight, value);
                }
            }
            row[x as usize] = P::from_f32x4(sum);
        }
    }
}
