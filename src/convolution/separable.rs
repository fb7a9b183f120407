use crate::cache::{SealedCache, SharedCache};
use crate::convolution::{accumulate, Axis};
use crate::dispatch::{dispatch, Retired};
use crate::packing::CacheCodec;
use crate::pixels::PixelTrait;
use crate::tile::{clamp_coord, load_tile, CacheGeometry, Halo, TileSize, WorkgroupId};
use crate::{ImageView, ImageViewMut};

/// One pass of separable convolution along the given axis.
///
/// The cache of a workgroup has halo only along the axis of convolution:
/// `(tile.width + 2 * radius) x tile.height` for horizontal pass and
/// `tile.width x (tile.height + 2 * radius)` for vertical one.
/// Costs `2 * radius + 1` taps per pixel.
pub(crate) fn axis_pass<'a, C, S, D>(
    src: &S,
    dst: &'a mut D,
    weights: &[f32],
    axis: Axis,
    tile: TileSize,
) -> Retired<'a, D>
where
    C: CacheCodec,
    S: ImageView,
    D: ImageViewMut,
{
    debug_assert_eq!(weights.len() % 2, 1);
    debug_assert_eq!((src.width(), src.height()), (dst.width(), dst.height()));

    let radius = (weights.len() / 2) as u32;
    let halo = match axis {
        Axis::Horizontal => Halo::horizontal(radius),
        Axis::Vertical => Halo::vertical(radius),
    };
    let geometry = CacheGeometry::new(tile, halo, src.width(), src.height());
    dispatch(
        dst,
        tile,
        || SharedCache::<C::Cached>::new(geometry.cache_len()),
        |group, mut cache, rows| {
            load_tile::<_, C>(src, group, &geometry, &mut cache);
            let cache = cache.barrier();
            convolve_tile::<C, _>(&cache, group, &geometry, weights, axis, rows);
            cache.discard()
        },
    )
}

fn convolve_tile<C: CacheCodec, P: PixelTrait>(
    cache: &SealedCache<C::Cached>,
    group: WorkgroupId,
    geometry: &CacheGeometry,
    weights: &[f32],
    axis: Axis,
    rows: &mut [&mut [P]],
) {
    let width = geometry.image_width;
    let height = geometry.image_height;
    let radius = (weights.len() / 2) as i64;
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
            match axis {
                Axis::Horizontal => {
                    let cache_row = (y - origin_y) as usize * cache_width;
                    for (i, &weight) in weights.iter().enumerate() {
                        let cx = clamp_coord(x + i as i64 - radius, width) as i64 - origin_x;
                        let value = C::decode(cache.get(cache_row + cx as usize));
                        accumulate(&mut sum, weight, value);
                    }
                }
                Axis::Vertical => {
                    let cx = (x - origin_x) as usize;
                    for (i, &weight) in weights.iter().enumerate() {
                        let cy = clamp_coord(y + i as i64 - radius, height) as i64 - origin_y;
                        let value = C::decode(cache.get(cy as usize * cache_width + cx));
                        accumulate(&mut sum, weight, value);
                    }
                }
            }
            row[x as usize] = P::from_f32x4(sum);
        }
    }
}
