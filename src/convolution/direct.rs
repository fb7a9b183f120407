use crate::convolution::{accumulate, Axis};
use crate::dispatch::{dispatch, Retired};
use crate::pixels::PixelTrait;
use crate::tile::{clamp_coord, TileSize};
use crate::{ImageView, ImageViewMut};

/// Rows of pixels processed by one unit of work of direct kernels.
const ROWS_TILE: TileSize = TileSize::HORIZONTAL;

/// Single-pass 2D convolution that samples the source image directly.
pub(crate) fn direct_2d<'a, S, D>(
    src: &S,
    dst: &'a mut D,
    weights: &[f32],
    radius: u32,
) -> Retired<'a, D>
where
    S: ImageView,
    D: ImageViewMut,
{
    let size = 2 * radius as usize + 1;
    debug_assert_eq!(weights.len(), size * size);
    let width = src.width();
    let height = src.height();
    let radius = radius as i64;

    dispatch(
        dst,
        ROWS_TILE,
        || (),
        |group, (), rows| {
            let y = (group.y * ROWS_TILE.height()) as i64;
            let left = group.x * ROWS_TILE.width();
            let right = (left + ROWS_TILE.width()).min(width);
            for (ly, row) in rows.iter_mut().enumerate() {
                let y = y + ly as i64;
                for x in left..right {
                    let mut sum = [0f32; 4];
                    for (j, weights_row) in weights.chunks_exact(size).enumerate() {
                        let sy = clamp_coord(y + j as i64 - radius, height);
                        let Some(src_row) = src.get_row(sy) else {
                            continue;
                        };
                        for (i, &weight) in weights_row.iter().enumerate() {
                            let sx = clamp_coord(x as i64 + i as i64 - radius, width);
                            accumulate(&mut sum, weight, src_row[sx as usize].to_f32x4());
                        }
                    }
                    row[x as usize] = PixelTrait::from_f32x4(sum);
                }
            }
        },
    )
}

/// 1D convolution along the given axis that samples the source image
/// directly.
pub(crate) fn direct_axis<'a, S, D>(
    src: &S,
    dst: &'a mut D,
    weights: &[f32],
    axis: Axis,
) -> Retired<'a, D>
where
    S: ImageView,
    D: ImageViewMut,
{
    debug_assert_eq!(weights.len() % 2, 1);
    let width = src.width();
    let height = src.height();
    let radius = (weights.len() / 2) as i64;

    dispatch(
        dst,
        ROWS_TILE,
        || (),
        |group, (), rows| {
            let y = (group.y * ROWS_TILE.height()) as i64;
            let left = group.x * ROWS_TILE.width();
            let right = (left + ROWS_TILE.width()).min(width);
            for (ly, row) in rows.iter_mut().enumerate() {
                let y = y + ly as i64;
                for x in left..right {
                    let mut sum = [0f32; 4];
                    for (i, &weight) in weights.iter().enumerate() {
                        let offset = i as i64 - radius;
                        let (sx, sy) = match axis {
                            Axis::Horizontal => (clamp_coord(x as i64 + offset, width), y as u32),
                            Axis::Vertical => (x, clamp_coord(y + offset, height)),
                        };
                        if let Some(pixel) = src.get_pixel(sx, sy) {
                            accumulate(&mut sum, weight, pixel.to_f32x4());
                        }
                    }
                    row[x as usize] = PixelTrait::from_f32x4(sum);
                }
            }
        },
    )
}
