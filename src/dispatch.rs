use std::ops::Deref;

use crate::tile::{DispatchGrid, TileSize, WorkgroupId};
use crate::ImageViewMut;

/// Output image of a dispatch whose workgroups have all retired.
///
/// This is the only way to get read access to the output of a pass,
/// so the next pass can't start reading until every workgroup of the
/// previous one has finished writing.
#[derive(Debug)]
pub(crate) struct Retired<'a, V> {
    image: &'a V,
}

impl<V> Deref for Retired<'_, V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        self.image
    }
}

/// Runs a compute pass over the destination image.
///
/// The image is covered by a grid of `ceil(width / tile.width) x
/// ceil(height / tile.height)` workgroups. Rows of workgroups are
/// executed independently (in parallel if the `rayon` feature is enabled),
/// workgroups within one row are executed in order of their `x` index.
///
/// `init` creates state local to a worker (e.g. storage of a workgroup
/// cache), `run` executes one workgroup and receives rows of the output
/// band that contains the workgroup's tile.
pub(crate) fn dispatch<'a, D, L, I, F>(
    dst: &'a mut D,
    tile: TileSize,
    init: I,
    run: F,
) -> Retired<'a, D>
where
    D: ImageViewMut,
    I: Fn() -> L + Sync,
    F: Fn(WorkgroupId, L, &mut [&mut [D::Pixel]]) -> L + Sync,
{
    let grid = DispatchGrid::new(dst.width(), dst.height(), tile);
    log::trace!(
        "Dispatch {}x{} workgroups of {}x{} invocations",
        grid.groups_x,
        grid.groups_y,
        tile.width(),
        tile.height()
    );
    if grid.count() > 0 {
        let bands = dst.split_into_bands_mut(tile.non_zero_height());
        debug_assert_eq!(bands.len(), grid.groups_y as usize);

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                bands.into_par_iter().enumerate().for_each(|(group_y, mut band)| {
                    run_workgroups_row(group_y as u32, grid.groups_x, &mut band, &init, &run)
                });
            } else {
                bands.into_iter().enumerate().for_each(|(group_y, mut band)| {
                    run_workgroups_row(group_y as u32, grid.groups_x, &mut band, &init, &run)
                });
            }
        }
    }
    // Every workgroup has returned at this point.
    Retired { image: dst }
}

fn run_workgroups_row<B, L, I, F>(group_y: u32, groups_x: u32, band: &mut B, init: &I, run: &F)
where
    B: ImageViewMut,
    I: Fn() -> L,
    F: Fn(WorkgroupId, L, &mut [&mut [B::Pixel]]) -> L,
{
    let mut rows: Vec<&mut [B::Pixel]> = band.iter_rows_mut(0).collect();
    let mut local = init();
    for group_x in 0..groups_x {
        let group = WorkgroupId {
            x: group_x,
            y: group_y,
        };
        local = run(group, local, &mut rows);
    }
}
