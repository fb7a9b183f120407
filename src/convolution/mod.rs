//! Convolution kernels.
//!
//! Cached kernels ([joint], [separable]) process the image by workgroups:
//! every workgroup loads its tile with halo into a shared cache, passes
//! the barrier, and then evaluates the weighted sum of every output pixel
//! of the tile from the cache. Direct kernels ([direct]) sample the source
//! image without any cache and are used as reference.
pub(crate) use direct::{direct_2d, direct_axis};
pub(crate) use joint::joint_pass;
pub(crate) use separable::axis_pass;

mod direct;
mod joint;
mod separable;

/// Direction of 1D convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Horizontal,
    Vertical,
}

/// Adds `value * weight` to the accumulator.
#[inline(always)]
pub(crate) fn accumulate(sum: &mut [f32; 4], weight: f32, value: [f32; 4]) {
    for (s, v) in sum.iter_mut().zip(value) {
        *s += weight * v;
    }
}
