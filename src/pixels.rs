//! Contains types of pixels.
use std::fmt::Debug;
use std::mem::size_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelType {
    /// RGBA, 8 bits per channel, normalized to `[0, 1]` on read.
    U8x4,
    /// RGBA, `f32` per channel.
    F32x4,
}

impl PixelType {
    /// Size of pixel in bytes
    pub fn size(&self) -> usize {
        match self {
            Self::U8x4 => size_of::<U8x4>(),
            Self::F32x4 => size_of::<F32x4>(),
        }
    }
}

/// A trait implemented by all pixel types the blur kernels can read and write.
///
/// The arithmetic representation of a pixel is `[f32; 4]` of normalized
/// channel values. Kernels never accumulate in the storage representation.
pub trait PixelTrait: Copy + Clone + Default + Debug + PartialEq + Send + Sync + 'static {
    fn pixel_type() -> PixelType;

    /// Size of pixel in bytes
    fn size() -> usize {
        size_of::<Self>()
    }

    fn to_f32x4(self) -> [f32; 4];

    /// Converts accumulated value back into the storage representation.
    fn from_f32x4(value: [f32; 4]) -> Self;

    /// Quantized 8-bit representation of pixel.
    fn to_u8x4(self) -> [u8; 4] {
        self.to_f32x4().map(unorm8_from_f32)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct U8x4(pub [u8; 4]);

impl U8x4 {
    #[inline(always)]
    pub const fn new(v: [u8; 4]) -> Self {
        Self(v)
    }
}

impl PixelTrait for U8x4 {
    fn pixel_type() -> PixelType {
        PixelType::U8x4
    }

    #[inline(always)]
    fn to_f32x4(self) -> [f32; 4] {
        self.0.map(|c| c as f32 / 255.)
    }

    #[inline(always)]
    fn from_f32x4(value: [f32; 4]) -> Self {
        Self(value.map(unorm8_from_f32))
    }

    #[inline(always)]
    fn to_u8x4(self) -> [u8; 4] {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(transparent)]
pub struct F32x4(pub [f32; 4]);

impl F32x4 {
    #[inline(always)]
    pub const fn new(v: [f32; 4]) -> Self {
        Self(v)
    }
}

impl PixelTrait for F32x4 {
    fn pixel_type() -> PixelType {
        PixelType::F32x4
    }

    #[inline(always)]
    fn to_f32x4(self) -> [f32; 4] {
        self.0
    }

    #[inline(always)]
    fn from_f32x4(value: [f32; 4]) -> Self {
        Self(value)
    }
}

/// Converts normalized float into 8-bit unsigned normalized integer
/// with rounding to the nearest value.
#[inline(always)]
pub(crate) fn unorm8_from_f32(v: f32) -> u8 {
    let v = num_traits::clamp(v, 0., 1.);
    (v * 255. + 0.5) as u8
}
