//! Representations of pixels inside workgroup caches.
//!
//! Packing is a bandwidth optimization of the separable kernel: a pixel with
//! four 8-bit channels is moved through the cache as a single `u32`.
//! The convolution code only sees the encode/decode pair of [CacheCodec],
//! so a codec may be swapped without touching the arithmetic.
use std::fmt::Debug;

use crate::pixels::{F32x4, PixelTrait, U8x4};

/// Four 8-bit channels packed into one integer.
///
/// Channel `i` occupies bits `8 * i .. 8 * i + 8`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PackedRgba8(pub u32);

impl PackedRgba8 {
    #[inline(always)]
    pub fn pack(channels: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(channels))
    }

    #[inline(always)]
    pub fn unpack(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    #[inline(always)]
    pub fn from_f32x4(value: [f32; 4]) -> Self {
        Self::pack(U8x4::from_f32x4(value).0)
    }

    #[inline(always)]
    pub fn to_f32x4(self) -> [f32; 4] {
        let v = self.0;
        [
            (v & 0xff) as f32 / 255.,
            ((v >> 8) & 0xff) as f32 / 255.,
            ((v >> 16) & 0xff) as f32 / 255.,
            (v >> 24) as f32 / 255.,
        ]
    }
}

impl From<U8x4> for PackedRgba8 {
    fn from(pixel: U8x4) -> Self {
        Self::pack(pixel.0)
    }
}

impl From<PackedRgba8> for U8x4 {
    fn from(packed: PackedRgba8) -> Self {
        U8x4(packed.unpack())
    }
}

/// Boundary between the representation of pixels stored in a workgroup
/// cache and the `[f32; 4]` representation used by arithmetic.
pub trait CacheCodec: Send + Sync + 'static {
    /// Type of cache elements.
    type Cached: Copy + Default + Debug + Send + Sync;
    /// Pixel type of the image passed between passes of separable kernel.
    type Intermediate: PixelTrait;

    fn encode<P: PixelTrait>(pixel: P) -> Self::Cached;

    fn decode(cached: Self::Cached) -> [f32; 4];
}

/// Cache of packed 8-bit pixels, intermediate image is [U8x4].
#[derive(Debug, Clone, Copy)]
pub struct Packed;

impl CacheCodec for Packed {
    type Cached = PackedRgba8;
    type Intermediate = U8x4;

    #[inline(always)]
    fn encode<P: PixelTrait>(pixel: P) -> Self::Cached {
        PackedRgba8::pack(pixel.to_u8x4())
    }

    #[inline(always)]
    fn decode(cached: Self::Cached) -> [f32; 4] {
        cached.to_f32x4()
    }
}

/// Cache of float pixels, intermediate image is [F32x4].
#[derive(Debug, Clone, Copy)]
pub struct Unpacked;

impl CacheCodec for Unpacked {
    type Cached = [f32; 4];
    type Intermediate = F32x4;

    #[inline(always)]
    fn encode<P: PixelTrait>(pixel: P) -> Self::Cached {
        pixel.to_f32x4()
    }

    #[inline(always)]
    fn decode(cached: Self::Cached) -> [f32; 4] {
        cached
    }
}
