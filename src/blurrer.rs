use crate::convolution::{self, Axis};
use crate::images::TypedImage;
use crate::kernel::{Kernel, Kernel2d};
use crate::packing::{CacheCodec, Packed, Unpacked};
use crate::pixels::{F32x4, PixelTrait, PixelType, U8x4};
use crate::tile::TileSize;
use crate::{
    BlurError, DifferentDimensionsError, ImageView, ImageViewMut, IntoImageView,
    IntoImageViewMut,
};

/// Representation of pixels in workgroup caches and in the intermediate
/// image of the separable algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheFormat {
    /// Four 8-bit channels packed into `u32`. Halves memory traffic
    /// at the cost of quantization of the intermediate image.
    #[default]
    PackedRgba8,
    /// Four `f32` channels.
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlurAlg {
    /// Single pass with 2D cache of `(tile + 2 * radius)^2` pixels
    /// per workgroup. Costs `N^2` taps per pixel.
    Joint(TileSize),
    /// Horizontal pass into an intermediate image followed by vertical pass,
    /// both with 1D caches. Costs `2 * N` taps per pixel.
    Separable {
        horizontal: TileSize,
        vertical: TileSize,
        cache: CacheFormat,
    },
    /// Single pass 2D convolution without cache.
    Direct2d,
    /// Two 1D passes without cache, the intermediate image has `f32` channels.
    DirectSeparable,
}

impl BlurAlg {
    /// [BlurAlg::Joint] with default tile `16x16`.
    pub fn joint() -> Self {
        Self::Joint(TileSize::JOINT)
    }

    /// [BlurAlg::Separable] with default tiles `64x1` and `1x64`.
    pub fn separable(cache: CacheFormat) -> Self {
        Self::Separable {
            horizontal: TileSize::HORIZONTAL,
            vertical: TileSize::VERTICAL,
            cache,
        }
    }
}

impl Default for BlurAlg {
    fn default() -> Self {
        Self::separable(CacheFormat::default())
    }
}

/// Options of blurring.
#[derive(Debug, Clone, Default)]
pub struct BlurOptions {
    pub algorithm: BlurAlg,
    pub kernel: Kernel,
}

impl BlurOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn blur_alg(&self, algorithm: BlurAlg) -> Self {
        let mut options = self.clone();
        options.algorithm = algorithm;
        options
    }

    pub fn kernel(&self, kernel: Kernel) -> Self {
        let mut options = self.clone();
        options.kernel = kernel;
        options
    }
}

/// Methods of this structure used to blur images.
///
/// Instance of `Blurrer` keeps allocated memory for the intermediate
/// image of separable algorithms and reuses it in following calls.
/// Content of this memory is always rewritten before use.
#[derive(Default, Debug, Clone)]
pub struct Blurrer {
    packed_buffer: Vec<U8x4>,
    float_buffer: Vec<F32x4>,
}

impl Blurrer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Blurs the source image and saves the result into the destination
    /// image. Dimensions of both images must be equal.
    pub fn blur<P: PixelTrait>(
        &mut self,
        src_image: &impl ImageView<Pixel = P>,
        dst_image: &mut impl ImageViewMut<Pixel = P>,
        options: &BlurOptions,
    ) -> Result<(), BlurError> {
        check_dimensions(src_image, dst_image)?;
        if src_image.width() == 0 || src_image.height() == 0 {
            return Ok(());
        }
        log::debug!(
            "Blur {}x{} image by {:?}, radius of kernel is {}",
            src_image.width(),
            src_image.height(),
            options.algorithm,
            options.kernel.radius()
        );

        let radius = options.kernel.radius();
        match options.algorithm {
            BlurAlg::Joint(tile) => {
                let weights = Kernel2d::outer(&options.kernel).weights();
                log_pass("joint pass");
                convolution::joint_pass::<Unpacked, _, _>(
                    src_image, dst_image, &weights, radius, tile,
                );
            }
            BlurAlg::Separable {
                horizontal,
                vertical,
                cache,
            } => {
                let weights = options.kernel.weights();
                match cache {
                    CacheFormat::PackedRgba8 => separable_passes::<Packed, _, _>(
                        src_image,
                        dst_image,
                        &weights,
                        horizontal,
                        vertical,
                        &mut self.packed_buffer,
                    ),
                    CacheFormat::Float => separable_passes::<Unpacked, _, _>(
                        src_image,
                        dst_image,
                        &weights,
                        horizontal,
                        vertical,
                        &mut self.float_buffer,
                    ),
                }
            }
            BlurAlg::Direct2d => {
                let weights = Kernel2d::outer(&options.kernel).weights();
                log_pass("direct 2d pass");
                convolution::direct_2d(src_image, dst_image, &weights, radius);
            }
            BlurAlg::DirectSeparable => {
                let weights = options.kernel.weights();
                let mut intermediate = intermediate_image(
                    src_image.width(),
                    src_image.height(),
                    &mut self.float_buffer,
                );
                log_pass("direct horizontal pass");
                let intermediate = convolution::direct_axis(
                    src_image,
                    &mut intermediate,
                    &weights,
                    Axis::Horizontal,
                );
                log_pass("direct vertical pass");
                convolution::direct_axis(&*intermediate, dst_image, &weights, Axis::Vertical);
            }
        }
        Ok(())
    }

    /// Blurs images with dynamic type of pixels.
    pub fn blur_image(
        &mut self,
        src_image: &impl IntoImageView,
        dst_image: &mut impl IntoImageViewMut,
        options: &BlurOptions,
    ) -> Result<(), BlurError> {
        let pixel_type = src_image
            .pixel_type()
            .ok_or(BlurError::UnsupportedPixelType)?;
        if dst_image.pixel_type() != Some(pixel_type) {
            return Err(BlurError::DifferentPixelTypes);
        }
        match pixel_type {
            PixelType::U8x4 => self.blur_typed::<U8x4>(src_image, dst_image, options),
            PixelType::F32x4 => self.blur_typed::<F32x4>(src_image, dst_image, options),
        }
    }

    fn blur_typed<P: PixelTrait>(
        &mut self,
        src_image: &impl IntoImageView,
        dst_image: &mut impl IntoImageViewMut,
        options: &BlurOptions,
    ) -> Result<(), BlurError> {
        let src_view = src_image
            .image_view::<P>()
            .ok_or(BlurError::UnsupportedPixelType)?;
        let mut dst_view = dst_image
            .image_view_mut::<P>()
            .ok_or(BlurError::UnsupportedPixelType)?;
        self.blur(&src_view, &mut dst_view, options)
    }

    /// Convolves the source image with an arbitrary 2D kernel by
    /// the single-pass cached algorithm.
    pub fn convolve_2d<P: PixelTrait>(
        &mut self,
        src_image: &impl ImageView<Pixel = P>,
        dst_image: &mut impl ImageViewMut<Pixel = P>,
        kernel: &Kernel2d,
        tile: TileSize,
    ) -> Result<(), BlurError> {
        check_dimensions(src_image, dst_image)?;
        if src_image.width() == 0 || src_image.height() == 0 {
            return Ok(());
        }
        let weights = kernel.weights();
        log_pass("joint pass");
        convolution::joint_pass::<Unpacked, _, _>(
            src_image,
            dst_image,
            &weights,
            kernel.radius(),
            tile,
        );
        Ok(())
    }
}

fn check_dimensions(
    src_image: &impl ImageView,
    dst_image: &impl ImageView,
) -> Result<(), DifferentDimensionsError> {
    if src_image.width() != dst_image.width() || src_image.height() != dst_image.height() {
        return Err(DifferentDimensionsError);
    }
    Ok(())
}

/// Horizontal pass into the intermediate image, then vertical pass from
/// the intermediate image into the destination one.
fn separable_passes<C, S, D>(
    src_image: &S,
    dst_image: &mut D,
    weights: &[f32],
    horizontal_tile: TileSize,
    vertical_tile: TileSize,
    buffer: &mut Vec<C::Intermediate>,
) where
    C: CacheCodec,
    S: ImageView,
    D: ImageViewMut,
{
    let mut intermediate = intermediate_image(src_image.width(), src_image.height(), buffer);

    log_pass("horizontal pass");
    let intermediate = convolution::axis_pass::<C, _, _>(
        src_image,
        &mut intermediate,
        weights,
        Axis::Horizontal,
        horizontal_tile,
    );

    // `intermediate` is available for reading only after all workgroups
    // of the horizontal pass have retired.
    log_pass("vertical pass");
    convolution::axis_pass::<C, _, _>(
        &*intermediate,
        dst_image,
        weights,
        Axis::Vertical,
        vertical_tile,
    );
}

fn intermediate_image<P: PixelTrait>(
    width: u32,
    height: u32,
    buffer: &mut Vec<P>,
) -> TypedImage<'_, P> {
    let pixels_count = width as usize * height as usize;
    buffer.resize(pixels_count, P::default());
    TypedImage::from_sized_slice(width, height, buffer)
}

#[inline]
fn log_pass(name: &str) {
    log::debug!("Run {name}");
    #[cfg(feature = "for_testing")]
    crate::testing::log_message(name);
}
