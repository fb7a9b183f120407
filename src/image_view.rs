use std::num::NonZeroU32;

use crate::pixels::{PixelTrait, PixelType};

/// A trait for getting access to image data.
///
/// # Safety
///
/// The length of every row returned by `iter_rows()` must be equal
/// to the image width.
pub unsafe trait ImageView: Sync {
    type Pixel: PixelTrait;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Returns iterator by slices with image rows.
    fn iter_rows(&self, start_row: u32) -> impl Iterator<Item = &[Self::Pixel]>;

    fn get_row(&self, y: u32) -> Option<&[Self::Pixel]> {
        self.iter_rows(y).next()
    }

    #[inline]
    fn get_pixel(&self, x: u32, y: u32) -> Option<Self::Pixel> {
        self.get_row(y).and_then(|row| row.get(x as usize)).copied()
    }
}

/// A trait for getting mutable access to image data.
///
/// # Safety
///
/// The length of every row returned by `iter_rows_mut()` must be equal
/// to the image width.
pub unsafe trait ImageViewMut: ImageView + Send {
    /// Returns iterator by mutable slices with image rows.
    fn iter_rows_mut(&mut self, start_row: u32) -> impl Iterator<Item = &mut [Self::Pixel]>;

    /// Divides the image into horizontal bands of `band_height` rows.
    /// The last band may be lower than others.
    fn split_into_bands_mut(
        &mut self,
        band_height: NonZeroU32,
    ) -> Vec<impl ImageViewMut<Pixel = Self::Pixel>>;
}

/// Conversion into an [ImageView].
pub trait IntoImageView {
    /// Returns pixel's type of the image.
    fn pixel_type(&self) -> Option<PixelType>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Returns an [ImageView] if pixel type of image is equal to `P`.
    fn image_view<P: PixelTrait>(&self) -> Option<impl ImageView<Pixel = P>>;
}

/// Conversion into an [ImageViewMut].
pub trait IntoImageViewMut: IntoImageView {
    /// Returns an [ImageViewMut] if pixel type of image is equal to `P`.
    fn image_view_mut<P: PixelTrait>(&mut self) -> Option<impl ImageViewMut<Pixel = P>>;
}
