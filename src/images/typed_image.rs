use std::fmt::Debug;
use std::num::NonZeroU32;

use crate::images::BufferContainer;
use crate::pixels::PixelTrait;
use crate::{ImageBufferError, ImageView, ImageViewMut, InvalidPixelsSize};

/// Generic reference to image data that provides [ImageView].
#[derive(Debug)]
pub struct TypedImageRef<'a, P> {
    width: u32,
    height: u32,
    pixels: &'a [P],
}

impl<'a, P> TypedImageRef<'a, P> {
    pub fn new(width: u32, height: u32, pixels: &'a [P]) -> Result<Self, InvalidPixelsSize> {
        let pixels_count = width as usize * height as usize;
        if pixels.len() < pixels_count {
            return Err(InvalidPixelsSize);
        }
        Ok(Self {
            width,
            height,
            pixels: &pixels[..pixels_count],
        })
    }

    pub fn from_buffer(
        width: u32,
        height: u32,
        buffer: &'a [u8],
    ) -> Result<Self, ImageBufferError> {
        let pixels = align_buffer_to(buffer)?;
        Self::new(width, height, pixels).map_err(|_| ImageBufferError::InvalidBufferSize)
    }

    pub fn pixels(&self) -> &[P] {
        self.pixels
    }
}

unsafe impl<P: PixelTrait> ImageView for TypedImageRef<'_, P> {
    type Pixel = P;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn iter_rows(&self, start_row: u32) -> impl Iterator<Item = &[Self::Pixel]> {
        iter_rows(self.pixels, self.width, start_row)
    }
}

/// Generic image container that provides [ImageView] and [ImageViewMut].
#[derive(Debug)]
pub struct TypedImage<'a, P: Default + Copy + Debug> {
    width: u32,
    height: u32,
    pixels: BufferContainer<'a, P>,
}

impl<P: Default + Copy + Debug> TypedImage<'static, P> {
    /// Creates image filled by default value of pixel.
    pub fn new(width: u32, height: u32) -> Self {
        let pixels_count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: BufferContainer::Owned(vec![P::default(); pixels_count]),
        }
    }
}

impl<'a, P: PixelTrait> TypedImage<'a, P> {
    pub fn from_pixels(
        width: u32,
        height: u32,
        mut pixels: Vec<P>,
    ) -> Result<Self, InvalidPixelsSize> {
        let pixels_count = width as usize * height as usize;
        if pixels.len() < pixels_count {
            return Err(InvalidPixelsSize);
        }
        pixels.truncate(pixels_count);
        Ok(Self {
            width,
            height,
            pixels: BufferContainer::Owned(pixels),
        })
    }

    pub fn from_pixels_slice(
        width: u32,
        height: u32,
        pixels: &'a mut [P],
    ) -> Result<Self, InvalidPixelsSize> {
        let pixels_count = width as usize * height as usize;
        if pixels.len() < pixels_count {
            return Err(InvalidPixelsSize);
        }
        Ok(Self {
            width,
            height,
            pixels: BufferContainer::Borrowed(&mut pixels[..pixels_count]),
        })
    }

    /// Wraps a slice whose length is exactly `width * height`.
    pub(crate) fn from_sized_slice(width: u32, height: u32, pixels: &'a mut [P]) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels: BufferContainer::Borrowed(pixels),
        }
    }

    pub fn from_buffer(
        width: u32,
        height: u32,
        buffer: &'a mut [u8],
    ) -> Result<Self, ImageBufferError> {
        let size = width as usize * height as usize * P::size();
        if buffer.len() < size {
            return Err(ImageBufferError::InvalidBufferSize);
        }
        let pixels = align_buffer_to_mut(buffer)?;
        Self::from_pixels_slice(width, height, pixels)
            .map_err(|_| ImageBufferError::InvalidBufferSize)
    }

    /// Creates image filled by given pixel.
    pub fn filled(width: u32, height: u32, pixel: P) -> TypedImage<'static, P> {
        let pixels_count = width as usize * height as usize;
        TypedImage {
            width,
            height,
            pixels: BufferContainer::Owned(vec![pixel; pixels_count]),
        }
    }

    pub fn pixels(&self) -> &[P] {
        self.pixels.borrow()
    }

    pub fn pixels_mut(&mut self) -> &mut [P] {
        self.pixels.borrow_mut()
    }
}

unsafe impl<P: PixelTrait> ImageView for TypedImage<'_, P> {
    type Pixel = P;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn iter_rows(&self, start_row: u32) -> impl Iterator<Item = &[Self::Pixel]> {
        iter_rows(self.pixels.borrow(), self.width, start_row)
    }
}

unsafe impl<P: PixelTrait> ImageViewMut for TypedImage<'_, P> {
    fn iter_rows_mut(&mut self, start_row: u32) -> impl Iterator<Item = &mut [Self::Pixel]> {
        let width = self.width as usize;
        if width == 0 {
            [].chunks_exact_mut(1)
        } else {
            let start = start_row as usize * width;
            self.pixels
                .borrow_mut()
                .get_mut(start..)
                .unwrap_or_default()
                .chunks_exact_mut(width)
        }
    }

    fn split_into_bands_mut(
        &mut self,
        band_height: NonZeroU32,
    ) -> Vec<impl ImageViewMut<Pixel = Self::Pixel>> {
        let width = self.width;
        let row_size = width as usize;
        let band_height = band_height.get();
        let mut res = Vec::with_capacity(self.height.div_ceil(band_height) as usize);
        let mut remains_pixels = self.pixels.borrow_mut();
        let mut top = 0;
        while top < self.height {
            let part_height = band_height.min(self.height - top);
            let parts = remains_pixels.split_at_mut(part_height as usize * row_size);
            res.push(TypedImage {
                width,
                height: part_height,
                pixels: BufferContainer::Borrowed(parts.0),
            });
            remains_pixels = parts.1;
            top += part_height;
        }
        debug_assert!(top == self.height);
        res
    }
}

fn iter_rows<P>(pixels: &[P], width: u32, start_row: u32) -> impl Iterator<Item = &[P]> {
    let width = width as usize;
    if width == 0 {
        [].chunks_exact(1)
    } else {
        let start = start_row as usize * width;
        pixels.get(start..).unwrap_or_default().chunks_exact(width)
    }
}

pub(crate) fn align_buffer_to<T>(buffer: &[u8]) -> Result<&[T], ImageBufferError> {
    let (head, pixels, _) = unsafe { buffer.align_to::<T>() };
    if !head.is_empty() {
        return Err(ImageBufferError::InvalidBufferAlignment);
    }
    Ok(pixels)
}

pub(crate) fn align_buffer_to_mut<T>(buffer: &mut [u8]) -> Result<&mut [T], ImageBufferError> {
    let (head, pixels, _) = unsafe { buffer.align_to_mut::<T>() };
    if !head.is_empty() {
        return Err(ImageBufferError::InvalidBufferAlignment);
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::U8x4;

    #[test]
    fn split_into_bands() {
        let mut image = TypedImage::<U8x4>::new(7, 10);
        let bands = image.split_into_bands_mut(NonZeroU32::new(4).unwrap());
        let heights: Vec<u32> = bands.iter().map(|b| b.height()).collect();
        assert_eq!(heights, vec![4, 4, 2]);
        assert!(bands.iter().all(|b| b.width() == 7));
    }

    #[test]
    fn rows_of_empty_image() {
        let image = TypedImage::<U8x4>::new(0, 5);
        assert_eq!(image.iter_rows(0).count(), 0);
        let image = TypedImage::<U8x4>::new(5, 0);
        assert_eq!(image.iter_rows(0).count(), 0);
    }

    #[test]
    fn too_small_buffer() {
        let pixels = vec![U8x4::default(); 5];
        assert!(TypedImageRef::new(2, 3, &pixels).is_err());
        assert!(TypedImage::from_pixels(2, 3, pixels).is_err());
    }
}
