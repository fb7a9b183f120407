use core::ops::DerefMut;

use bytemuck::cast_slice_mut;
use image::{DynamicImage, Rgba32FImage, RgbaImage};

use crate::images::{TypedImage, TypedImageRef};
use crate::{ImageView, ImageViewMut, IntoImageView, IntoImageViewMut, PixelTrait, PixelType};

impl IntoImageView for DynamicImage {
    fn pixel_type(&self) -> Option<PixelType> {
        match self {
            DynamicImage::ImageRgba8(_) => Some(PixelType::U8x4),
            DynamicImage::ImageRgba32F(_) => Some(PixelType::F32x4),
            _ => None,
        }
    }

    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }

    fn image_view<P: PixelTrait>(&self) -> Option<impl ImageView<Pixel = P>> {
        if IntoImageView::pixel_type(self) == Some(P::pixel_type()) {
            return TypedImageRef::<P>::from_buffer(self.width(), self.height(), self.as_bytes())
                .ok();
        }
        None
    }
}

impl IntoImageViewMut for DynamicImage {
    fn image_view_mut<P: PixelTrait>(&mut self) -> Option<impl ImageViewMut<Pixel = P>> {
        if IntoImageView::pixel_type(self) == Some(P::pixel_type()) {
            let width = self.width();
            let height = self.height();
            return TypedImage::<P>::from_buffer(width, height, image_as_bytes_mut(self)).ok();
        }
        None
    }
}

fn image_as_bytes_mut(image: &mut DynamicImage) -> &mut [u8] {
    match image {
        DynamicImage::ImageRgba8(img) => (*img).deref_mut(),
        DynamicImage::ImageRgba32F(img) => cast_slice_mut((*img).deref_mut()),
        _ => &mut [],
    }
}

macro_rules! impl_for_img_buffer {
    ($img_type:tt, $pixel_type:expr) => {
        impl IntoImageView for $img_type {
            fn pixel_type(&self) -> Option<PixelType> {
                Some($pixel_type)
            }

            fn width(&self) -> u32 {
                self.width()
            }

            fn height(&self) -> u32 {
                self.height()
            }

            fn image_view<P: PixelTrait>(&self) -> Option<impl ImageView<Pixel = P>> {
                if P::pixel_type() == $pixel_type {
                    let bytes = bytemuck::cast_slice(self.as_raw().as_ref());
                    return TypedImageRef::<P>::from_buffer(self.width(), self.height(), bytes)
                        .ok();
                }
                None
            }
        }

        impl IntoImageViewMut for $img_type {
            fn image_view_mut<P: PixelTrait>(&mut self) -> Option<impl ImageViewMut<Pixel = P>> {
                if P::pixel_type() == $pixel_type {
                    let width = self.width();
                    let height = self.height();
                    return TypedImage::<P>::from_buffer(
                        width,
                        height,
                        cast_slice_mut((*self).deref_mut()),
                    )
                    .ok();
                }
                None
            }
        }
    };
}

impl_for_img_buffer!(RgbaImage, PixelType::U8x4);
impl_for_img_buffer!(Rgba32FImage, PixelType::F32x4);
