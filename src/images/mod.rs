//! Contains image containers that provide [ImageView](crate::ImageView)
//! and [ImageViewMut](crate::ImageViewMut).
use std::fmt::Debug;

pub use typed_image::*;

mod typed_image;

#[cfg(feature = "image")]
mod image_crate;

#[derive(Debug)]
enum BufferContainer<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferContainer<'_, T> {
    fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}
