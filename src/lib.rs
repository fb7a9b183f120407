#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

pub use blurrer::{BlurAlg, BlurOptions, Blurrer, CacheFormat};
pub use errors::*;
pub use image_view::{ImageView, ImageViewMut, IntoImageView, IntoImageViewMut};
pub use kernel::{Kernel, Kernel2d, DEFAULT_RADIUS, DEFAULT_SIGMA};
pub use packing::{CacheCodec, Packed, PackedRgba8, Unpacked};
pub use pixels::{PixelTrait, PixelType};
pub use tile::TileSize;

mod blurrer;
mod cache;
mod convolution;
mod dispatch;
mod errors;
mod image_view;
pub mod images;
mod kernel;
mod packing;
pub mod pixels;
#[cfg(feature = "for_testing")]
pub mod testing;
mod tile;
