use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBufferError {
    #[error("Size of buffer is smaller than required")]
    InvalidBufferSize,
    #[error("Alignment of buffer don't match to alignment of required pixel type")]
    InvalidBufferAlignment,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Size of pixels container is smaller than required")]
pub struct InvalidPixelsSize;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "The dimensions of the source image are not equal to the dimensions of the destination image"
)]
pub struct DifferentDimensionsError;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum KernelError {
    #[error("Sigma of Gaussian kernel must be finite and greater than zero, got {0}")]
    InvalidSigma(f64),
    #[error("Count of kernel coefficients must be odd, got {0}")]
    EvenLength(usize),
    #[error("Count of 2D kernel coefficients must be equal to {expected}, got {actual}")]
    InvalidSize { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Width and height of a tile must be greater than zero")]
pub struct TileSizeError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurError {
    #[error(transparent)]
    DifferentDimensions(#[from] DifferentDimensionsError),
    #[error("Type of pixels of the source image is not equal to pixel type of the destination image")]
    DifferentPixelTypes,
    #[error("Type of pixels of the image is not supported")]
    UnsupportedPixelType,
}
