//! look‑ops – small numeric and RGBA image primitives.
//!
//! All routines work on caller-owned, tightly packed buffers:
//!
//! - [`multiply_matrices`] – naive row-major `N×N` GEMM in `f64`.
//! - [`grayscale_in_place`] – BT.601 luma written back as gray RGBA.
//! - [`gaussian_blur_in_place`] – iterated separable Gaussian, reflect-101.

use thiserror::Error;

mod blur;
mod gray;
mod matmul;

pub use blur::{gaussian_blur_in_place, gaussian_kernel, reflect101, BlurParams};
pub use gray::{grayscale_in_place, luma};
pub use matmul::multiply_matrices;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("buffer too small: need {expected} elements, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },
    #[error("invalid blur kernel: size {size}, sigma {sigma}")]
    InvalidKernel { size: usize, sigma: f64 },
}

pub type Result<T> = std::result::Result<T, OpsError>;

/// `width * height * channels`, or an error when a dimension is zero or the
/// product overflows.
pub(crate) fn image_len(width: usize, height: usize, channels: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(OpsError::InvalidDimensions { width, height })
}

pub(crate) fn check_len(actual: usize, expected: usize) -> Result<()> {
    if actual < expected {
        return Err(OpsError::BufferTooSmall { expected, actual });
    }
    Ok(())
}
