//! Iterated separable Gaussian blur over RGBA8.

use ndarray::{Array3, ArrayViewMut3};
use serde::{Deserialize, Serialize};

use crate::{check_len, image_len, OpsError, Result};

const CHANNELS: usize = 4;

/// Kernel shape for [`gaussian_blur_in_place`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlurParams {
    /// Taps per axis; odd.
    pub kernel_size: usize,
    pub sigma: f64,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            kernel_size: 31,
            sigma: 11.0,
        }
    }
}

impl BlurParams {
    pub fn validate(&self) -> Result<()> {
        let ok = self.kernel_size % 2 == 1 && self.sigma.is_finite() && self.sigma > 0.0;
        if !ok {
            return Err(OpsError::InvalidKernel {
                size: self.kernel_size,
                sigma: self.sigma,
            });
        }
        Ok(())
    }

    pub fn radius(&self) -> usize {
        self.kernel_size / 2
    }
}

/// Normalised 1-D Gaussian: `exp(-(i - r)^2 / (2 sigma^2))`, summing to 1.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    let radius = (size / 2) as f64;
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - radius;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Reflect-101 index: mirror about the edge sample without repeating it
/// (`-1 -> 1`, `len -> len - 2`).
pub fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = (2 * len - 2) as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len {
        r
    } else {
        period as usize - r
    }
}

/// Source index for every position of an axis padded by `radius` each side.
fn padded_indices(len: usize, radius: usize) -> Vec<usize> {
    (0..len + 2 * radius)
        .map(|p| reflect101(p as isize - radius as isize, len))
        .collect()
}

/// Blur a tightly packed RGBA image `iterations` times, in place.
///
/// Alpha is blurred like the colour channels. Each round rounds back to
/// bytes before the next one starts. Zero iterations leave the buffer
/// untouched.
pub fn gaussian_blur_in_place(
    rgba: &mut [u8],
    width: usize,
    height: usize,
    iterations: usize,
    params: &BlurParams,
) -> Result<()> {
    let len = image_len(width, height, CHANNELS)?;
    check_len(rgba.len(), len)?;
    params.validate()?;
    if iterations == 0 {
        return Ok(());
    }

    let kernel = gaussian_kernel(params.kernel_size, params.sigma);
    let radius = params.radius();
    let xs = padded_indices(width, radius);
    let ys = padded_indices(height, radius);

    let mut img = ArrayViewMut3::from_shape((height, width, CHANNELS), &mut rgba[..len])
        .map_err(|_| OpsError::InvalidDimensions { width, height })?;
    let mut tmp = Array3::<f32>::zeros((height, width, CHANNELS));

    for _ in 0..iterations {
        // Horizontal pass into f32.
        for y in 0..height {
            for x in 0..width {
                let mut acc = [0.0f32; CHANNELS];
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = xs[x + k];
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += w * img[[y, sx, c]] as f32;
                    }
                }
                for (c, a) in acc.into_iter().enumerate() {
                    tmp[[y, x, c]] = a;
                }
            }
        }

        // Vertical pass back to bytes.
        for y in 0..height {
            for x in 0..width {
                let mut acc = [0.0f32; CHANNELS];
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = ys[y + k];
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += w * tmp[[sy, x, c]];
                    }
                }
                for (c, a) in acc.into_iter().enumerate() {
                    img[[y, x, c]] = a.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    log::trace!(
        "blurred {width}x{height} RGBA x{iterations} (k={}, sigma={})",
        params.kernel_size,
        params.sigma
    );
    Ok(())
}
