//! look‑preprocess – YUV420 camera frames → letterboxed RGB model input.
//!
//! The pipeline runs four fully materialised stages:
//!
//! 1. [`decode_rgb`] – BT.601 full-range YUV → RGB, saturate then truncate.
//! 2. [`orient`] – clockwise quarter-turn rotation, then optional mirror.
//! 3. [`resize_bilinear`] – uniform scale that fits the target box.
//! 4. [`letterbox_into`] – centre on a black canvas of the target size.
//!
//! The [`Letterbox`] returned alongside the pixels records the scale and
//! padding so detections can be mapped back with [`Letterbox::to_source`].

use ndarray::Array3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod color;
mod letterbox;
mod orient;
mod plane;
mod resize;

pub use color::{clamp_to_byte, decode_rgb, yuv_to_rgb};
pub use image::RgbImage;
pub use letterbox::{letterbox_into, Letterbox};
pub use orient::{normalize_rotation, orient, Rotation};
pub use plane::{chroma_size, required_len, PlaneKind, PlaneView};
pub use resize::{fit_scale, resize_bilinear, scaled_extent};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("{plane} plane too small: need {expected} bytes, got {actual}")]
    PlaneTooSmall {
        plane: PlaneKind,
        expected: usize,
        actual: usize,
    },
    #[error("{plane} plane is {actual_width}x{actual_height}, frame needs {width}x{height}")]
    PlaneShape {
        plane: PlaneKind,
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    #[error("output buffer too small: need {expected} bytes, got {actual}")]
    OutputTooSmall { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, PreprocessError>;

/// A borrowed YUV420 frame: full-resolution Y plus 2×2-subsampled U and V.
#[derive(Debug, Clone, Copy)]
pub struct YuvFrame<'a> {
    width: usize,
    height: usize,
    y: PlaneView<'a>,
    u: PlaneView<'a>,
    v: PlaneView<'a>,
}

impl<'a> YuvFrame<'a> {
    /// Bundle three planes into a `width`×`height` frame, checking that each
    /// plane covers the samples the decoder will read.
    pub fn new(
        width: usize,
        height: usize,
        y: PlaneView<'a>,
        u: PlaneView<'a>,
        v: PlaneView<'a>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || width > u32::MAX as usize || height > u32::MAX as usize {
            return Err(PreprocessError::InvalidDimensions { width, height });
        }

        check_shape(&y, width, height)?;
        let (cw, ch) = chroma_size(width, height);
        check_shape(&u, cw, ch)?;
        check_shape(&v, cw, ch)?;

        Ok(Self {
            width,
            height,
            y,
            u,
            v,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn y(&self) -> &PlaneView<'a> {
        &self.y
    }

    pub fn u(&self) -> &PlaneView<'a> {
        &self.u
    }

    pub fn v(&self) -> &PlaneView<'a> {
        &self.v
    }

    /// Odd sizes are accepted (the last chroma sample is replicated), but
    /// bindings that want strict 4:2:0 input can reject them here.
    pub fn has_even_dimensions(&self) -> bool {
        self.width % 2 == 0 && self.height % 2 == 0
    }
}

fn check_shape(plane: &PlaneView<'_>, width: usize, height: usize) -> Result<()> {
    if plane.width() < width || plane.height() < height {
        return Err(PreprocessError::PlaneShape {
            plane: plane.kind(),
            width,
            height,
            actual_width: plane.width(),
            actual_height: plane.height(),
        });
    }
    Ok(())
}

/// By-value preprocessing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameOptions {
    /// Clockwise rotation; any integer, taken modulo 360.
    pub rotation_degrees: i32,
    /// Mirror about the vertical axis after rotating.
    pub flip_horizontal: bool,
    pub target_width: u32,
    pub target_height: u32,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            rotation_degrees: 0,
            flip_horizontal: false,
            target_width: 640,
            target_height: 640,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    options: FrameOptions,
}

impl Preprocessor {
    /// Create a pre‑processor that outputs `dst_w`×`dst_h` packed RGB.
    pub fn new(dst_w: u32, dst_h: u32) -> Self {
        Self::from_options(FrameOptions {
            target_width: dst_w,
            target_height: dst_h,
            ..FrameOptions::default()
        })
    }

    pub fn from_options(options: FrameOptions) -> Self {
        Self { options }
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.options.rotation_degrees = degrees;
        self
    }

    pub fn with_flip(mut self, flip_horizontal: bool) -> Self {
        self.options.flip_horizontal = flip_horizontal;
        self
    }

    pub fn options(&self) -> &FrameOptions {
        &self.options
    }

    /// Bytes [`Preprocessor::run`] writes: `target_width * target_height * 3`.
    pub fn output_len(&self) -> usize {
        self.options.target_width as usize * self.options.target_height as usize * 3
    }

    /// Run all four stages, writing packed RGB into the front of `out`.
    pub fn run(&self, frame: &YuvFrame<'_>, out: &mut [u8]) -> Result<Letterbox> {
        let (tw, th) = (self.options.target_width, self.options.target_height);
        if tw == 0 || th == 0 {
            return Err(PreprocessError::InvalidDimensions {
                width: tw as usize,
                height: th as usize,
            });
        }

        let expected = self.output_len();
        if out.len() < expected {
            return Err(PreprocessError::OutputTooSmall {
                expected,
                actual: out.len(),
            });
        }

        let (lb, canvas) = self.process(frame);
        out[..expected].copy_from_slice(canvas.as_raw());
        Ok(lb)
    }

    /// Like [`Preprocessor::run`] but allocates the output.
    pub fn run_to_vec(&self, frame: &YuvFrame<'_>) -> Result<(Vec<u8>, Letterbox)> {
        let mut out = vec![0u8; self.output_len()];
        let lb = self.run(frame, &mut out)?;
        Ok((out, lb))
    }

    /// Letterboxed frame normalised to 0‑1 `f32`, shaped (H, W, C).
    pub fn run_tensor(&self, frame: &YuvFrame<'_>) -> Result<(Array3<f32>, Letterbox)> {
        let (rgb, lb) = self.run_to_vec(frame)?;
        let shape = (
            self.options.target_height as usize,
            self.options.target_width as usize,
            3,
        );
        let arr = Array3::from_shape_fn(shape, |(y, x, c)| {
            rgb[(y * shape.1 + x) * 3 + c] as f32 / 255.0
        });
        Ok((arr, lb))
    }

    fn process(&self, frame: &YuvFrame<'_>) -> (Letterbox, RgbImage) {
        let opts = &self.options;
        let rotation = Rotation::from_degrees(opts.rotation_degrees);
        let lb = Letterbox::compute(
            frame.width() as u32,
            frame.height() as u32,
            rotation,
            opts.flip_horizontal,
            opts.target_width,
            opts.target_height,
        );

        let rgb = decode_rgb(frame);
        let oriented = orient(&rgb, rotation, opts.flip_horizontal);
        let resized = resize_bilinear(&oriented, lb.resized_width, lb.resized_height);
        let canvas = letterbox_into(&resized, lb.target_width, lb.target_height, lb.pad_x, lb.pad_y);

        log::trace!(
            "letterboxed into {}x{} (scale {:.4}, pad {}x{})",
            lb.target_width,
            lb.target_height,
            lb.scale,
            lb.pad_x,
            lb.pad_y
        );
        (lb, canvas)
    }
}
