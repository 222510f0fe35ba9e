use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};

use crate::orient::Rotation;
use crate::resize::{fit_scale, scaled_extent};

/// Geometry of one preprocessed frame.
///
/// Holds everything needed to map a point in the letterboxed model input
/// back to the source frame: rotate, mirror, scale by `scale`, then shift
/// by `(pad_x, pad_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Letterbox {
    pub scale: f64,
    pub pad_x: u32,
    pub pad_y: u32,
    /// Size after rotation and mirroring.
    pub processed_width: u32,
    pub processed_height: u32,
    /// Size of the scaled image inside the target.
    pub resized_width: u32,
    pub resized_height: u32,
    pub target_width: u32,
    pub target_height: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub rotation: Rotation,
    pub flip_horizontal: bool,
}

impl Letterbox {
    /// Plan the geometry for a `source_width`×`source_height` frame.
    ///
    /// All dimensions must be non-zero.
    pub fn compute(
        source_width: u32,
        source_height: u32,
        rotation: Rotation,
        flip_horizontal: bool,
        target_width: u32,
        target_height: u32,
    ) -> Self {
        let (processed_width, processed_height) =
            rotation.oriented_size(source_width, source_height);
        let scale = fit_scale(processed_width, processed_height, target_width, target_height);
        let resized_width = scaled_extent(processed_width, scale);
        let resized_height = scaled_extent(processed_height, scale);

        Self {
            scale,
            pad_x: target_width.saturating_sub(resized_width) / 2,
            pad_y: target_height.saturating_sub(resized_height) / 2,
            processed_width,
            processed_height,
            resized_width,
            resized_height,
            target_width,
            target_height,
            source_width,
            source_height,
            rotation,
            flip_horizontal,
        }
    }

    /// True when target pixel `(x, y)` belongs to the scaled image rather
    /// than the padding.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.pad_x
            && x < self.pad_x + self.resized_width
            && y >= self.pad_y
            && y < self.pad_y + self.resized_height
    }

    /// Map a continuous point in target space back to source-frame
    /// coordinates.
    ///
    /// Points in the padding map outside `[0, source_width] × [0,
    /// source_height]`; callers clip as they see fit.
    pub fn to_source(&self, x: f64, y: f64) -> (f64, f64) {
        let pw = self.processed_width as f64;
        let sw = self.source_width as f64;
        let sh = self.source_height as f64;

        let mut ox = (x - self.pad_x as f64) / self.scale;
        let oy = (y - self.pad_y as f64) / self.scale;
        if self.flip_horizontal {
            ox = pw - ox;
        }

        match self.rotation {
            Rotation::Deg0 => (ox, oy),
            Rotation::Deg90 => (oy, sh - ox),
            Rotation::Deg180 => (sw - ox, sh - oy),
            Rotation::Deg270 => (sw - oy, ox),
        }
    }
}

/// Centre `resized` on a black `target_width`×`target_height` canvas with
/// its top-left corner at `(pad_x, pad_y)`.
pub fn letterbox_into(
    resized: &RgbImage,
    target_width: u32,
    target_height: u32,
    pad_x: u32,
    pad_y: u32,
) -> RgbImage {
    let mut canvas = RgbImage::new(target_width, target_height);
    imageops::replace(&mut canvas, resized, pad_x as i64, pad_y as i64);
    canvas
}
