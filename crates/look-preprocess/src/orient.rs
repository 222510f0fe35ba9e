use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};

/// Clockwise sensor rotation, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Interpret any integer angle modulo 360.
    ///
    /// Angles that are not a multiple of 90 after normalisation map to
    /// [`Rotation::Deg0`].
    pub fn from_degrees(degrees: i32) -> Self {
        match normalize_rotation(degrees) {
            90 => Self::Deg90,
            180 => Self::Deg180,
            270 => Self::Deg270,
            _ => Self::Deg0,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// True when the rotation exchanges width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Rotation equivalent to applying `self` and then `next`.
    pub fn then(self, next: Rotation) -> Rotation {
        Self::from_degrees(self.degrees() + next.degrees())
    }

    /// Size of a `width`×`height` image after this rotation.
    pub fn oriented_size(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// Reduce an angle to `[0, 360)`.
pub fn normalize_rotation(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Rotate `img` clockwise by `rotation`, then optionally mirror it about
/// the vertical axis.
pub fn orient(img: &RgbImage, rotation: Rotation, flip_horizontal: bool) -> RgbImage {
    let mut oriented = match rotation {
        Rotation::Deg0 => img.clone(),
        Rotation::Deg90 => imageops::rotate90(img),
        Rotation::Deg180 => imageops::rotate180(img),
        Rotation::Deg270 => imageops::rotate270(img),
    };

    if flip_horizontal {
        imageops::flip_horizontal_in_place(&mut oriented);
    }

    log::trace!(
        "oriented {}x{} -> {}x{} (rotation {}°, flip {})",
        img.width(),
        img.height(),
        oriented.width(),
        oriented.height(),
        rotation.degrees(),
        flip_horizontal
    );
    oriented
}
