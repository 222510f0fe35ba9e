//! Strided byte-plane views over caller memory.
//!
//! A plane is addressed as `data[row * row_stride + column * pixel_stride]`.
//! Camera APIs hand out Y, U and V planes with independent strides (and
//! sometimes interleave U/V in the same allocation), so every plane read in
//! the decoder goes through [`PlaneView`] instead of raw offsets.

use std::fmt;

use crate::{PreprocessError, Result};

/// Which of the three YUV420 planes a view refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneKind {
    Y,
    U,
    V,
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Y => write!(f, "Y"),
            Self::U => write!(f, "U"),
            Self::V => write!(f, "V"),
        }
    }
}

/// Borrowed view of one strided 8-bit plane.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a> {
    kind: PlaneKind,
    data: &'a [u8],
    width: usize,
    height: usize,
    row_stride: usize,
    pixel_stride: usize,
}

impl<'a> PlaneView<'a> {
    /// Wrap `data` as a `width`×`height` plane.
    ///
    /// A `pixel_stride` of 0 is treated as 1 (tightly packed). The slice must
    /// reach the last addressed sample, see [`required_len`].
    pub fn new(
        kind: PlaneKind,
        data: &'a [u8],
        width: usize,
        height: usize,
        row_stride: usize,
        pixel_stride: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PreprocessError::InvalidDimensions { width, height });
        }

        let pixel_stride = pixel_stride.max(1);
        let expected = required_len(width, height, row_stride, pixel_stride).ok_or(
            PreprocessError::PlaneTooSmall {
                plane: kind,
                expected: usize::MAX,
                actual: data.len(),
            },
        )?;

        if data.len() < expected {
            return Err(PreprocessError::PlaneTooSmall {
                plane: kind,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            kind,
            data,
            width,
            height,
            row_stride,
            pixel_stride,
        })
    }

    /// Full-resolution luma plane of a `frame_width`×`frame_height` frame.
    pub fn luma(
        data: &'a [u8],
        frame_width: usize,
        frame_height: usize,
        row_stride: usize,
    ) -> Result<Self> {
        Self::new(PlaneKind::Y, data, frame_width, frame_height, row_stride, 1)
    }

    /// 2×2-subsampled chroma plane of a `frame_width`×`frame_height` frame.
    pub fn chroma(
        kind: PlaneKind,
        data: &'a [u8],
        frame_width: usize,
        frame_height: usize,
        row_stride: usize,
        pixel_stride: usize,
    ) -> Result<Self> {
        let (width, height) = chroma_size(frame_width, frame_height);
        Self::new(kind, data, width, height, row_stride, pixel_stride)
    }

    pub fn kind(&self) -> PlaneKind {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Sample at column `x`, row `y`.
    ///
    /// Panics when `(x, y)` lies outside the plane.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "plane sample out of bounds"
        );
        self.data[y * self.row_stride + x * self.pixel_stride]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.row_stride + x * self.pixel_stride).copied()
    }
}

/// Dimensions of a chroma plane for a 4:2:0 frame.
///
/// Odd frame sizes round up; the decoder indexes chroma with `x / 2` and
/// `y / 2`, so the trailing luma column/row shares the last chroma sample.
pub fn chroma_size(frame_width: usize, frame_height: usize) -> (usize, usize) {
    (frame_width.div_ceil(2), frame_height.div_ceil(2))
}

/// Bytes needed to address every sample of a strided plane.
///
/// Returns `Some(0)` for an empty plane and `None` on overflow.
pub fn required_len(
    width: usize,
    height: usize,
    row_stride: usize,
    pixel_stride: usize,
) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let last_row = (height - 1).checked_mul(row_stride)?;
    let last_col = (width - 1).checked_mul(pixel_stride.max(1))?;
    last_row.checked_add(last_col)?.checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_with_row_padding() {
        let data = [1u8, 2, 3, 99, 4, 5, 6, 88];
        let plane = PlaneView::luma(&data, 3, 2, 4).expect("valid plane");

        assert_eq!(plane.sample(0, 0), 1);
        assert_eq!(plane.sample(2, 0), 3);
        assert_eq!(plane.sample(0, 1), 4);
        assert_eq!(plane.sample(2, 1), 6);
        assert_eq!(plane.get(3, 1), None);
    }

    #[test]
    fn interleaved_chroma_uses_pixel_stride() {
        // NV21-style VU interleave for a 4x2 frame: one chroma row of 2 samples.
        let vu = [10u8, 20, 11, 21];
        let v = PlaneView::chroma(PlaneKind::V, &vu, 4, 2, 4, 2).expect("v plane");
        let u = PlaneView::chroma(PlaneKind::U, &vu[1..], 4, 2, 4, 2).expect("u plane");

        assert_eq!((v.width(), v.height()), (2, 1));
        assert_eq!(v.sample(0, 0), 10);
        assert_eq!(v.sample(1, 0), 11);
        assert_eq!(u.sample(0, 0), 20);
        assert_eq!(u.sample(1, 0), 21);
    }

    #[test]
    fn zero_pixel_stride_is_packed() {
        let data = [7u8, 8];
        let plane = PlaneView::new(PlaneKind::U, &data, 2, 1, 2, 0).expect("valid plane");

        assert_eq!(plane.pixel_stride(), 1);
        assert_eq!(plane.sample(1, 0), 8);
    }

    #[test]
    fn short_slice_is_rejected() {
        let data = [0u8; 6];
        let err = PlaneView::luma(&data, 3, 2, 4).unwrap_err();

        assert_eq!(
            err,
            PreprocessError::PlaneTooSmall {
                plane: PlaneKind::Y,
                expected: 7,
                actual: 6,
            }
        );
    }

    #[test]
    fn required_len_ignores_trailing_padding() {
        assert_eq!(required_len(3, 2, 4, 1), Some(7));
        assert_eq!(required_len(2, 1, 4, 2), Some(3));
        assert_eq!(required_len(0, 5, 4, 1), Some(0));
        assert_eq!(required_len(2, 2, usize::MAX, 1), None);
    }

    #[test]
    fn chroma_size_rounds_up() {
        assert_eq!(chroma_size(4, 4), (2, 2));
        assert_eq!(chroma_size(5, 3), (3, 2));
        assert_eq!(chroma_size(1, 1), (1, 1));
    }
}
