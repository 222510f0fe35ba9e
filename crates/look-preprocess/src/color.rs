//! YUV420 → RGB24 conversion (BT.601, full range).

use image::RgbImage;
use rgb::{FromSlice, RGB8};

use crate::YuvFrame;

/// Saturate to `[0, 255]`, then drop the fraction.
///
/// Truncation (not rounding) keeps the output bit-identical across
/// platforms; downstream models were calibrated against it.
#[inline]
pub fn clamp_to_byte(value: f64) -> u8 {
    if value < 0.0 {
        return 0;
    }
    if value > 255.0 {
        return 255;
    }
    value as u8
}

/// Convert a single full-range YUV sample to RGB.
#[inline]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> RGB8 {
    let y = y as f64;
    let u = u as f64 - 128.0;
    let v = v as f64 - 128.0;

    let r = y + 1.402 * v;
    let g = y - 0.344_136 * u - 0.714_136 * v;
    let b = y + 1.772 * u;

    RGB8::new(clamp_to_byte(r), clamp_to_byte(g), clamp_to_byte(b))
}

/// Decode the whole frame into a `W`×`H` interleaved RGB image.
pub fn decode_rgb(frame: &YuvFrame<'_>) -> RgbImage {
    let w = frame.width();
    let h = frame.height();
    let (y_plane, u_plane, v_plane) = (frame.y(), frame.u(), frame.v());

    let mut rgb = RgbImage::new(w as u32, h as u32);
    let pixels: &mut [RGB8] = rgb.as_rgb_mut();

    for (j, row) in pixels.chunks_exact_mut(w).enumerate() {
        let cj = j / 2;
        for (i, px) in row.iter_mut().enumerate() {
            let ci = i / 2;
            *px = yuv_to_rgb(
                y_plane.sample(i, j),
                u_plane.sample(ci, cj),
                v_plane.sample(ci, cj),
            );
        }
    }

    log::trace!("decoded {w}x{h} YUV420 frame to RGB");
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates_and_truncates() {
        assert_eq!(clamp_to_byte(-0.5), 0);
        assert_eq!(clamp_to_byte(-300.0), 0);
        assert_eq!(clamp_to_byte(0.99), 0);
        assert_eq!(clamp_to_byte(163.9), 163);
        assert_eq!(clamp_to_byte(255.0), 255);
        assert_eq!(clamp_to_byte(433.0), 255);
    }

    #[test]
    fn neutral_chroma_is_gray() {
        assert_eq!(yuv_to_rgb(16, 128, 128), RGB8::new(16, 16, 16));
        assert_eq!(yuv_to_rgb(200, 128, 128), RGB8::new(200, 200, 200));
    }

    #[test]
    fn saturated_red() {
        // G = 255 - 0.714136 * 127 = 164.30...
        assert_eq!(yuv_to_rgb(255, 128, 255), RGB8::new(255, 164, 255));
    }

    #[test]
    fn saturated_blue_clamps_low_channels() {
        // R = 0 + 1.402 * -128 < 0, B = 0 + 1.772 * 127 = 225.04
        let px = yuv_to_rgb(0, 255, 0);
        assert_eq!(px.r, 0);
        assert_eq!(px.b, 225);
    }
}
