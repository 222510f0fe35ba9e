//! Aspect-preserving fit and bilinear resampling.

use image::RgbImage;
use rgb::{FromSlice, RGB8};

/// Uniform scale that fits a `src_w`×`src_h` image inside `dst_w`×`dst_h`.
pub fn fit_scale(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> f64 {
    let sx = dst_w as f64 / src_w as f64;
    let sy = dst_h as f64 / src_h as f64;
    sx.min(sy)
}

/// `len * scale`, rounded half away from zero, never below 1.
pub fn scaled_extent(len: u32, scale: f64) -> u32 {
    let scaled = (len as f64 * scale).round();
    if scaled < 1.0 {
        return 1;
    }
    scaled as u32
}

/// One output coordinate's pair of source neighbours and the weight of the
/// second one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    i0: usize,
    i1: usize,
    w1: f64,
}

/// Half-pixel-centre mapping; coordinates left of the first centre clamp to
/// it, the far neighbour clamps to the last sample.
fn axis_taps(src_len: u32, dst_len: u32) -> Vec<Tap> {
    let ratio = src_len as f64 / dst_len as f64;
    let last = src_len as usize - 1;

    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * ratio - 0.5).max(0.0);
            let i0 = (pos.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let w1 = if i0 == last { 0.0 } else { pos - i0 as f64 };
            Tap { i0, i1, w1 }
        })
        .collect()
}

#[inline]
fn round_to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn lerp(a: u8, b: u8, w: f64) -> f64 {
    a as f64 * (1.0 - w) + b as f64 * w
}

/// Resize `src` to `dst_w`×`dst_h` with bilinear interpolation.
///
/// Equal sizes return an exact copy. `dst_w` and `dst_h` must be non-zero.
pub fn resize_bilinear(src: &RgbImage, dst_w: u32, dst_h: u32) -> RgbImage {
    let (src_w, src_h) = src.dimensions();
    if (src_w, src_h) == (dst_w, dst_h) {
        return src.clone();
    }

    let xs = axis_taps(src_w, dst_w);
    let ys = axis_taps(src_h, dst_h);
    let stride = src_w as usize;
    let src_px: &[RGB8] = src.as_rgb();

    let mut dst = RgbImage::new(dst_w, dst_h);
    let dst_px: &mut [RGB8] = dst.as_rgb_mut();

    for (row, ty) in dst_px.chunks_exact_mut(dst_w as usize).zip(&ys) {
        let top = &src_px[ty.i0 * stride..][..stride];
        let bottom = &src_px[ty.i1 * stride..][..stride];

        for (out, tx) in row.iter_mut().zip(&xs) {
            let (a, b, c, d) = (top[tx.i0], top[tx.i1], bottom[tx.i0], bottom[tx.i1]);
            let blend = |p: u8, q: u8, r: u8, s: u8| {
                let upper = lerp(p, q, tx.w1);
                let lower = lerp(r, s, tx.w1);
                round_to_byte(upper * (1.0 - ty.w1) + lower * ty.w1)
            };

            *out = RGB8::new(
                blend(a.r, b.r, c.r, d.r),
                blend(a.g, b.g, c.g, d.g),
                blend(a.b, b.b, c.b, d.b),
            );
        }
    }

    log::trace!("resized {src_w}x{src_h} -> {dst_w}x{dst_h}");
    dst
}
