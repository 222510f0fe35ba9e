use rgb::{FromSlice, RGBA8};

use crate::{check_len, image_len, Result};

/// BT.601 luma, rounded half away from zero and saturated.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    l.round().clamp(0.0, 255.0) as u8
}

/// Replace every RGBA pixel with `(L, L, L, A)`.
///
/// Gray input maps to itself, so a second pass is a no-op.
pub fn grayscale_in_place(rgba: &mut [u8], width: usize, height: usize) -> Result<()> {
    let len = image_len(width, height, 4)?;
    check_len(rgba.len(), len)?;

    let pixels: &mut [RGBA8] = rgba[..len].as_rgba_mut();
    for px in pixels {
        let l = luma(px.r, px.g, px.b);
        *px = RGBA8::new(l, l, l, px.a);
    }

    log::trace!("grayscaled {width}x{height} RGBA image");
    Ok(())
}
