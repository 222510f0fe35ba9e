//! C symbol table for the look image primitives.
//!
//! Every entry point is synchronous, allocates nothing the caller can see,
//! and follows the same argument discipline: a null pointer or a
//! non-positive dimension turns the call into a silent no-op. Rejections
//! are reported through the `log` facade at debug level, which stays quiet
//! unless the host installs a logger.
//!
//! Buffer capacities are trusted. Passing a buffer shorter than documented,
//! or aliasing an output with an input, is undefined behaviour.

use std::slice;

use anyhow::{ensure, Context, Result};
use libc::{c_double, c_int};
use look_ops::BlurParams;
use look_preprocess::{
    chroma_size, required_len, FrameOptions, Letterbox, PlaneKind, PlaneView, Preprocessor,
    YuvFrame,
};

const LONG_RUNNING_SECS: u32 = 5;

/// Short-lived probe; safe to call from a UI thread.
#[no_mangle]
pub extern "C" fn sum(a: c_int, b: c_int) -> c_int {
    a.wrapping_add(b)
}

/// Blocks the calling thread for about five seconds, then returns `a + b`.
///
/// A signal may cut the sleep short; it is not resumed.
#[no_mangle]
pub extern "C" fn sum_long_running(a: c_int, b: c_int) -> c_int {
    simulate_work();
    a.wrapping_add(b)
}

#[cfg(unix)]
fn simulate_work() {
    // SAFETY: sleep(3) has no memory preconditions.
    let unslept = unsafe { libc::sleep(LONG_RUNNING_SECS) };
    if unslept > 0 {
        log::debug!("sum_long_running interrupted with {unslept}s left");
    }
}

#[cfg(not(unix))]
fn simulate_work() {
    std::thread::sleep(std::time::Duration::from_secs(LONG_RUNNING_SECS as u64));
}

/// `result = a · b` for `dimension`×`dimension` row-major matrices.
///
/// # Safety
/// `a`, `b` and `result` must each hold `dimension * dimension` doubles and
/// `result` must not overlap `a` or `b`.
#[no_mangle]
pub unsafe extern "C" fn multiply_matrices(
    a: *const c_double,
    b: *const c_double,
    result: *mut c_double,
    dimension: c_int,
) {
    if a.is_null() || b.is_null() || result.is_null() || dimension <= 0 {
        log::debug!("multiply_matrices: rejected arguments (dimension {dimension})");
        return;
    }

    let n = dimension as usize;
    let len = n * n;
    // SAFETY: non-null, caller guarantees `len` elements and no aliasing.
    let (a, b, result) = unsafe {
        (
            slice::from_raw_parts(a, len),
            slice::from_raw_parts(b, len),
            slice::from_raw_parts_mut(result, len),
        )
    };

    if let Err(e) = look_ops::multiply_matrices(a, b, result, n) {
        log::debug!("multiply_matrices: {e}");
    }
}

/// Convert an RGBA image to gray in place, keeping alpha.
///
/// # Safety
/// `rgba_pixels` must hold `width * height * 4` bytes and must not be read
/// concurrently from another thread.
#[no_mangle]
pub unsafe extern "C" fn apply_grayscale_filter(rgba_pixels: *mut u8, width: c_int, height: c_int) {
    // SAFETY: forwarded caller contract.
    let Some(pixels) = (unsafe { rgba_slice(rgba_pixels, width, height) }) else {
        log::debug!("apply_grayscale_filter: rejected arguments ({width}x{height})");
        return;
    };

    if let Err(e) = look_ops::grayscale_in_place(pixels, width as usize, height as usize) {
        log::debug!("apply_grayscale_filter: {e}");
    }
}

/// Blur an RGBA image in place with a 31×31, sigma 11 Gaussian,
/// `iterations` times.
///
/// # Safety
/// Same buffer contract as [`apply_grayscale_filter`].
#[no_mangle]
pub unsafe extern "C" fn apply_heavy_blur(
    rgba_pixels: *mut u8,
    width: c_int,
    height: c_int,
    iterations: c_int,
) {
    if iterations <= 0 {
        return;
    }
    // SAFETY: forwarded caller contract.
    let Some(pixels) = (unsafe { rgba_slice(rgba_pixels, width, height) }) else {
        log::debug!("apply_heavy_blur: rejected arguments ({width}x{height})");
        return;
    };

    let params = BlurParams::default();
    if let Err(e) = look_ops::gaussian_blur_in_place(
        pixels,
        width as usize,
        height as usize,
        iterations as usize,
        &params,
    ) {
        log::debug!("apply_heavy_blur: {e}");
    }
}

/// # Safety
/// When non-null, `ptr` must point at `width * height * 4` writable bytes.
unsafe fn rgba_slice<'a>(ptr: *mut u8, width: c_int, height: c_int) -> Option<&'a mut [u8]> {
    if ptr.is_null() || width <= 0 || height <= 0 {
        return None;
    }
    let len = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
    // SAFETY: non-null, caller guarantees `len` bytes.
    Some(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

/// Convert a YUV420 camera frame to a letterboxed `target_width` ×
/// `target_height` packed RGB image.
///
/// Stages: BT.601 full-range decode, clockwise rotation by
/// `rotation_degrees` (mod 360), optional horizontal mirror, bilinear
/// uniform-scale resize, centring on a black canvas. The five scalar
/// out-parameters are each optional and receive the scale, the padding and
/// the post-rotation size.
///
/// # Safety
/// Each plane must cover every sample addressed by its strides for a
/// `width`×`height` frame with 2×2-subsampled chroma, and `out_rgb_buffer`
/// must hold `target_width * target_height * 3` bytes without overlapping
/// any plane. Non-null out-parameters must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn preprocess_camera_frame(
    y_plane: *const u8,
    y_row_stride: c_int,
    u_plane: *const u8,
    u_row_stride: c_int,
    u_pixel_stride: c_int,
    v_plane: *const u8,
    v_row_stride: c_int,
    v_pixel_stride: c_int,
    width: c_int,
    height: c_int,
    rotation_degrees: c_int,
    flip_horizontal: c_int,
    target_width: c_int,
    target_height: c_int,
    out_rgb_buffer: *mut u8,
    out_scale: *mut c_double,
    out_pad_x: *mut i32,
    out_pad_y: *mut i32,
    out_processed_width: *mut i32,
    out_processed_height: *mut i32,
) {
    if y_plane.is_null()
        || u_plane.is_null()
        || v_plane.is_null()
        || out_rgb_buffer.is_null()
        || width <= 0
        || height <= 0
        || target_width <= 0
        || target_height <= 0
    {
        log::debug!(
            "preprocess_camera_frame: rejected arguments ({width}x{height} -> {target_width}x{target_height})"
        );
        return;
    }

    let raw = RawFrame {
        y_plane,
        y_row_stride,
        u_plane,
        u_row_stride,
        u_pixel_stride,
        v_plane,
        v_row_stride,
        v_pixel_stride,
        width,
        height,
    };
    let options = FrameOptions {
        rotation_degrees,
        flip_horizontal: flip_horizontal != 0,
        target_width: target_width as u32,
        target_height: target_height as u32,
    };

    // SAFETY: forwarded caller contract.
    let lb = match unsafe { preprocess(&raw, options, out_rgb_buffer) } {
        Ok(lb) => lb,
        Err(e) => {
            log::debug!("preprocess_camera_frame: {e:#}");
            return;
        }
    };

    // SAFETY: each pointer is either null (skipped) or writable per contract.
    unsafe {
        write_opt(out_processed_width, lb.processed_width as i32);
        write_opt(out_processed_height, lb.processed_height as i32);
        write_opt(out_scale, lb.scale);
        write_opt(out_pad_x, lb.pad_x as i32);
        write_opt(out_pad_y, lb.pad_y as i32);
    }
}

/// Raw plane arguments of [`preprocess_camera_frame`], pointers non-null.
struct RawFrame {
    y_plane: *const u8,
    y_row_stride: c_int,
    u_plane: *const u8,
    u_row_stride: c_int,
    u_pixel_stride: c_int,
    v_plane: *const u8,
    v_row_stride: c_int,
    v_pixel_stride: c_int,
    width: c_int,
    height: c_int,
}

/// # Safety
/// Pointers in `raw` and `out` must satisfy the
/// [`preprocess_camera_frame`] contract.
unsafe fn preprocess(raw: &RawFrame, options: FrameOptions, out: *mut u8) -> Result<Letterbox> {
    ensure!(raw.width > 0 && raw.height > 0, "frame size must be positive");
    let (w, h) = (raw.width as usize, raw.height as usize);
    let (cw, ch) = chroma_size(w, h);

    let y_stride = row_stride(raw.y_row_stride, PlaneKind::Y)?;
    let u_stride = row_stride(raw.u_row_stride, PlaneKind::U)?;
    let v_stride = row_stride(raw.v_row_stride, PlaneKind::V)?;
    let u_pixel = raw.u_pixel_stride.max(1) as usize;
    let v_pixel = raw.v_pixel_stride.max(1) as usize;

    // SAFETY: caller guarantees each plane covers its addressed samples,
    // which is exactly `required_len` bytes from the base pointer.
    let (y_data, u_data, v_data) = unsafe {
        (
            plane_slice(raw.y_plane, w, h, y_stride, 1, PlaneKind::Y)?,
            plane_slice(raw.u_plane, cw, ch, u_stride, u_pixel, PlaneKind::U)?,
            plane_slice(raw.v_plane, cw, ch, v_stride, v_pixel, PlaneKind::V)?,
        )
    };

    let frame = YuvFrame::new(
        w,
        h,
        PlaneView::luma(y_data, w, h, y_stride).context("Y plane")?,
        PlaneView::chroma(PlaneKind::U, u_data, w, h, u_stride, u_pixel).context("U plane")?,
        PlaneView::chroma(PlaneKind::V, v_data, w, h, v_stride, v_pixel).context("V plane")?,
    )
    .context("assembling YUV420 frame")?;
    if !frame.has_even_dimensions() {
        log::debug!("preprocess_camera_frame: odd frame {w}x{h}, replicating edge chroma");
    }

    let preprocessor = Preprocessor::from_options(options);
    // SAFETY: caller guarantees `output_len()` writable bytes, disjoint from
    // every plane.
    let out = unsafe { slice::from_raw_parts_mut(out, preprocessor.output_len()) };
    preprocessor
        .run(&frame, out)
        .context("running preprocessing pipeline")
}

fn row_stride(stride: c_int, plane: PlaneKind) -> Result<usize> {
    usize::try_from(stride).with_context(|| format!("{plane} row stride {stride} is negative"))
}

/// # Safety
/// `ptr` must be valid for `required_len(width, height, row_stride,
/// pixel_stride)` bytes.
unsafe fn plane_slice<'a>(
    ptr: *const u8,
    width: usize,
    height: usize,
    row_stride: usize,
    pixel_stride: usize,
    plane: PlaneKind,
) -> Result<&'a [u8]> {
    let len = required_len(width, height, row_stride, pixel_stride)
        .with_context(|| format!("{plane} plane size overflows"))?;
    // SAFETY: forwarded from the caller.
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// # Safety
/// `ptr` must be null or valid for a write of `T`.
unsafe fn write_opt<T>(ptr: *mut T, value: T) {
    // SAFETY: forwarded from the caller.
    if let Some(slot) = unsafe { ptr.as_mut() } {
        *slot = value;
    }
}
