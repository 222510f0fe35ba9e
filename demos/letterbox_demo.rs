//! Walk a synthetic camera frame through the preprocessing pipeline.
//!
//! Usage: letterbox_demo <cam_width> <cam_height> <target_width> <target_height> [rotation]

use anyhow::{Context, Result};
use look_ops::{grayscale_in_place, BlurParams};
use look_preprocess::{chroma_size, PlaneKind, PlaneView, Preprocessor, YuvFrame};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let arg = |i: usize, default: u32| -> Result<u32> {
        match args.get(i) {
            Some(s) => s.parse().with_context(|| format!("argument {i}: {s:?}")),
            None => Ok(default),
        }
    };
    let (cam_w, cam_h) = (arg(1, 640)? as usize, arg(2, 480)? as usize);
    let (dst_w, dst_h) = (arg(3, 320)?, arg(4, 320)?);
    let rotation = arg(5, 90)? as i32;

    // Horizontal luma ramp, reddish chroma.
    let (cw, ch) = chroma_size(cam_w, cam_h);
    let y: Vec<u8> = (0..cam_w * cam_h).map(|i| (i % cam_w * 255 / cam_w) as u8).collect();
    let u = vec![110u8; cw * ch];
    let v = vec![170u8; cw * ch];

    let frame = YuvFrame::new(
        cam_w,
        cam_h,
        PlaneView::luma(&y, cam_w, cam_h, cam_w)?,
        PlaneView::chroma(PlaneKind::U, &u, cam_w, cam_h, cw, 1)?,
        PlaneView::chroma(PlaneKind::V, &v, cam_w, cam_h, cw, 1)?,
    )?;

    let preprocessor = Preprocessor::new(dst_w, dst_h).with_rotation(rotation);
    let (rgb, lb) = preprocessor.run_to_vec(&frame)?;
    log::info!("letterbox: {lb:?}");

    println!("camera {cam_w}x{cam_h} -> model {dst_w}x{dst_h}, rotation {rotation}°");
    println!(
        "  processed {}x{}, scale {:.4}, resized {}x{}, pad ({}, {})",
        lb.processed_width, lb.processed_height, lb.scale, lb.resized_width, lb.resized_height, lb.pad_x, lb.pad_y
    );

    let centre = lb.to_source(dst_w as f64 / 2.0, dst_h as f64 / 2.0);
    println!("  model centre maps to source ({:.1}, {:.1})", centre.0, centre.1);

    // Gray + blur the result as RGBA, the way a preview path would.
    let mut rgba: Vec<u8> = rgb.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect();
    grayscale_in_place(&mut rgba, dst_w as usize, dst_h as usize)?;
    look_ops::gaussian_blur_in_place(&mut rgba, dst_w as usize, dst_h as usize, 1, &BlurParams::default())?;
    let mean = rgba.iter().step_by(4).map(|&l| l as u64).sum::<u64>() / (dst_w as u64 * dst_h as u64);
    println!("  mean preview luma {mean}");

    Ok(())
}
