use std::ptr;

use ffi_plugin_look::{
    apply_grayscale_filter, apply_heavy_blur, multiply_matrices, preprocess_camera_frame, sum,
    sum_long_running,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scalar outputs of one `preprocess_camera_frame` call, pre-set to
/// sentinels so skipped writes are visible.
#[derive(Debug, PartialEq)]
struct Outputs {
    scale: f64,
    pad_x: i32,
    pad_y: i32,
    processed_width: i32,
    processed_height: i32,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            scale: -1.0,
            pad_x: -1,
            pad_y: -1,
            processed_width: -1,
            processed_height: -1,
        }
    }
}

/// Tightly packed I420 frame.
struct Frame {
    w: i32,
    h: i32,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
}

impl Frame {
    fn chroma_stride(&self) -> i32 {
        (self.w + 1) / 2
    }

    fn run(&self, rotation: i32, flip: i32, tw: i32, th: i32, out: &mut [u8], o: &mut Outputs) {
        let cs = self.chroma_stride();
        unsafe {
            preprocess_camera_frame(
                self.y.as_ptr(),
                self.w,
                self.u.as_ptr(),
                cs,
                1,
                self.v.as_ptr(),
                cs,
                1,
                self.w,
                self.h,
                rotation,
                flip,
                tw,
                th,
                out.as_mut_ptr(),
                &mut o.scale,
                &mut o.pad_x,
                &mut o.pad_y,
                &mut o.processed_width,
                &mut o.processed_height,
            );
        }
    }
}

#[test]
fn gray_frame_spot_check() {
    init();
    let frame = Frame {
        w: 2,
        h: 2,
        y: vec![16; 4],
        u: vec![128],
        v: vec![128],
    };
    let mut out = [0u8; 12];
    let mut o = Outputs::default();
    frame.run(0, 0, 2, 2, &mut out, &mut o);

    assert_eq!(out, [16u8; 12]);
    assert_eq!(
        o,
        Outputs {
            scale: 1.0,
            pad_x: 0,
            pad_y: 0,
            processed_width: 2,
            processed_height: 2,
        }
    );
}

#[test]
fn saturated_red_frame() {
    let frame = Frame {
        w: 2,
        h: 2,
        y: vec![255; 4],
        u: vec![128],
        v: vec![255],
    };
    let mut out = [0u8; 12];
    frame.run(0, 0, 2, 2, &mut out, &mut Outputs::default());

    for px in out.chunks_exact(3) {
        assert_eq!(px, &[255, 164, 255]);
    }
}

#[test]
fn letterbox_pads_columns() {
    let frame = Frame {
        w: 2,
        h: 4,
        y: vec![200; 8],
        u: vec![128; 2],
        v: vec![128; 2],
    };
    let mut out = [7u8; 48];
    let mut o = Outputs::default();
    frame.run(0, 0, 4, 4, &mut out, &mut o);

    assert_eq!((o.scale, o.pad_x, o.pad_y), (1.0, 1, 0));
    for row in out.chunks_exact(12) {
        assert_eq!(&row[0..3], &[0, 0, 0]);
        assert_eq!(&row[3..9], &[200; 6]);
        assert_eq!(&row[9..12], &[0, 0, 0]);
    }
}

#[test]
fn clockwise_quarter_turn_swaps_size() {
    let frame = Frame {
        w: 2,
        h: 1,
        y: vec![50, 60],
        u: vec![128],
        v: vec![128],
    };
    let mut out = [0u8; 2 * 2 * 3];
    let mut o = Outputs::default();
    frame.run(90, 0, 2, 2, &mut out, &mut o);

    assert_eq!((o.processed_width, o.processed_height), (1, 2));
    // One spare column; integer halving puts all of it on the right.
    assert_eq!((o.pad_x, o.pad_y), (0, 0));
    assert_eq!(&out[0..3], &[50, 50, 50]);
    assert_eq!(&out[6..9], &[60, 60, 60]);
    assert_eq!(&out[3..6], &[0, 0, 0]);
    assert_eq!(&out[9..12], &[0, 0, 0]);
}

#[test]
fn null_out_parameters_are_skipped_independently() {
    let y = [16u8; 4];
    let uv = [128u8];
    let mut out = [0u8; 12];
    let mut pad_y = -1i32;
    let mut width = -1i32;

    unsafe {
        preprocess_camera_frame(
            y.as_ptr(),
            2,
            uv.as_ptr(),
            1,
            0,
            uv.as_ptr(),
            1,
            0,
            2,
            2,
            0,
            0,
            2,
            2,
            out.as_mut_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
            &mut pad_y,
            &mut width,
            ptr::null_mut(),
        );
    }

    assert_eq!(out, [16u8; 12]);
    assert_eq!(pad_y, 0);
    assert_eq!(width, 2);
}

#[test]
fn invalid_arguments_write_nothing() {
    let frame = Frame {
        w: 2,
        h: 2,
        y: vec![16; 4],
        u: vec![128],
        v: vec![128],
    };
    let mut out = [9u8; 12];
    let mut o = Outputs::default();

    frame.run(0, 0, 0, 2, &mut out, &mut o);
    frame.run(0, 0, 2, -3, &mut out, &mut o);
    assert_eq!(out, [9u8; 12]);
    assert_eq!(o, Outputs::default());

    unsafe {
        preprocess_camera_frame(
            ptr::null(),
            2,
            frame.u.as_ptr(),
            1,
            1,
            frame.v.as_ptr(),
            1,
            1,
            2,
            2,
            0,
            0,
            2,
            2,
            out.as_mut_ptr(),
            &mut o.scale,
            &mut o.pad_x,
            &mut o.pad_y,
            &mut o.processed_width,
            &mut o.processed_height,
        );
    }
    assert_eq!(out, [9u8; 12]);
    assert_eq!(o, Outputs::default());
}

#[test]
fn negative_rotation_is_normalised() {
    let frame = Frame {
        w: 4,
        h: 2,
        y: (0..8).map(|i| i * 20).collect(),
        u: vec![128; 2],
        v: vec![128; 2],
    };
    let mut a = [0u8; 2 * 4 * 3];
    let mut b = [0u8; 2 * 4 * 3];
    let mut oa = Outputs::default();
    let mut ob = Outputs::default();

    frame.run(-90, 1, 2, 4, &mut a, &mut oa);
    frame.run(270, 1, 2, 4, &mut b, &mut ob);

    assert_eq!(a, b);
    assert_eq!(oa, ob);
    assert_eq!((oa.processed_width, oa.processed_height), (2, 4));
}

#[test]
fn grayscale_preserves_alpha_and_is_idempotent() {
    let mut img = [255u8, 0, 0, 10, 0, 255, 0, 20, 0, 0, 255, 30, 9, 99, 199, 40];
    unsafe { apply_grayscale_filter(img.as_mut_ptr(), 2, 2) };
    assert_eq!(img, [76, 76, 76, 10, 150, 150, 150, 20, 29, 29, 29, 30, 83, 83, 83, 40]);

    let once = img;
    unsafe { apply_grayscale_filter(img.as_mut_ptr(), 2, 2) };
    assert_eq!(img, once);

    unsafe { apply_grayscale_filter(ptr::null_mut(), 2, 2) };
    unsafe { apply_grayscale_filter(img.as_mut_ptr(), 0, 2) };
    assert_eq!(img, once);
}

#[test]
fn heavy_blur_noops_and_runs() {
    let mut img: Vec<u8> = (0..8 * 8 * 4).map(|i| (i * 37 % 256) as u8).collect();
    let before = img.clone();

    unsafe {
        apply_heavy_blur(img.as_mut_ptr(), 8, 8, 0);
        apply_heavy_blur(img.as_mut_ptr(), 8, 8, -2);
        apply_heavy_blur(img.as_mut_ptr(), -8, 8, 1);
        apply_heavy_blur(ptr::null_mut(), 8, 8, 1);
    }
    assert_eq!(img, before);

    unsafe { apply_heavy_blur(img.as_mut_ptr(), 8, 8, 1) };
    assert_ne!(img, before);
}

#[test]
fn matrix_identity() {
    let a = [1.0, 2.0, 3.0, 4.0];
    let b = [1.0, 0.0, 0.0, 1.0];
    let mut result = [0.0; 4];

    unsafe { multiply_matrices(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), 2) };
    assert_eq!(result, [1.0, 2.0, 3.0, 4.0]);

    let mut untouched = [5.0; 4];
    unsafe {
        multiply_matrices(a.as_ptr(), ptr::null(), untouched.as_mut_ptr(), 2);
        multiply_matrices(a.as_ptr(), b.as_ptr(), untouched.as_mut_ptr(), 0);
    }
    assert_eq!(untouched, [5.0; 4]);
}

#[test]
fn short_probe() {
    assert_eq!(sum(40, 2), 42);
}

#[test]
#[ignore]
fn long_running_probe() {
    let start = std::time::Instant::now();
    assert_eq!(sum_long_running(40, 2), 42);
    assert!(start.elapsed() >= std::time::Duration::from_secs(4));
}
