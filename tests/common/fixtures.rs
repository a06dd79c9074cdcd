use edgeroi::{Point2, RunResult};
use image::{GrayImage, Luma, Rgb, RgbImage};

pub const DARK: u8 = 20;
pub const LIGHT: u8 = 220;

/// 100x100 light image with a dark square covering pixels 30..=70 on both
/// axes. Its traced outline is (30,30),(70,30),(70,70),(30,70), area 1600.
pub fn square_scene() -> GrayImage {
    square_scene_at(100, 100, 30, 70)
}

/// Light `width`x`height` image with a dark square over `from..=to`.
pub fn square_scene_at(width: u32, height: u32, from: u32, to: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        if (from..=to).contains(&x) && (from..=to).contains(&y) {
            Luma([DARK])
        } else {
            Luma([LIGHT])
        }
    })
}

/// Dark square of side `2 * half_side` rotated by `degrees` about `center`.
pub fn rotated_square_scene(
    size: u32,
    center: (f64, f64),
    half_side: f64,
    degrees: f64,
) -> GrayImage {
    let (sin, cos) = degrees.to_radians().sin_cos();
    GrayImage::from_fn(size, size, |x, y| {
        let dx = x as f64 - center.0;
        let dy = y as f64 - center.1;
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;
        if u.abs() <= half_side && v.abs() <= half_side {
            Luma([DARK])
        } else {
            Luma([LIGHT])
        }
    })
}

/// Dark right triangle; never a quadrilateral.
pub fn triangle_scene() -> GrayImage {
    GrayImage::from_fn(100, 100, |x, y| {
        if (20..=80).contains(&x) && (20..=80).contains(&y) && x <= y {
            Luma([DARK])
        } else {
            Luma([LIGHT])
        }
    })
}

/// The square scene in the green channel only; red and blue are flat.
pub fn green_square_rgb() -> RgbImage {
    let gray = square_scene();
    RgbImage::from_fn(100, 100, |x, y| Rgb([LIGHT, gray.get_pixel(x, y)[0], LIGHT]))
}

pub fn assert_close(actual: Point2, expected: (f64, f64)) {
    assert!(
        (actual.x - expected.0).abs() < 1e-6 && (actual.y - expected.1).abs() < 1e-6,
        "{actual:?} != {expected:?}"
    );
}

pub type RecordFingerprint = (Vec<u8>, u32, u32, [Point2; 4], [Point2; 4], i64, i64);

/// Geometry and pixels of every record, ignoring timing.
pub fn fingerprint(run: &RunResult) -> Vec<RecordFingerprint> {
    run.results
        .iter()
        .map(|r| {
            (
                r.image.as_raw().clone(),
                r.width,
                r.height,
                r.quadrilateral,
                r.selection,
                r.location.x,
                r.location.y,
            )
        })
        .collect()
}

/// 300x200 scene with a 40px square over 20..=60 and a 120px square over
/// 150..=270 x 40..=160.
pub fn small_and_large_squares() -> GrayImage {
    GrayImage::from_fn(300, 200, |x, y| {
        let small = (20..=60).contains(&x) && (30..=70).contains(&y);
        let large = (150..=270).contains(&x) && (40..=160).contains(&y);
        if small || large {
            Luma([DARK])
        } else {
            Luma([LIGHT])
        }
    })
}
