//! Rotation with canvas expansion.
//!
//! Positive angles rotate counter-clockwise as displayed (y axis pointing
//! down). The output canvas grows to the bounding box of the rotated input so
//! no pixel is cropped; uncovered pixels are fully transparent.
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use nalgebra::Matrix3;

/// Canvas size for a `width × height` image rotated by `degrees`, truncated
/// to whole pixels.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let theta = degrees.to_radians();
    let (abs_sin, abs_cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (width as f64, height as f64);
    let bound_w = (h * abs_sin + w * abs_cos) as u32;
    let bound_h = (h * abs_cos + w * abs_sin) as u32;
    (bound_w, bound_h)
}

/// Affine map from input to output pixel coordinates: rotate about the input
/// centre, then move that centre to the centre of the expanded canvas.
pub fn rotation_matrix(width: u32, height: u32, degrees: f64) -> Matrix3<f64> {
    let theta = degrees.to_radians();
    let (s, c) = theta.sin_cos();
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let (bound_w, bound_h) = rotated_bounds(width, height, degrees);

    let to_origin = Matrix3::new(1.0, 0.0, -cx, 0.0, 1.0, -cy, 0.0, 0.0, 1.0);
    let rotate = Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0);
    let to_canvas = Matrix3::new(
        1.0,
        0.0,
        bound_w as f64 / 2.0,
        0.0,
        1.0,
        bound_h as f64 / 2.0,
        0.0,
        0.0,
        1.0,
    );
    to_canvas * rotate * to_origin
}

/// Rotate `image` by `degrees` and expand the canvas to avoid cropping.
pub fn rotate_image(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (bound_w, bound_h) = rotated_bounds(width, height, degrees);
    let mut out = RgbaImage::new(bound_w, bound_h);
    if width == 0 || height == 0 || bound_w == 0 || bound_h == 0 {
        return out;
    }

    let m = rotation_matrix(width, height, degrees);
    let row_major = [
        m[(0, 0)] as f32,
        m[(0, 1)] as f32,
        m[(0, 2)] as f32,
        m[(1, 0)] as f32,
        m[(1, 1)] as f32,
        m[(1, 2)] as f32,
        m[(2, 0)] as f32,
        m[(2, 1)] as f32,
        m[(2, 2)] as f32,
    ];
    match Projection::from_matrix(row_major) {
        Some(projection) => warp_into(
            image,
            &projection,
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
            &mut out,
        ),
        // a rotation is always invertible; keep the blank canvas otherwise
        None => log::warn!("rotation by {degrees}° produced a singular transform"),
    }
    out
}
