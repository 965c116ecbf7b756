//! Heading estimation from the template's compass indicator.
//!
//! The indicator is a circle with a solid arrow head. Thin strokes (circle,
//! lettering) vanish under erosion while the arrow head survives, so the
//! centroid of the remaining ink points from the indicator centre towards
//! drawing north:
//!
//! 1. grayscale, Otsu threshold, inverted (ink is foreground),
//! 2. square erosion (10×10 by default),
//! 3. centroid of the surviving foreground,
//! 4. bearing of the centroid from the fixed indicator centre.
use crate::angle::bearing_degrees;
use crate::error::{Error, Result};
use crate::image::{binarize_otsu_inverted, erode_square};
use crate::types::HeadingEstimate;
use image::{imageops, GrayImage, RgbaImage};
use log::debug;
use serde::Deserialize;

/// Knobs of the heading estimator.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HeadingParams {
    /// Indicator centre in section pixel coordinates `(x, y)`.
    pub center: (f64, f64),
    /// Side of the square erosion element, anchored at `kernel_size / 2`.
    /// `0` and `1` disable erosion.
    pub kernel_size: u8,
}

impl Default for HeadingParams {
    fn default() -> Self {
        Self {
            center: (228.0, 192.0),
            kernel_size: 10,
        }
    }
}

/// Mean position of the foreground pixels of a binary image, with the pixel
/// count. `None` when there is no foreground.
pub fn foreground_centroid(binary: &GrayImage) -> Option<((f64, f64), usize)> {
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut count = 0usize;
    for (x, y, px) in binary.enumerate_pixels() {
        if px[0] != 0 {
            sum_x += x as f64;
            sum_y += y as f64;
            count += 1;
        }
    }
    (count > 0).then(|| ((sum_x / count as f64, sum_y / count as f64), count))
}

/// Estimate the drawing heading from a cropped indicator section.
///
/// Returns [`Error::EmptyIndicator`] when erosion leaves no foreground.
pub fn estimate_heading(section: &RgbaImage, params: &HeadingParams) -> Result<HeadingEstimate> {
    let gray = imageops::grayscale(section);
    let (binary, threshold) = binarize_otsu_inverted(&gray);
    let eroded = erode_square(&binary, params.kernel_size);

    let (centroid, foreground_pixels) =
        foreground_centroid(&eroded).ok_or(Error::EmptyIndicator)?;
    let degrees = bearing_degrees(params.center, centroid);

    debug!(
        "heading: otsu={threshold} fg={foreground_pixels} centroid=({:.1}, {:.1}) -> {degrees:.2}°",
        centroid.0, centroid.1
    );

    Ok(HeadingEstimate {
        degrees,
        centroid,
        foreground_pixels,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn centroid_of_square() {
        let img = GrayImage::from_fn(10, 10, |x, y| {
            Luma([if (2..6).contains(&x) && (4..8).contains(&y) { 255 } else { 0 }])
        });
        let ((cx, cy), n) = foreground_centroid(&img).expect("foreground");
        assert_eq!(n, 16);
        assert!((cx - 3.5).abs() < 1e-12);
        assert!((cy - 5.5).abs() < 1e-12);
    }

    #[test]
    fn thin_strokes_only_is_empty_indicator() {
        let mut img = RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255]));
        for i in 0..60 {
            img.put_pixel(i, 30, Rgba([0, 0, 0, 255]));
        }
        let params = HeadingParams {
            center: (30.0, 30.0),
            kernel_size: 5,
        };
        assert!(matches!(
            estimate_heading(&img, &params),
            Err(Error::EmptyIndicator)
        ));
    }

    #[test]
    fn mark_as_wide_as_the_kernel_leaves_one_pixel() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        for y in 45..55 {
            for x in 70..80 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let params = HeadingParams {
            center: (50.0, 50.0),
            ..HeadingParams::default()
        };
        let est = estimate_heading(&img, &params).expect("mark survives 10x10 erosion");
        assert_eq!(est.foreground_pixels, 1);
        assert_eq!(est.centroid, (75.0, 50.0));
        assert!(est.degrees.abs() < 1e-12, "{}", est.degrees);
    }
}
