//! Top-level section extraction from a rendered page.
//!
//! The drawing template frames each part of the sheet (floorplan body,
//! compass, title block, ...) with its own rectangle. Those frames are found as
//! the outermost contours of the page's edge map:
//!
//! 1. grayscale + Gaussian blur,
//! 2. Canny edges, lightly closed,
//! 3. external contours only (outer borders without a parent),
//! 4. shoelace area filter and a stable descending sort,
//! 5. axis-aligned crop of each contour's bounds.
//!
//! Because the template is fixed, the position of a frame in the area order
//! identifies it; see [`crate::config::TemplateLayout`].
use crate::error::{Error, Result};
use crate::image::close_binary;
use crate::types::{Rect, Section};
use image::{imageops, GrayImage, RgbaImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;
use log::debug;
use serde::Deserialize;

/// Knobs of the section extractor.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SectionParams {
    /// Gaussian sigma applied before edge detection (≈ 5×5 kernel).
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Contours enclosing this many px² or fewer are discarded.
    pub min_area: f64,
    /// Closing radius applied to the edge map so frame corners form closed
    /// loops. `0` traces raw Canny output.
    pub edge_close_radius: u8,
}

impl Default for SectionParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            min_area: 1000.0,
            edge_close_radius: 1,
        }
    }
}

/// Polygon area of a closed contour (shoelace formula, unsigned).
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    twice.unsigned_abs() as f64 * 0.5
}

/// Outer borders that are not nested in any other border.
pub fn external_contours(binary: &GrayImage) -> Vec<Contour<i32>> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect()
}

/// Edge map used to trace section frames.
pub fn section_edges(page: &RgbaImage, params: &SectionParams) -> GrayImage {
    let gray = imageops::grayscale(page);
    let blurred = if params.blur_sigma > 0.0 {
        gaussian_blur_f32(&gray, params.blur_sigma)
    } else {
        gray
    };
    let edges = canny(&blurred, params.canny_low, params.canny_high);
    close_binary(&edges, params.edge_close_radius)
}

/// Find the page's top-level sections, largest first.
///
/// Fewer sections than a template expects is not an error here; use
/// [`select_section`] for validated access.
pub fn extract_sections(page: &RgbaImage, params: &SectionParams) -> Vec<Section> {
    let edges = section_edges(page, params);
    let contours = external_contours(&edges);

    let mut measured: Vec<(f64, Rect)> = contours
        .iter()
        .filter_map(|c| {
            let area = polygon_area(&c.points);
            if area <= params.min_area {
                return None;
            }
            Rect::bounding(&c.points).map(|r| (area, r))
        })
        .collect();
    // stable: equal areas keep trace order
    measured.sort_by(|a, b| b.0.total_cmp(&a.0));

    debug!(
        "sections: {} external contours, {} above {} px²",
        contours.len(),
        measured.len(),
        params.min_area
    );

    measured
        .into_iter()
        .map(|(area, bounds)| Section {
            bounds,
            contour_area: area,
            image: imageops::crop_imm(page, bounds.x, bounds.y, bounds.width, bounds.height)
                .to_image(),
        })
        .collect()
}

/// Fetch the section at a template index, failing with a descriptive error
/// when the page has fewer sections.
pub fn select_section<'a>(
    sections: &'a [Section],
    index: usize,
    role: &'static str,
) -> Result<&'a Section> {
    sections.get(index).ok_or(Error::MissingSection {
        role,
        index,
        found: sections.len(),
    })
}
