//! Building-outline extraction from the floorplan section.
//!
//! Wall lines in the drawing leave small gaps (doors, windows, hatching). A
//! strong closing merges them into one region whose outer contour is the
//! building footprint. That contour masks the section, the result is cropped
//! to the footprint and its ink is recolored to a highlight colour.
//!
//! Contour post-processing is pluggable through [`OutlineRefiner`]; the
//! default [`Identity`] strategy keeps the traced contour.
use crate::error::{Error, Result};
use crate::image::{binarize_otsu_inverted, close_binary, erode_rgba3x3};
use crate::sections::{external_contours, polygon_area};
use crate::types::{BuildingOutline, Rect};
use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;

/// Post-processing applied to the traced outline before masking.
pub trait OutlineRefiner {
    fn name(&self) -> &str;
    fn refine(&self, contour: &[Point<i32>]) -> Vec<Point<i32>>;
}

/// Keeps the traced contour as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl OutlineRefiner for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn refine(&self, contour: &[Point<i32>]) -> Vec<Point<i32>> {
        contour.to_vec()
    }
}

/// Smooths shallow convexity defects.
///
/// The contour is split at its convex-hull vertices. Every run between two
/// consecutive hull vertices whose deepest point lies at most `max_depth`
/// pixels from the hull edge is replaced by that edge; deeper runs (real
/// courtyards, wings) are kept.
#[derive(Clone, Copy, Debug)]
pub struct HullDefectSmoothing {
    pub max_depth: f64,
}

impl OutlineRefiner for HullDefectSmoothing {
    fn name(&self) -> &str {
        "hull-defect-smoothing"
    }

    fn refine(&self, contour: &[Point<i32>]) -> Vec<Point<i32>> {
        if contour.len() < 4 {
            return contour.to_vec();
        }
        let hull = convex_hull(contour.to_vec());
        if hull.len() < 3 {
            return contour.to_vec();
        }

        let mut first_index: HashMap<(i32, i32), usize> = HashMap::with_capacity(contour.len());
        for (i, p) in contour.iter().enumerate() {
            first_index.entry((p.x, p.y)).or_insert(i);
        }
        let mut anchors: Vec<usize> = hull
            .iter()
            .filter_map(|p| first_index.get(&(p.x, p.y)).copied())
            .collect();
        anchors.sort_unstable();
        anchors.dedup();
        if anchors.len() < 3 {
            return contour.to_vec();
        }

        let n = contour.len();
        let mut out = Vec::with_capacity(n);
        for (k, &start) in anchors.iter().enumerate() {
            let end = anchors[(k + 1) % anchors.len()];
            let run_len = (end + n - start) % n;
            let run: Vec<Point<i32>> = (0..=run_len).map(|j| contour[(start + j) % n]).collect();
            if defect_depth(&run) <= self.max_depth {
                out.push(contour[start]);
            } else {
                out.extend_from_slice(&run[..run.len() - 1]);
            }
        }
        out
    }
}

/// Largest distance from the points of `run` to the chord joining its ends.
fn defect_depth(run: &[Point<i32>]) -> f64 {
    let (Some(a), Some(b)) = (run.first(), run.last()) else {
        return 0.0;
    };
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let len = (dx * dx + dy * dy).sqrt();
    run.iter()
        .map(|p| {
            let (px, py) = (p.x as f64 - ax, p.y as f64 - ay);
            if len < 1e-9 {
                (px * px + py * py).sqrt()
            } else {
                (dx * py - dy * px).abs() / len
            }
        })
        .fold(0.0, f64::max)
}

/// Serializable selection of an [`OutlineRefiner`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefinerKind {
    #[default]
    Identity,
    HullDefectSmoothing { max_depth: f64 },
}

impl RefinerKind {
    pub fn build(&self) -> Box<dyn OutlineRefiner> {
        match *self {
            RefinerKind::Identity => Box::new(Identity),
            RefinerKind::HullDefectSmoothing { max_depth } => {
                Box::new(HullDefectSmoothing { max_depth })
            }
        }
    }
}

/// Knobs of the outline extractor.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutlineParams {
    /// Pixels trimmed from every side of the section (frame and labels).
    pub border_margin: u32,
    /// Closing radius merging wall-line gaps.
    pub close_radius: u8,
    /// Channels at or below this value (on opaque pixels) count as ink.
    pub dark_max: u8,
    /// RGBA colour painted over ink pixels.
    pub highlight: [u8; 4],
    pub refiner: RefinerKind,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            border_margin: 100,
            close_radius: 3,
            dark_max: 200,
            highlight: [200, 0, 0, 255],
            refiner: RefinerKind::Identity,
        }
    }
}

/// Closed wall mask of a section: Otsu-inverted ink, then closing.
pub fn wall_mask(section: &RgbaImage, close_radius: u8) -> GrayImage {
    let gray = imageops::grayscale(section);
    let (binary, level) = binarize_otsu_inverted(&gray);
    debug!("outline: otsu={level} close_radius={close_radius}");
    close_binary(&binary, close_radius)
}

/// Largest external contour of a binary image by enclosed area.
pub fn dominant_contour(binary: &GrayImage) -> Option<(Vec<Point<i32>>, f64)> {
    external_contours(binary)
        .into_iter()
        .map(|c| {
            let area = polygon_area(&c.points);
            (c.points, area)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

/// Building-outline extractor with a pluggable refinement step.
pub struct OutlineExtractor {
    params: OutlineParams,
    refiner: Box<dyn OutlineRefiner>,
}

impl OutlineExtractor {
    pub fn new(params: OutlineParams) -> Self {
        let refiner = params.refiner.build();
        Self { params, refiner }
    }

    /// Replace the refinement strategy chosen by the parameters.
    pub fn with_refiner(mut self, refiner: Box<dyn OutlineRefiner>) -> Self {
        self.refiner = refiner;
        self
    }

    pub fn extract(&self, section: &RgbaImage) -> Result<BuildingOutline> {
        let margin = self.params.border_margin;
        let (w, h) = section.dimensions();
        if w <= 2 * margin || h <= 2 * margin {
            return Err(Error::SectionTooSmall {
                width: w,
                height: h,
                margin,
            });
        }
        let trimmed = imageops::crop_imm(section, margin, margin, w - 2 * margin, h - 2 * margin)
            .to_image();

        let closed = wall_mask(&trimmed, self.params.close_radius);
        let (traced, traced_area) = dominant_contour(&closed).ok_or(Error::NoOutline)?;
        let contour = self.refiner.refine(&traced);
        let bounds = Rect::bounding(&contour).ok_or(Error::NoOutline)?;
        debug!(
            "outline: {} -> {} points ({}), area {:.0}px², bounds {}x{}",
            traced.len(),
            contour.len(),
            self.refiner.name(),
            traced_area,
            bounds.width,
            bounds.height
        );

        let mask = polygon_mask(trimmed.width(), trimmed.height(), &contour);
        let mut masked = trimmed;
        for (px, m) in masked.pixels_mut().zip(mask.pixels()) {
            if m[0] == 0 {
                *px = Rgba([0, 0, 0, 0]);
            }
        }

        let cropped =
            imageops::crop_imm(&masked, bounds.x, bounds.y, bounds.width, bounds.height).to_image();
        let mut image = erode_rgba3x3(&cropped);
        recolor_ink(&mut image, self.params.dark_max, Rgba(self.params.highlight));

        Ok(BuildingOutline {
            image,
            area: polygon_area(&contour),
            contour,
            bounds,
        })
    }
}

/// Filled polygon mask, including the boundary pixels themselves.
fn polygon_mask(width: u32, height: u32, contour: &[Point<i32>]) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let mut poly: Vec<Point<i32>> = contour.to_vec();
    // the polygon drawer rejects explicitly closed polygons
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() >= 3 {
        draw_polygon_mut(&mut mask, &poly, Luma([255u8]));
    }
    for p in contour {
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
            mask.put_pixel(p.x as u32, p.y as u32, Luma([255]));
        }
    }
    mask
}

/// Paint opaque pixels whose colour channels are all `<= dark_max`.
pub fn recolor_ink(image: &mut RgbaImage, dark_max: u8, highlight: Rgba<u8>) {
    for px in image.pixels_mut() {
        let [r, g, b, a] = px.0;
        if a == 255 && r <= dark_max && g <= dark_max && b <= dark_max {
            *px = highlight;
        }
    }
}
