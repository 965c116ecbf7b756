//! Data passed between the pipeline stages.
use image::RgbaImage;
use imageproc::point::Point;
use serde::Serialize;

/// Axis-aligned pixel rectangle, `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Tight bounds of a point set. Returns `None` for an empty set.
    pub fn bounding(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        // contour points are pixel positions, never negative
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0 + 1) as u32,
            height: (y1 - y0 + 1) as u32,
        })
    }
}

/// One top-level region of the rendered page.
#[derive(Clone, Debug)]
pub struct Section {
    /// Bounding box of the contour in page coordinates.
    pub bounds: Rect,
    /// Polygon area enclosed by the contour (px²).
    pub contour_area: f64,
    /// Page pixels inside `bounds`.
    pub image: RgbaImage,
}

/// Serializable description of a section (without pixels).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub index: usize,
    pub bounds: Rect,
    pub contour_area: f64,
}

impl Section {
    pub fn summary(&self, index: usize) -> SectionSummary {
        SectionSummary {
            index,
            bounds: self.bounds,
            contour_area: self.contour_area,
        }
    }
}

/// Heading measured from the compass indicator.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingEstimate {
    /// Bearing in degrees, counter-clockwise from the +x axis, in [0, 360).
    pub degrees: f64,
    /// Foreground centroid in section pixel coordinates.
    pub centroid: (f64, f64),
    /// Number of foreground pixels that survived erosion.
    pub foreground_pixels: usize,
    /// Otsu level used for binarization.
    pub threshold: u8,
}

/// Masked, recolored silhouette of the building.
#[derive(Clone, Debug)]
pub struct BuildingOutline {
    pub image: RgbaImage,
    /// Outline polygon in trimmed-section coordinates.
    pub contour: Vec<Point<i32>>,
    /// Bounds of `contour` in trimmed-section coordinates.
    pub bounds: Rect,
    pub area: f64,
}

/// Result of running the whole page pipeline.
#[derive(Clone, Debug)]
pub struct PageReport {
    pub section_count: usize,
    pub heading: HeadingEstimate,
    pub outline: BuildingOutline,
    pub latency_ms: f64,
}
