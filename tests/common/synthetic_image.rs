//! Synthetic drawings mimicking the floorplan template.
use floorplan_extractor::config::PipelineConfig;
use floorplan_extractor::outline::OutlineParams;
use floorplan_extractor::TemplateLayout;
use image::{Rgba, RgbaImage};

pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub fn white_page(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, PAPER)
}

/// Fill `[x, x + w) × [y, y + h)`, clipped to the image.
pub fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for yy in y..(y + h).min(img.height()) {
        for xx in x..(x + w).min(img.width()) {
            img.put_pixel(xx, yy, color);
        }
    }
}

/// Rectangle outline of the given line thickness, drawn inside the rect.
pub fn frame_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, t: u32) {
    fill_rect(img, x, y, w, t, INK);
    fill_rect(img, x, y + h - t, w, t, INK);
    fill_rect(img, x, y, t, h, INK);
    fill_rect(img, x + w - t, y, t, h, INK);
}

/// Square blob of side `side` whose centroid sits at `(cx + dx, cy - dy)`
/// rounded down to the pixel grid. Returns the blob's exact centroid.
pub fn draw_blob(img: &mut RgbaImage, center: (u32, u32), offset: (i32, i32), side: u32) -> (f64, f64) {
    let x0 = (center.0 as i32 + offset.0 - side as i32 / 2) as u32;
    let y0 = (center.1 as i32 - offset.1 - side as i32 / 2) as u32;
    fill_rect(img, x0, y0, side, side, INK);
    let half = (side as f64 - 1.0) / 2.0;
    (x0 as f64 + half, y0 as f64 + half)
}

/// Compass indicator: a thin ring around `center` plus a solid arrow-head blob.
/// Returns the image and the blob centroid.
pub fn heading_indicator(size: u32, center: (u32, u32), offset: (i32, i32)) -> (RgbaImage, (f64, f64)) {
    let mut img = white_page(size, size);
    let radius = size as f64 * 0.375;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 - center.0 as f64;
            let dy = y as f64 - center.1 as f64;
            if ((dx * dx + dy * dy).sqrt() - radius).abs() < 1.0 {
                img.put_pixel(x, y, INK);
            }
        }
    }
    let centroid = draw_blob(&mut img, center, offset, 30);
    (img, centroid)
}

/// Rectangular building walls with door openings in the top and bottom
/// walls, leaving two U-shaped wall fragments.
pub fn walls_with_doors(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, t: u32, door: u32) {
    let mid = x + w / 2 - door / 2;
    fill_rect(img, x, y, mid - x, t, INK);
    fill_rect(img, mid + door, y, x + w - mid - door, t, INK);
    fill_rect(img, x, y + h - t, mid - x, t, INK);
    fill_rect(img, mid + door, y + h - t, x + w - mid - door, t, INK);
    fill_rect(img, x, y, t, h, INK);
    fill_rect(img, x + w - t, y, t, h, INK);
}

/// Heading-indicator frame geometry on [`template_page`].
pub const HEADING_FRAME: (u32, u32, u32) = (280, 10, 120);

/// Two-section sheet: a large floorplan frame with building walls and a
/// smaller indicator frame with an arrow-head blob at `offset` from its
/// centre.
pub fn template_page(offset: (i32, i32)) -> RgbaImage {
    let mut page = white_page(420, 320);
    frame_rect(&mut page, 10, 10, 250, 300, 3);
    walls_with_doors(&mut page, 60, 80, 150, 160, 5, 4);

    let (hx, hy, side) = HEADING_FRAME;
    frame_rect(&mut page, hx, hy, side, side, 3);
    draw_blob(&mut page, (hx + side / 2, hy + side / 2), offset, 24);
    page
}

/// Configuration matching [`template_page`].
pub fn template_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.template = TemplateLayout {
        floorplan_index: 0,
        heading_index: 1,
    };
    let side = HEADING_FRAME.2 as f64;
    config.heading.center = (side / 2.0, side / 2.0);
    config.heading.kernel_size = 7;
    config.outline = OutlineParams {
        border_margin: 10,
        ..OutlineParams::default()
    };
    config
}

/// Analytic bearing of `point` from `center` with image y pointing down.
pub fn expected_bearing(center: (f64, f64), point: (f64, f64)) -> f64 {
    let deg = (center.1 - point.1).atan2(point.0 - center.0).to_degrees();
    if deg < 0.0 {
        deg + 360.0
    } else {
        deg
    }
}
