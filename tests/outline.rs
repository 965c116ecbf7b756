mod common;

use common::synthetic_image::{fill_rect, walls_with_doors, white_page, INK};
use floorplan_extractor::outline::{
    wall_mask, HullDefectSmoothing, OutlineExtractor, OutlineParams, RefinerKind,
};
use floorplan_extractor::sections::external_contours;
use image::RgbaImage;

fn walls_page() -> RgbaImage {
    let mut page = white_page(140, 140);
    walls_with_doors(&mut page, 25, 25, 90, 90, 4, 4);
    page
}

fn params(close_radius: u8) -> OutlineParams {
    OutlineParams {
        border_margin: 5,
        close_radius,
        ..OutlineParams::default()
    }
}

#[test]
fn wall_gaps_fragment_the_outline_without_closing() {
    let mask = wall_mask(&walls_page(), 0);
    assert_eq!(external_contours(&mask).len(), 2);
}

#[test]
fn closing_merges_wall_gaps_into_one_outline() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mask = wall_mask(&walls_page(), 3);
    assert_eq!(external_contours(&mask).len(), 1);
}

#[test]
fn extractor_crops_to_the_building() {
    let outline = OutlineExtractor::new(params(3))
        .extract(&walls_page())
        .expect("outline");
    // walls span [25, 115) on the page, [20, 110) after the 5px trim
    assert_eq!((outline.bounds.x, outline.bounds.y), (20, 20));
    assert_eq!((outline.bounds.width, outline.bounds.height), (90, 90));
    assert_eq!(outline.image.dimensions(), (90, 90));
    assert!((outline.area - 89.0 * 89.0).abs() < 1.0, "area {}", outline.area);

    let highlight = image::Rgba([200, 0, 0, 255]);
    // wall pixels are recolored, interior paper stays white
    assert_eq!(*outline.image.get_pixel(30, 1), highlight);
    assert_eq!(outline.image.get_pixel(45, 45).0, [255, 255, 255, 255]);
}

#[test]
fn refiner_strategy_is_pluggable() {
    let mut page = walls_page();
    // a shallow bump on the left wall
    fill_rect(&mut page, 21, 60, 4, 10, INK);

    let plain = OutlineExtractor::new(params(3)).extract(&page).expect("outline");
    assert_eq!(plain.bounds.x, 16);

    let smoothed = OutlineExtractor::new(OutlineParams {
        refiner: RefinerKind::HullDefectSmoothing { max_depth: 6.0 },
        ..params(3)
    })
    .extract(&page)
    .expect("outline");
    // hull keeps the bump's extent but fills the shallow notches beside it
    assert_eq!(smoothed.bounds, plain.bounds);
    assert!(smoothed.area > plain.area, "{} <= {}", smoothed.area, plain.area);

    let explicit = OutlineExtractor::new(params(3))
        .with_refiner(Box::new(HullDefectSmoothing { max_depth: 6.0 }))
        .extract(&page)
        .expect("outline");
    assert_eq!(explicit.contour, smoothed.contour);
}

#[test]
fn blank_section_has_no_outline() {
    let page = white_page(60, 60);
    let err = OutlineExtractor::new(params(3)).extract(&page).unwrap_err();
    assert!(matches!(err, floorplan_extractor::Error::NoOutline), "{err}");
}
