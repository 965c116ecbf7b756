mod common;

use common::synthetic_image::{fill_rect, template_config, template_page, white_page, INK};
use floorplan_extractor::sections::{extract_sections, select_section, SectionParams};
use floorplan_extractor::Error;

#[test]
fn disjoint_rectangles_yield_one_section_each() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut page = white_page(400, 300);
    // (x, y, w, h): areas 12000, 4000, 2400, 3600
    let rects = [
        (20, 20, 120, 100),
        (200, 30, 80, 50),
        (40, 180, 60, 40),
        (220, 160, 60, 60),
    ];
    for &(x, y, w, h) in &rects {
        fill_rect(&mut page, x, y, w, h, INK);
    }
    // below the area threshold
    fill_rect(&mut page, 330, 250, 20, 20, INK);

    let sections = extract_sections(&page, &SectionParams::default());
    assert_eq!(sections.len(), rects.len(), "sections: {:?}", summaries(&sections));
    for pair in sections.windows(2) {
        assert!(
            pair[0].contour_area >= pair[1].contour_area,
            "areas not ordered: {:?}",
            summaries(&sections)
        );
    }

    // largest first: the 120x100 block, within a pixel or two of its edge
    let first = sections[0].bounds;
    assert!(first.x.abs_diff(20) <= 2 && first.y.abs_diff(20) <= 2, "{first:?}");
    assert!(first.width.abs_diff(120) <= 3 && first.height.abs_diff(100) <= 3, "{first:?}");
    assert_eq!(sections[0].image.dimensions(), (first.width, first.height));
    // then 80x50, 60x60, 60x40
    assert!(sections[1].bounds.width.abs_diff(80) <= 3);
    assert!(sections[2].bounds.width.abs_diff(60) <= 3 && sections[2].bounds.height.abs_diff(60) <= 3);
    assert!(sections[3].bounds.height.abs_diff(40) <= 3);
}

#[test]
fn blank_page_has_no_sections() {
    let page = white_page(200, 200);
    assert!(extract_sections(&page, &SectionParams::default()).is_empty());
}

#[test]
fn nested_content_stays_inside_its_frame() {
    let page = template_page((20, 10));
    let config = template_config();
    let sections = extract_sections(&page, &config.sections);
    assert_eq!(sections.len(), 2, "sections: {:?}", summaries(&sections));
    assert!(sections[0].bounds.width.abs_diff(250) <= 3);
    assert!(sections[1].bounds.width.abs_diff(120) <= 3);
}

#[test]
fn template_index_past_the_end_is_a_descriptive_error() {
    let page = template_page((20, 10));
    let sections = extract_sections(&page, &SectionParams::default());
    let err = select_section(&sections, 6, "heading").unwrap_err();
    assert!(matches!(
        err,
        Error::MissingSection {
            index: 6,
            found: 2,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "heading section #6 requested but only 2 section(s) found"
    );
}

fn summaries(
    sections: &[floorplan_extractor::Section],
) -> Vec<floorplan_extractor::types::SectionSummary> {
    sections
        .iter()
        .enumerate()
        .map(|(i, s)| s.summary(i))
        .collect()
}
