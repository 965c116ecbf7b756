//! Page pipeline tying the extractors to the template layout.
//!
//! ```no_run
//! use floorplan_extractor::config::PipelineConfig;
//! use floorplan_extractor::FloorplanProcessor;
//! use image::RgbaImage;
//!
//! # fn example(page: RgbaImage) -> floorplan_extractor::Result<()> {
//! let processor = FloorplanProcessor::new(PipelineConfig::default())?;
//! let report = processor.process_page(&page)?;
//! println!("heading {:.1}° in {:.1} ms", report.heading.degrees, report.latency_ms);
//! # Ok(())
//! # }
//! ```
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::heading::estimate_heading;
use crate::image::rotate_image;
use crate::outline::{OutlineExtractor, OutlineRefiner};
use crate::sections::{extract_sections, select_section};
use crate::types::{BuildingOutline, HeadingEstimate, PageReport, Section};
use image::RgbaImage;
use log::debug;
use std::time::Instant;

pub const FLOORPLAN_ROLE: &str = "floorplan";
pub const HEADING_ROLE: &str = "heading";

/// Runs section extraction, heading estimation and outline extraction on
/// rendered pages of one template.
pub struct FloorplanProcessor {
    config: PipelineConfig,
    outline: OutlineExtractor,
}

impl FloorplanProcessor {
    /// Create a processor; the configuration is validated first.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let outline = OutlineExtractor::new(config.outline.clone());
        Ok(Self { config, outline })
    }

    /// Swap the outline refinement strategy.
    pub fn with_refiner(mut self, refiner: Box<dyn OutlineRefiner>) -> Self {
        self.outline = self.outline.with_refiner(refiner);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// All sections of the page, largest first.
    pub fn sections(&self, page: &RgbaImage) -> Vec<Section> {
        extract_sections(page, &self.config.sections)
    }

    /// Heading of the indicator section at the configured template index.
    pub fn heading_from_sections(&self, sections: &[Section]) -> Result<HeadingEstimate> {
        let section = select_section(sections, self.config.template.heading_index, HEADING_ROLE)?;
        estimate_heading(&section.image, &self.config.heading)
    }

    /// Outline of the floorplan section at the configured template index.
    pub fn outline_from_sections(&self, sections: &[Section]) -> Result<BuildingOutline> {
        let section =
            select_section(sections, self.config.template.floorplan_index, FLOORPLAN_ROLE)?;
        self.outline.extract(&section.image)
    }

    /// Heading only; the batch path skips outline extraction.
    pub fn heading_for_page(&self, page: &RgbaImage) -> Result<HeadingEstimate> {
        let sections = self.sections(page);
        self.heading_from_sections(&sections)
    }

    /// Heading and outline of one rendered page.
    pub fn process_page(&self, page: &RgbaImage) -> Result<PageReport> {
        let t0 = Instant::now();
        let sections = self.sections(page);
        debug!(
            "page {}x{}: {} sections (template needs {})",
            page.width(),
            page.height(),
            sections.len(),
            self.config.template.required_sections()
        );
        let heading = self.heading_from_sections(&sections)?;
        let outline = self.outline_from_sections(&sections)?;
        Ok(PageReport {
            section_count: sections.len(),
            heading,
            outline,
            latency_ms: t0.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

/// Rotate an outline so drawing north points up.
pub fn align_to_north(outline: &BuildingOutline, heading: &HeadingEstimate) -> RgbaImage {
    rotate_image(&outline.image, 90.0 - heading.degrees)
}
