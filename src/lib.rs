//! Heading and building-outline extraction from fixed-template floorplan
//! drawings.
//!
//! A rendered page is split into its framed sections; the template fixes
//! which section holds the compass indicator and which the floorplan body.
//! The indicator yields the drawing's heading, the body yields a recolored
//! silhouette of the building footprint.

// Public modules (stable-ish surface)
pub mod batch;
pub mod config;
pub mod error;
pub mod orientation;
pub mod processor;
pub mod render;
pub mod types;

// Stage modules – public for tools and tests.
pub mod angle;
pub mod heading;
pub mod image;
pub mod outline;
pub mod sections;

// --- High-level re-exports -------------------------------------------------

pub use crate::batch::{BatchOptions, BatchRunner, BatchSummary};
pub use crate::config::{PipelineConfig, TemplateLayout};
pub use crate::error::{Error, Result};
pub use crate::orientation::{OrientationMap, OrientationStore};
pub use crate::processor::{align_to_north, FloorplanProcessor};
pub use crate::render::{AutoRenderer, ImageFileRenderer, PageRenderer, PdftoppmRenderer};
pub use crate::types::{BuildingOutline, HeadingEstimate, PageReport, Rect, Section};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::heading::{estimate_heading, HeadingParams};
    pub use crate::outline::{OutlineExtractor, OutlineParams, OutlineRefiner};
    pub use crate::sections::{extract_sections, SectionParams};
    pub use crate::{FloorplanProcessor, PipelineConfig, Result};
}
