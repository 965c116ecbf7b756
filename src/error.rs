//! Error types for the extraction pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while rendering, measuring or persisting floorplans.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The external page renderer failed for a document.
    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The page has fewer sections than the template index requires.
    #[error("{role} section #{index} requested but only {found} section(s) found")]
    MissingSection {
        role: &'static str,
        index: usize,
        found: usize,
    },

    /// No foreground pixels survived erosion of the heading indicator.
    #[error("heading indicator has no foreground pixels after erosion")]
    EmptyIndicator,

    /// No external contour was found in the floorplan section.
    #[error("no building outline found in floorplan section")]
    NoOutline,

    /// The floorplan section cannot accommodate the border margin.
    #[error("section {width}x{height} is too small for a {margin}px border margin")]
    SectionTooSmall { width: u32, height: u32, margin: u32 },

    /// A file name does not yield a document key.
    #[error("cannot derive a document key from {}", .0.display())]
    InvalidDocumentName(PathBuf),
}
