//! JSON configuration for the extraction pipeline.
pub mod pipeline;
pub mod template;

pub use self::pipeline::{load_config, PipelineConfig};
pub use self::template::TemplateLayout;
