use super::template::TemplateLayout;
use crate::error::{Error, Result};
use crate::heading::HeadingParams;
use crate::outline::{OutlineParams, RefinerKind};
use crate::render::RenderParams;
use crate::sections::SectionParams;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Complete pipeline configuration; every block is optional in JSON.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub render: RenderParams,
    pub template: TemplateLayout,
    pub sections: SectionParams,
    pub heading: HeadingParams,
    pub outline: OutlineParams,
}

impl PipelineConfig {
    /// Reject settings that cannot describe a usable template.
    pub fn validate(&self) -> Result<()> {
        if self.template.floorplan_index == self.template.heading_index {
            return Err(Error::InvalidConfig(format!(
                "floorplan and heading share section index {}",
                self.template.floorplan_index
            )));
        }
        if self.render.dpi == 0 {
            return Err(Error::InvalidConfig("render dpi must be positive".into()));
        }
        let s = &self.sections;
        if !(s.canny_low >= 0.0 && s.canny_low <= s.canny_high) {
            return Err(Error::InvalidConfig(format!(
                "canny thresholds must satisfy 0 <= low <= high (got {} / {})",
                s.canny_low, s.canny_high
            )));
        }
        if !s.min_area.is_finite() || s.min_area < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min section area must be a non-negative number (got {})",
                s.min_area
            )));
        }
        let (cx, cy) = self.heading.center;
        if !cx.is_finite() || !cy.is_finite() {
            return Err(Error::InvalidConfig(
                "heading indicator centre must be finite".into(),
            ));
        }
        if let RefinerKind::HullDefectSmoothing { max_depth } = self.outline.refiner {
            if !max_depth.is_finite() || max_depth < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "hull smoothing depth must be non-negative (got {max_depth})"
                )));
            }
        }
        Ok(())
    }
}

/// Read, parse and validate a pipeline configuration file.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let data = fs::read_to_string(path)?;
    let config: PipelineConfig = serde_json::from_str(&data)?;
    config.validate()?;
    Ok(config)
}
