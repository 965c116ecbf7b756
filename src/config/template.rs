use serde::Deserialize;

/// Positions of the template's frames in the area-ordered section list.
///
/// The drawing template is fixed, so the floorplan body and the compass
/// indicator always land at the same ranks when sections are sorted by area.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateLayout {
    pub floorplan_index: usize,
    pub heading_index: usize,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            floorplan_index: 0,
            heading_index: 6,
        }
    }
}

impl TemplateLayout {
    /// Number of sections a page must have for both lookups to succeed.
    pub fn required_sections(&self) -> usize {
        self.floorplan_index.max(self.heading_index) + 1
    }
}
