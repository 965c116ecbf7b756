//! Orientation map: document key → heading in degrees, persisted as JSON.
use crate::error::Result;
use crate::image::io::ensure_parent_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Accumulated heading results, keyed by document key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrientationMap {
    entries: BTreeMap<String, f64>,
}

impl OrientationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Insert or replace a heading; returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, degrees: f64) -> Option<f64> {
        self.entries.insert(key.into(), degrees)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// JSON file backing an [`OrientationMap`].
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so an interrupted write never leaves a truncated map behind.
#[derive(Clone, Debug)]
pub struct OrientationStore {
    path: PathBuf,
}

impl OrientationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored map, or an empty one if the file does not exist yet.
    pub fn load(&self) -> Result<OrientationMap> {
        if !self.path.exists() {
            return Ok(OrientationMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, map: &OrientationMap) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let json = serde_json::to_string_pretty(map)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
