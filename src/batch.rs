//! Batch driver: headings for a directory of floorplan PDFs.
//!
//! Documents are named `<key>_<anything>.pdf`; every key is measured once.
//! Keys already present in the map (for instance loaded from a previous run)
//! are skipped, as are later files sharing a key with an earlier one. When a
//! store is attached the map is persisted as soon as a heading is measured, so
//! a failure never loses completed work.
use crate::error::{Error, Result};
use crate::image::io::save_rgba_png;
use crate::orientation::{OrientationMap, OrientationStore};
use crate::processor::{align_to_north, FloorplanProcessor};
use crate::render::{is_pdf, PageRenderer};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Document key: the file stem up to its first underscore.
pub fn document_key(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidDocumentName(path.to_path_buf()))?;
    let key = stem.split('_').next().unwrap_or(stem);
    if key.is_empty() {
        return Err(Error::InvalidDocumentName(path.to_path_buf()));
    }
    Ok(key.to_string())
}

/// PDF files directly inside `dir`, sorted by path.
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut docs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_pdf(&path) {
            docs.push(path);
        }
    }
    docs.sort();
    Ok(docs)
}

#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Abort on the first failing document (after persisting progress).
    pub fail_fast: bool,
    /// When set, also extract each outline and write `<key>.png` here,
    /// rotated so drawing north points up. Outline failures never abort the
    /// run or drop the key's heading; they are recorded in
    /// [`BatchSummary::failed`].
    pub outline_dir: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            fail_fast: true,
            outline_dir: None,
        }
    }
}

/// A document that could not be measured.
#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub map: OrientationMap,
    /// Keys measured during this run, in processing order.
    pub processed: Vec<String>,
    /// Files skipped because their key already had a heading.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<BatchFailure>,
}

pub struct BatchRunner<R> {
    renderer: R,
    processor: FloorplanProcessor,
    options: BatchOptions,
}

impl<R: PageRenderer> BatchRunner<R> {
    pub fn new(renderer: R, processor: FloorplanProcessor, options: BatchOptions) -> Self {
        Self {
            renderer,
            processor,
            options,
        }
    }

    /// Measure every PDF in `dir`, starting from `map`.
    pub fn run(
        &self,
        dir: &Path,
        map: OrientationMap,
        store: Option<&OrientationStore>,
    ) -> Result<BatchSummary> {
        self.run_documents(&list_documents(dir)?, map, store)
    }

    /// Measure an explicit list of documents, starting from `map`.
    pub fn run_documents(
        &self,
        documents: &[PathBuf],
        map: OrientationMap,
        store: Option<&OrientationStore>,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary {
            map,
            ..Default::default()
        };
        info!(
            "batch: {} document(s), {} key(s) already known",
            documents.len(),
            summary.map.len()
        );

        for path in documents {
            match self.process_document(path, &mut summary, store) {
                Ok(()) => {}
                Err(error) if !self.options.fail_fast => {
                    warn!("batch: {} failed: {error}", path.display());
                    summary.failed.push(BatchFailure {
                        path: path.clone(),
                        error,
                    });
                }
                Err(error) => {
                    warn!(
                        "batch: aborting at {} after {} document(s): {error}",
                        path.display(),
                        summary.processed.len()
                    );
                    return Err(error);
                }
            }
        }

        info!(
            "batch: {} processed, {} skipped, {} failed",
            summary.processed.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    fn process_document(
        &self,
        path: &Path,
        summary: &mut BatchSummary,
        store: Option<&OrientationStore>,
    ) -> Result<()> {
        let key = document_key(path)?;
        if summary.map.contains(&key) {
            info!("batch: skip {} (key {key} known)", path.display());
            summary.skipped.push(path.to_path_buf());
            return Ok(());
        }

        let page = self.renderer.render_first_page(path)?;
        let sections = self.processor.sections(&page);
        let heading = self.processor.heading_from_sections(&sections)?;

        info!("batch: {key} -> {:.2}°", heading.degrees);
        summary.map.insert(key.clone(), heading.degrees);
        summary.processed.push(key.clone());
        if let Some(store) = store {
            store.save(&summary.map)?;
        }

        if let Some(dir) = &self.options.outline_dir {
            let written = self
                .processor
                .outline_from_sections(&sections)
                .and_then(|outline| {
                    let aligned = align_to_north(&outline, &heading);
                    save_rgba_png(&aligned, &dir.join(format!("{key}.png")))
                });
            if let Err(error) = written {
                warn!("batch: outline for {key} failed, heading kept: {error}");
                summary.failed.push(BatchFailure {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefix_before_first_underscore() {
        assert_eq!(document_key(Path::new("pdfs/1_2.pdf")).unwrap(), "1");
        assert_eq!(document_key(Path::new("E52_0_3.pdf")).unwrap(), "E52");
        assert_eq!(document_key(Path::new("W20.pdf")).unwrap(), "W20");
        assert!(matches!(
            document_key(Path::new("_1.pdf")),
            Err(Error::InvalidDocumentName(_))
        ));
    }

    #[test]
    fn listing_keeps_only_pdfs_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["2_1.pdf", "1_1.PDF", "notes.txt", "1_2.pdf"] {
            fs::write(dir.path().join(name), b"").expect("write");
        }
        fs::create_dir(dir.path().join("3_1.pdf")).expect("mkdir");
        let names: Vec<String> = list_documents(dir.path())
            .expect("list")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["1_1.PDF", "1_2.pdf", "2_1.pdf"]);
    }
}
