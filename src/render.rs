//! Page rasterization.
//!
//! Rendering PDFs is delegated to an external program. [`PdftoppmRenderer`]
//! runs poppler's `pdftoppm` for page one and decodes its PNG output from
//! stdout; [`ImageFileRenderer`] accepts already rasterized pages.
use crate::error::{Error, Result};
use crate::image::io::{decode_rgba_image, load_rgba_image};
use image::RgbaImage;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Produces the raster of page one of a document.
pub trait PageRenderer {
    fn render_first_page(&self, path: &Path) -> Result<RgbaImage>;
}

/// Renderer settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    pub dpi: u32,
    /// `pdftoppm` executable, looked up on `PATH` when not absolute.
    pub program: PathBuf,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            dpi: 600,
            program: PathBuf::from("pdftoppm"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PdftoppmRenderer {
    params: RenderParams,
}

impl PdftoppmRenderer {
    pub fn new(params: RenderParams) -> Self {
        Self { params }
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.params.program);
        cmd.arg("-png")
            .arg("-singlefile")
            .args(["-f", "1", "-l", "1"])
            .arg("-r")
            .arg(self.params.dpi.to_string())
            .arg(path);
        cmd
    }
}

impl PageRenderer for PdftoppmRenderer {
    fn render_first_page(&self, path: &Path) -> Result<RgbaImage> {
        let output = self.command(path).output().map_err(|e| Error::Render {
            path: path.to_path_buf(),
            message: format!("failed to run {}: {e}", self.params.program.display()),
        })?;
        if !output.status.success() {
            return Err(Error::Render {
                path: path.to_path_buf(),
                message: format!(
                    "{} exited with {}: {}",
                    self.params.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        let page = decode_rgba_image(&output.stdout)?;
        debug!(
            "rendered {} at {} dpi: {}x{}",
            path.display(),
            self.params.dpi,
            page.width(),
            page.height()
        );
        Ok(page)
    }
}

/// Treats the input as an image file (PNG, JPEG) holding the page raster.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageFileRenderer;

impl PageRenderer for ImageFileRenderer {
    fn render_first_page(&self, path: &Path) -> Result<RgbaImage> {
        load_rgba_image(path)
    }
}

/// True when `path` has a `.pdf` extension (any case).
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Picks `pdftoppm` for PDFs and the image loader for everything else.
#[derive(Clone, Debug, Default)]
pub struct AutoRenderer {
    pdf: PdftoppmRenderer,
}

impl AutoRenderer {
    pub fn new(params: RenderParams) -> Self {
        Self {
            pdf: PdftoppmRenderer::new(params),
        }
    }
}

impl PageRenderer for AutoRenderer {
    fn render_first_page(&self, path: &Path) -> Result<RgbaImage> {
        if is_pdf(path) {
            self.pdf.render_first_page(path)
        } else {
            ImageFileRenderer.render_first_page(path)
        }
    }
}
