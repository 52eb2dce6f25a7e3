// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterisation for OCR. The shipped renderer drives Poppler's `pdftoppm`
// one page at a time so a page that fails to render only costs that page.
// Pages are counted with lopdf, falling back to Poppler's `pdfinfo` for files
// lopdf cannot parse; those are often the ones that reach OCR at all.

use std::path::{Path, PathBuf};
use std::process::Command;

use pagesift_core::error::{PagesiftError, Result};
use pagesift_core::types::Document;
use tracing::{debug, instrument, warn};

use crate::pdf;

/// Turns PDF pages into image files.
pub trait PageRenderer: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    /// Number of pages to render.
    fn page_count(&self, document: &Document) -> Result<u32>;

    /// Render 1-based `page` into the `scratch` directory and return the image path.
    fn render_page(&self, document: &Document, page: u32, scratch: &Path) -> Result<PathBuf>;
}

/// Renderer backed by the `pdftoppm` executable.
#[derive(Debug, Clone)]
pub struct PdftoppmRenderer {
    program: Option<PathBuf>,
    pdfinfo: Option<PathBuf>,
    dpi: u32,
}

impl PdftoppmRenderer {
    /// Look `pdftoppm` and `pdfinfo` up on PATH.
    pub fn new(dpi: u32) -> Self {
        Self {
            program: which::which("pdftoppm").ok(),
            pdfinfo: which::which("pdfinfo").ok(),
            dpi,
        }
    }

    pub fn with_program(program: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            program: Some(program.into()),
            pdfinfo: None,
            dpi,
        }
    }

    pub fn with_pdfinfo(mut self, pdfinfo: impl Into<PathBuf>) -> Self {
        self.pdfinfo = Some(pdfinfo.into());
        self
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    fn pdfinfo_page_count(&self, path: &Path) -> Result<u32> {
        let program = self.pdfinfo.as_ref().ok_or_else(|| {
            PagesiftError::EngineUnavailable("pdfinfo not found (install poppler-utils)".into())
        })?;

        let output = Command::new(program).arg(path).output()?;
        if !output.status.success() {
            return Err(PagesiftError::Render(format!(
                "pdfinfo failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        parse_pdfinfo_pages(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| PagesiftError::Render("pdfinfo reported no page count".into()))
    }
}

/// The `Pages:` line of `pdfinfo` output.
fn parse_pdfinfo_pages(stdout: &str) -> Option<u32> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|count| count.trim().parse().ok())
}

impl PageRenderer for PdftoppmRenderer {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn page_count(&self, document: &Document) -> Result<u32> {
        match pdf::page_count(document.path()) {
            Ok(pages) if pages > 0 => Ok(pages),
            Ok(_) => self.pdfinfo_page_count(document.path()),
            Err(err) => {
                warn!(%err, "lopdf cannot count pages, asking pdfinfo");
                self.pdfinfo_page_count(document.path())
            }
        }
    }

    #[instrument(skip(self, document, scratch), fields(path = %document.path().display()))]
    fn render_page(&self, document: &Document, page: u32, scratch: &Path) -> Result<PathBuf> {
        let program = self.program.as_ref().ok_or_else(|| {
            PagesiftError::EngineUnavailable("pdftoppm not found (install poppler-utils)".into())
        })?;

        let page_str = page.to_string();
        let dpi_str = self.dpi.to_string();
        let prefix = scratch.join(format!("page-{page}"));

        let output = Command::new(program)
            .args(["-png", "-singlefile", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
            .arg(document.path())
            .arg(&prefix)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let image = prefix.with_extension("png");
                if image.is_file() {
                    debug!(page, image = %image.display(), "page rendered");
                    Ok(image)
                } else {
                    Err(PagesiftError::Render(format!("no image generated for page {page}")))
                }
            }
            Ok(output) => Err(PagesiftError::Render(format!(
                "pdftoppm failed on page {page}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(
                PagesiftError::EngineUnavailable("pdftoppm not found (install poppler-utils)".into()),
            ),
            Err(err) => Err(PagesiftError::Io(err)),
        }
    }
}
