// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Primary text-layer reader built on `lopdf`: fast page iteration, empty-password
// decryption, and all-or-nothing page handling.

use std::path::Path;

use lopdf::Document as PdfFile;
use pagesift_core::error::{PagesiftError, Result};
use pagesift_core::types::{AttemptOutcome, Document, ExtractionMethod};
use tracing::{debug, instrument, warn};

use crate::strategy::ExtractionStrategy;

/// `lopdf`-based reader, the first strategy in the default chain.
///
/// A single page that fails to extract fails the whole document: a later,
/// more tolerant engine gets the chance instead of the caller receiving
/// silently truncated text.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfReader;

impl LopdfReader {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<PdfFile> {
        let mut pdf = PdfFile::load(path).map_err(|err| {
            PagesiftError::Pdf(format!("failed to open {}: {}", path.display(), err))
        })?;

        // `load` already authenticates and decrypts empty-password files,
        // leaving `/Encrypt` in the trailer. Decrypting again garbles them.
        if pdf.is_encrypted() && pdf.encryption_state.is_none() {
            // Some files carry an /Encrypt dictionary that does not actually
            // block reading, so a failed decrypt is not fatal.
            match pdf.decrypt("") {
                Ok(()) => debug!("decrypted with empty password"),
                Err(err) => warn!(%err, "empty-password decryption failed, reading anyway"),
            }
        }

        Ok(pdf)
    }
}

impl ExtractionStrategy for LopdfReader {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Lopdf
    }

    #[instrument(skip_all, fields(path = %document.path().display()))]
    fn extract(&self, document: &Document) -> AttemptOutcome {
        let pdf = match Self::open(document.path()) {
            Ok(pdf) => pdf,
            Err(err) => return AttemptOutcome::Failure(err.to_string()),
        };

        let pages = pdf.get_pages();
        debug!(pages = pages.len(), "extracting text layer");

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match pdf.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text),
                Err(err) => {
                    return AttemptOutcome::Failure(format!(
                        "page {page_number} could not be read: {err}"
                    ));
                }
            }
        }

        AttemptOutcome::from_text(texts.join("\n"))
    }
}

/// Number of pages in the PDF at `path`, used to drive page rendering.
pub fn page_count(path: &Path) -> Result<u32> {
    let pdf = LopdfReader::open(path)?;
    Ok(pdf.get_pages().len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_failure_not_panic() {
        let outcome = LopdfReader::new().extract(&Document::new("/nonexistent/missing.pdf"));
        assert!(matches!(outcome, AttemptOutcome::Failure(_)));
    }

    #[test]
    fn garbage_bytes_are_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let outcome = LopdfReader::new().extract(&Document::new(&path));
        assert!(matches!(outcome, AttemptOutcome::Failure(_)));
        assert!(page_count(&path).is_err());
    }
}
