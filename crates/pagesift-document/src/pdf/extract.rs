// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Secondary reader built on `pdf-extract`: slower, whole-document, and more
// tolerant of unusual layouts and font encodings than page-wise `lopdf`.

use pagesift_core::types::{AttemptOutcome, Document, ExtractionMethod};
use tracing::instrument;

use crate::strategy::ExtractionStrategy;

/// `pdf-extract` reader. Compiled out without the `pdf-extract` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractReader;

impl PdfExtractReader {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionStrategy for PdfExtractReader {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfExtract
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "pdf-extract")
    }

    #[cfg(feature = "pdf-extract")]
    #[instrument(skip_all, fields(path = %document.path().display()))]
    fn extract(&self, document: &Document) -> AttemptOutcome {
        // Panics inside pdf-extract are caught by the chain.
        match pdf_extract::extract_text(document.path()) {
            Ok(text) => AttemptOutcome::from_text(text),
            Err(err) => AttemptOutcome::Failure(format!("pdf-extract failed: {err}")),
        }
    }

    #[cfg(not(feature = "pdf-extract"))]
    #[instrument(skip_all, fields(path = %document.path().display()))]
    fn extract(&self, document: &Document) -> AttemptOutcome {
        let _ = document;
        AttemptOutcome::EngineUnavailable("built without the `pdf-extract` feature".into())
    }
}
