// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tertiary reader built on `pdf_oxide`, an independent parser with its own
// cross-reference reconstruction. It authenticates empty user passwords when
// the file is opened.

use pagesift_core::types::{AttemptOutcome, Document, ExtractionMethod};
use tracing::instrument;

use crate::strategy::ExtractionStrategy;

/// `pdf_oxide` reader. Compiled out without the `pdf-oxide` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfOxideReader;

impl PdfOxideReader {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionStrategy for PdfOxideReader {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfOxide
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "pdf-oxide")
    }

    #[cfg(feature = "pdf-oxide")]
    #[instrument(skip_all, fields(path = %document.path().display()))]
    fn extract(&self, document: &Document) -> AttemptOutcome {
        use pdf_oxide::PdfDocument;

        let mut pdf = match PdfDocument::open(document.path()) {
            Ok(pdf) => pdf,
            Err(err) => return AttemptOutcome::Failure(format!("pdf_oxide could not open: {err}")),
        };
        let pages = match pdf.page_count() {
            Ok(pages) => pages,
            Err(err) => return AttemptOutcome::Failure(format!("pdf_oxide page tree: {err}")),
        };

        let mut texts = Vec::with_capacity(pages);
        for index in 0..pages {
            match pdf.extract_text(index) {
                Ok(text) => texts.push(text),
                Err(err) => {
                    return AttemptOutcome::Failure(format!(
                        "page {} could not be read: {err}",
                        index + 1
                    ));
                }
            }
        }

        AttemptOutcome::from_text(texts.join("\n"))
    }

    #[cfg(not(feature = "pdf-oxide"))]
    #[instrument(skip_all, fields(path = %document.path().display()))]
    fn extract(&self, document: &Document) -> AttemptOutcome {
        let _ = document;
        AttemptOutcome::EngineUnavailable("built without the `pdf-oxide` feature".into())
    }
}
