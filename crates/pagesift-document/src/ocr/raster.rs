// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render-then-recognise OCR: pairs a `PageRenderer` with a `PageRecognizer`.
//
// Rendered pages live in a scratch directory owned by a single attempt; the
// directory is removed when the attempt ends, whatever the result. Unlike the
// text-layer readers, a page that fails here only contributes an empty segment.

use std::sync::Arc;

use pagesift_core::types::{AttemptOutcome, Document, ExtractionMethod};
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use super::backend::{OcrStrategy, PageRecognizer};
use super::render::PageRenderer;

/// OCR variant built from a renderer and a page recogniser.
pub struct RasterOcr<R> {
    renderer: Arc<dyn PageRenderer>,
    recognizer: R,
}

impl<R: PageRecognizer> RasterOcr<R> {
    pub fn new(renderer: Arc<dyn PageRenderer>, recognizer: R) -> Self {
        Self {
            renderer,
            recognizer,
        }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}

impl<R: PageRecognizer> OcrStrategy for RasterOcr<R> {
    fn method(&self) -> ExtractionMethod {
        self.recognizer.method()
    }

    fn is_available(&self) -> bool {
        self.renderer.is_available() && self.recognizer.is_available()
    }

    fn availability_hint(&self) -> String {
        if !self.renderer.is_available() {
            "page renderer not available (install poppler-utils for pdftoppm)".to_string()
        } else {
            self.recognizer.availability_hint()
        }
    }

    #[instrument(skip_all, fields(path = %document.path().display(), method = %self.method()))]
    fn recognize(&self, document: &Document) -> AttemptOutcome {
        if !self.is_available() {
            return AttemptOutcome::EngineUnavailable(self.availability_hint());
        }

        let pages = match self.renderer.page_count(document) {
            Ok(pages) => pages,
            Err(err) => return AttemptOutcome::Failure(format!("cannot count pages: {err}")),
        };

        let scratch = match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => return AttemptOutcome::Failure(format!("cannot create scratch dir: {err}")),
        };

        info!(pages, "running OCR");
        let mut segments = Vec::with_capacity(pages as usize);
        for page in 1..=pages {
            let segment = match self.renderer.render_page(document, page, scratch.path()) {
                Ok(image) => {
                    let text = self.recognizer.recognize_page(&image).unwrap_or_else(|err| {
                        warn!(page, %err, "OCR failed for page");
                        String::new()
                    });
                    let _ = std::fs::remove_file(&image);
                    text
                }
                Err(err) => {
                    warn!(page, %err, "page could not be rendered");
                    String::new()
                }
            };
            debug!(page, chars = segment.chars().count(), "page recognised");
            segments.push(segment);
        }

        AttemptOutcome::from_text(segments.join("\n"))
    }
}
