// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR abstractions shared by the library-bound and external-process variants.

use std::path::Path;

use pagesift_core::error::Result;
use pagesift_core::types::{AttemptOutcome, Document, ExtractionMethod};

/// A whole-document OCR path, as seen by the escalation logic.
pub trait OcrStrategy: Send + Sync {
    /// Which OCR variant this is.
    fn method(&self) -> ExtractionMethod;

    /// Whether the variant can run at all in this build/environment.
    fn is_available(&self) -> bool;

    /// Human-readable explanation of availability (for logs and `--verbose`).
    fn availability_hint(&self) -> String;

    /// Render and recognise every page of `document`.
    fn recognize(&self, document: &Document) -> AttemptOutcome;
}

/// Recognises text in one rendered page image.
pub trait PageRecognizer: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    fn is_available(&self) -> bool;

    fn availability_hint(&self) -> String;

    fn recognize_page(&self, image: &Path) -> Result<String>;
}
