// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Pagesift: documents, extraction attempts, and the
// per-document outcome produced by the converter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PagesiftError;

/// Text counts as usable when something other than whitespace is left after trimming.
pub fn is_usable_text(text: &str) -> bool {
    !text.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// One input PDF, identified by its path.
///
/// Encryption is not tracked here; each strategy discovers it for itself
/// when it opens the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    path: PathBuf,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File stem used to name the `.txt` output (`report.pdf` → `report`).
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

// ---------------------------------------------------------------------------
// Extraction methods
// ---------------------------------------------------------------------------

/// Every engine that can produce text for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    /// `lopdf` page-by-page text extraction (cheapest, tried first).
    Lopdf,
    /// `pdf-extract` whole-document, layout-tolerant extraction.
    PdfExtract,
    /// `pdf_oxide`, an independent parser with xref reconstruction.
    PdfOxide,
    /// Rendered pages recognised in-process by `ocrs`.
    OcrLibrary,
    /// Rendered pages recognised by an external `tesseract` process.
    OcrTesseract,
}

impl ExtractionMethod {
    /// Default text-layer order: cheapest and most common case first.
    pub const TEXT_LAYER: [ExtractionMethod; 3] = [
        ExtractionMethod::Lopdf,
        ExtractionMethod::PdfExtract,
        ExtractionMethod::PdfOxide,
    ];

    pub fn is_ocr(self) -> bool {
        matches!(self, ExtractionMethod::OcrLibrary | ExtractionMethod::OcrTesseract)
    }

    pub fn label(self) -> &'static str {
        match self {
            ExtractionMethod::Lopdf => "lopdf",
            ExtractionMethod::PdfExtract => "pdf-extract",
            ExtractionMethod::PdfOxide => "pdf-oxide",
            ExtractionMethod::OcrLibrary => "ocr-library",
            ExtractionMethod::OcrTesseract => "ocr-tesseract",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExtractionMethod {
    type Err = PagesiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "lopdf" => Ok(ExtractionMethod::Lopdf),
            "pdf-extract" => Ok(ExtractionMethod::PdfExtract),
            "pdf-oxide" => Ok(ExtractionMethod::PdfOxide),
            "ocr-library" => Ok(ExtractionMethod::OcrLibrary),
            "ocr-tesseract" => Ok(ExtractionMethod::OcrTesseract),
            other => Err(PagesiftError::Config(format!(
                "unknown extraction method '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Attempts
// ---------------------------------------------------------------------------

/// What a single strategy (or OCR variant) produced for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Engine produced text (not yet checked for usability by the chain).
    Success(String),
    /// Engine ran cleanly but found no text layer.
    EmptyResult,
    /// Engine is not present in this build or environment.
    EngineUnavailable(String),
    /// Engine raised while processing the document.
    Failure(String),
}

impl AttemptOutcome {
    /// Classify raw engine output: blank text becomes `EmptyResult`.
    pub fn from_text(text: String) -> Self {
        if is_usable_text(&text) {
            AttemptOutcome::Success(text)
        } else {
            AttemptOutcome::EmptyResult
        }
    }

    /// The text, if this outcome carries usable text.
    pub fn usable_text(&self) -> Option<&str> {
        match self {
            AttemptOutcome::Success(text) if is_usable_text(text) => Some(text),
            _ => None,
        }
    }

    pub fn kind(&self) -> AttemptKind {
        match self {
            AttemptOutcome::Success(_) => AttemptKind::Success,
            AttemptOutcome::EmptyResult => AttemptKind::EmptyResult,
            AttemptOutcome::EngineUnavailable(_) => AttemptKind::EngineUnavailable,
            AttemptOutcome::Failure(_) => AttemptKind::Failure,
        }
    }
}

/// Payload-free tag of an [`AttemptOutcome`], used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptKind {
    Success,
    EmptyResult,
    EngineUnavailable,
    Failure,
}

/// One strategy invocation against one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionAttempt {
    pub method: ExtractionMethod,
    pub outcome: AttemptOutcome,
}

impl ExtractionAttempt {
    pub fn new(method: ExtractionMethod, outcome: AttemptOutcome) -> Self {
        Self { method, outcome }
    }

    pub fn is_usable(&self) -> bool {
        self.outcome.usable_text().is_some()
    }

    /// Summary kept after the text has been handed on.
    pub fn record(&self) -> AttemptRecord {
        let (detail, chars) = match &self.outcome {
            AttemptOutcome::Success(text) => (None, Some(text.trim().chars().count())),
            AttemptOutcome::EmptyResult => (None, None),
            AttemptOutcome::EngineUnavailable(why) | AttemptOutcome::Failure(why) => {
                (Some(why.clone()), None)
            }
        };
        AttemptRecord {
            method: self.method,
            kind: self.outcome.kind(),
            detail,
            chars,
        }
    }
}

/// Text-free record of an attempt, kept on the outcome for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub method: ExtractionMethod,
    pub kind: AttemptKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chars: Option<usize>,
}

// ---------------------------------------------------------------------------
// Per-document state machine
// ---------------------------------------------------------------------------

/// States a document passes through while being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentState {
    Pending,
    ChainRunning,
    ChainSucceeded,
    ChainExhausted,
    OcrRunning,
    OcrSucceeded,
    OcrFailed,
    /// Terminal: text obtained (from the chain or OCR).
    Extracted,
    /// Terminal: nothing usable obtained, or the result could not be stored.
    Failed,
}

impl DocumentState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentState::Extracted | DocumentState::Failed)
    }

    /// Transitions allowed by the conversion state machine.
    pub fn can_advance_to(self, next: DocumentState) -> bool {
        use DocumentState::*;
        matches!(
            (self, next),
            (Pending, ChainRunning)
                | (ChainRunning, ChainSucceeded)
                | (ChainRunning, ChainExhausted)
                | (ChainExhausted, OcrRunning)
                | (ChainExhausted, Failed)
                | (OcrRunning, OcrSucceeded)
                | (OcrRunning, OcrFailed)
                | (ChainSucceeded, Extracted)
                | (OcrSucceeded, Extracted)
                | (OcrFailed, Failed)
                // a sink failure turns an otherwise successful document into a failure
                | (ChainSucceeded, Failed)
                | (OcrSucceeded, Failed)
                // panics caught by the batch driver
                | (Pending, Failed)
        )
    }
}

/// Ordered record of visited states, starting at `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTrail(Vec<DocumentState>);

impl StateTrail {
    pub fn new() -> Self {
        Self(vec![DocumentState::Pending])
    }

    pub fn current(&self) -> DocumentState {
        *self.0.last().unwrap_or(&DocumentState::Pending)
    }

    /// Move to `next`. Illegal transitions are a programming error.
    pub fn advance(&mut self, next: DocumentState) {
        debug_assert!(
            self.current().can_advance_to(next),
            "illegal document state transition {:?} -> {:?}",
            self.current(),
            next
        );
        self.0.push(next);
    }

    pub fn states(&self) -> &[DocumentState] {
        &self.0
    }
}

impl Default for StateTrail {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Terminal status of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalStatus {
    Extracted,
    ExtractedViaOcr,
    Failed,
}

/// Why a document ended up `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum FailureReason {
    /// Every text-layer strategy (and OCR, if it ran) came back without usable text.
    NoText,
    /// OCR was requested but no OCR engine could be used, and no Tesseract executable resolved.
    OcrUnresolved,
    /// OCR was requested but every variant reported its engine missing, so no
    /// recognition ran. Says nothing about the document itself.
    OcrUnavailable(String),
    /// Text was obtained but the output sink rejected it.
    Sink(String),
    /// A collaborator panicked while converting the document.
    Panicked(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoText => f.write_str("no extractable text"),
            FailureReason::OcrUnresolved => {
                f.write_str("no extractable text and OCR unavailable (Tesseract not found)")
            }
            FailureReason::OcrUnavailable(detail) => {
                write!(f, "no extractable text and OCR could not run: {detail}")
            }
            FailureReason::Sink(detail) => write!(f, "output failed: {detail}"),
            FailureReason::Panicked(detail) => write!(f, "converter panicked: {detail}"),
        }
    }
}

/// Resolved result for a document after the chain and, possibly, OCR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub status: TerminalStatus,
    /// Engine that produced the text, if any.
    pub method: Option<ExtractionMethod>,
    /// Extracted text; never serialised into reports.
    #[serde(skip)]
    pub text: Option<String>,
    /// Where the sink stored the text, when it was written to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
    pub attempts: Vec<AttemptRecord>,
    pub states: StateTrail,
}

impl ExtractionOutcome {
    /// Successful outcome. `text` must be usable.
    pub fn extracted(
        method: ExtractionMethod,
        text: String,
        attempts: Vec<AttemptRecord>,
        states: StateTrail,
    ) -> Self {
        debug_assert!(is_usable_text(&text), "extracted outcome with blank text");
        let status = if method.is_ocr() {
            TerminalStatus::ExtractedViaOcr
        } else {
            TerminalStatus::Extracted
        };
        Self {
            status,
            method: Some(method),
            text: Some(text),
            output: None,
            failure: None,
            attempts,
            states,
        }
    }

    pub fn failed(reason: FailureReason, attempts: Vec<AttemptRecord>, states: StateTrail) -> Self {
        Self {
            status: TerminalStatus::Failed,
            method: None,
            text: None,
            output: None,
            failure: Some(reason),
            attempts,
            states,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status != TerminalStatus::Failed
    }
}
