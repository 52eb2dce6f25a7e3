// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagesift.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Pagesift operations.
#[derive(Debug, Error)]
pub enum PagesiftError {
    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("extraction engine not available: {0}")]
    EngineUnavailable(String),

    // -- Output --
    #[error("could not write output for {path}: {detail}")]
    Sink { path: PathBuf, detail: String },

    // -- Run-level (fatal) --
    #[error("input path not found: {0}")]
    InputNotFound(PathBuf),

    #[error("no PDF documents found")]
    NoDocuments,

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PagesiftError {
    /// Whether this error ends the whole run rather than a single document.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PagesiftError::InputNotFound(_) | PagesiftError::Config(_) | PagesiftError::NoDocuments
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagesiftError>;
