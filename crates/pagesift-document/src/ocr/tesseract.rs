// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External-process OCR: one `tesseract` invocation per rendered page.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pagesift_core::error::{PagesiftError, Result};
use pagesift_core::types::ExtractionMethod;
use tracing::instrument;

use super::backend::PageRecognizer;
use super::locate::ResolvedExecutable;

/// Page recogniser that shells out to a resolved Tesseract executable.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(executable: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            language: language.into(),
        }
    }

    pub fn from_resolved(resolved: &ResolvedExecutable, language: impl Into<String>) -> Self {
        Self::new(resolved.path.clone(), language)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl PageRecognizer for TesseractRecognizer {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::OcrTesseract
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        format!("tesseract at {}", self.executable.display())
    }

    #[instrument(skip_all, fields(image = %image.display(), lang = %self.language))]
    fn recognize_page(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.executable)
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();
        stdout_or_error(output)
    }
}

/// Stdout of a finished tesseract run, or the error it represents.
fn stdout_or_error(result: std::io::Result<Output>) -> Result<String> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => Err(PagesiftError::Ocr(format!(
            "tesseract failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(
            PagesiftError::EngineUnavailable("tesseract (install tesseract-ocr)".into()),
        ),
        Err(err) => Err(PagesiftError::Io(err)),
    }
}
