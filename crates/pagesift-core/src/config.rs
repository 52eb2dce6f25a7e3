// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration. Read-only once a batch starts; shared by every document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagesiftError, Result};
use crate::types::ExtractionMethod;

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Text-layer strategies, in the order they are tried.
    pub strategies: Vec<ExtractionMethod>,
    pub ocr: OcrSettings,
    pub output: OutputSettings,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            strategies: ExtractionMethod::TEXT_LAYER.to_vec(),
            ocr: OcrSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

/// OCR fallback settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Run OCR when no text layer is found.
    pub enabled: bool,
    /// Explicit Tesseract executable; overrides PATH lookup.
    pub tesseract_path: Option<PathBuf>,
    /// Tesseract language code.
    pub language: String,
    /// Rendering resolution for rasterised pages.
    pub dpi: u32,
    /// Directory holding the `ocrs` model files.
    pub model_dir: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            tesseract_path: None,
            language: "eng".to_string(),
            dpi: 200,
            model_dir: None,
        }
    }
}

/// Where extracted text goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory for `.txt` files; `None` writes next to each PDF.
    pub out_dir: Option<PathBuf>,
    /// Print text to stdout instead of writing files.
    pub to_stdout: bool,
}

impl ConvertConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            PagesiftError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: ConvertConfig = serde_json::from_str(&raw).map_err(|err| {
            PagesiftError::Config(format!("cannot parse {}: {}", path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(PagesiftError::Config(
                "at least one text extraction strategy is required".into(),
            ));
        }
        if let Some(method) = self.strategies.iter().find(|m| m.is_ocr()) {
            return Err(PagesiftError::Config(format!(
                "'{method}' is an OCR method and cannot be listed as a text strategy"
            )));
        }
        for (i, method) in self.strategies.iter().enumerate() {
            if self.strategies[..i].contains(method) {
                return Err(PagesiftError::Config(format!(
                    "strategy '{method}' is listed twice"
                )));
            }
        }
        if !(50..=1200).contains(&self.ocr.dpi) {
            return Err(PagesiftError::Config(format!(
                "OCR dpi must be between 50 and 1200, got {}",
                self.ocr.dpi
            )));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(PagesiftError::Config("OCR language must not be empty".into()));
        }
        Ok(())
    }
}
