// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process OCR using the `ocrs` crate, a pure-Rust engine backed by neural
// network models executed via `rten`.
//
// # Feature Gate
//
// Recognition is only compiled in with the `ocr` feature:
//
// ```toml
// pagesift-document = { path = "crates/pagesift-document", features = ["ocr"] }
// ```
//
// Without it `OcrsRecognizer` still exists but reports itself unavailable, so
// escalation moves straight on to Tesseract.
//
// # Model Setup
//
// Two model files are needed:
//
// - **Detection model** (`text-detection.rten`) locates text regions.
// - **Recognition model** (`text-recognition.rten`) decodes the characters.
//
// Running `ocrs-cli` once downloads both to `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where they are looked for by default.
//
// **Important:** `ocrs` and `rten` are 10-100x slower in debug builds.

use std::path::{Path, PathBuf};
#[cfg(feature = "ocr")]
use std::sync::OnceLock;

use pagesift_core::error::{PagesiftError, Result};
use pagesift_core::types::ExtractionMethod;
#[cfg(feature = "ocr")]
use tracing::{debug, info, instrument};

use super::backend::PageRecognizer;

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Default directory for cached model files: `$XDG_CACHE_HOME/ocrs`, falling
/// back to `~/.cache/ocrs`.
pub fn default_model_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two `ocrs` model files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrModels {
    pub detection: PathBuf,
    pub recognition: PathBuf,
}

impl Default for OcrModels {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrModels {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection: dir.join(DETECTION_MODEL_FILENAME),
            recognition: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Explicit directory if given, otherwise the cache directory.
    pub fn resolve(dir: Option<&Path>) -> Self {
        dir.map(Self::from_dir).unwrap_or_default()
    }

    pub fn present(&self) -> bool {
        self.detection.is_file() && self.recognition.is_file()
    }

    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [("detection", &self.detection), ("recognition", &self.recognition)] {
            if !path.is_file() {
                return Err(PagesiftError::EngineUnavailable(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Page recogniser backed by `ocrs`.
///
/// Models are loaded on first use and the engine is then shared by every page
/// of every document in the run.
pub struct OcrsRecognizer {
    models: OcrModels,
    #[cfg(feature = "ocr")]
    engine: OnceLock<std::result::Result<ocrs::OcrEngine, String>>,
}

impl OcrsRecognizer {
    pub fn new(models: OcrModels) -> Self {
        Self {
            models,
            #[cfg(feature = "ocr")]
            engine: OnceLock::new(),
        }
    }

    pub fn models(&self) -> &OcrModels {
        &self.models
    }

    #[cfg(feature = "ocr")]
    fn engine(&self) -> Result<&ocrs::OcrEngine> {
        self.engine
            .get_or_init(|| load_engine(&self.models))
            .as_ref()
            .map_err(|err| PagesiftError::EngineUnavailable(err.clone()))
    }
}

#[cfg(feature = "ocr")]
#[instrument(skip_all, fields(
    detection = %models.detection.display(),
    recognition = %models.recognition.display(),
))]
fn load_engine(models: &OcrModels) -> std::result::Result<ocrs::OcrEngine, String> {
    use ocrs::{OcrEngine, OcrEngineParams};
    use rten::Model;

    models.validate().map_err(|err| err.to_string())?;

    info!("loading OCR models");
    let detection_model = Model::load_file(&models.detection)
        .map_err(|err| format!("failed to load detection model: {err}"))?;
    let recognition_model = Model::load_file(&models.recognition)
        .map_err(|err| format!("failed to load recognition model: {err}"))?;

    OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        ..Default::default()
    })
    .map_err(|err| format!("failed to initialise OCR engine: {err}"))
}

impl PageRecognizer for OcrsRecognizer {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::OcrLibrary
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "ocr") && self.models.present()
    }

    fn availability_hint(&self) -> String {
        if !cfg!(feature = "ocr") {
            "built without the `ocr` feature".to_string()
        } else if let Err(err) = self.models.validate() {
            err.to_string()
        } else {
            "ocrs models found".to_string()
        }
    }

    #[cfg(feature = "ocr")]
    #[instrument(skip_all, fields(image = %image.display()))]
    fn recognize_page(&self, image: &Path) -> Result<String> {
        use ocrs::ImageSource;

        let engine = self.engine()?;
        let img = image::open(image)
            .map_err(|err| PagesiftError::Ocr(format!("cannot decode rendered page: {err}")))?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            PagesiftError::Ocr(format!("failed to create image source ({width}x{height}): {err}"))
        })?;
        let input = engine
            .prepare_input(source)
            .map_err(|err| PagesiftError::Ocr(format!("preprocessing failed: {err}")))?;
        let text = engine
            .get_text(&input)
            .map_err(|err| PagesiftError::Ocr(format!("recognition failed: {err}")))?;

        debug!(lines = text.lines().count(), chars = text.chars().count(), "page recognised");
        Ok(text)
    }

    #[cfg(not(feature = "ocr"))]
    fn recognize_page(&self, _image: &Path) -> Result<String> {
        Err(PagesiftError::EngineUnavailable(
            "built without the `ocr` feature".into(),
        ))
    }
}
