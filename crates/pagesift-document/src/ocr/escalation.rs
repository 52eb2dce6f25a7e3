// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR escalation: what happens after the text-layer chain comes back empty.
//
// The library variant is tried first. The external variant only exists when a
// Tesseract executable was resolved up front; without one the escalation ends
// in `Unresolved`, which the converter reports separately from "no text".

use std::sync::Arc;

use pagesift_core::config::OcrSettings;
use pagesift_core::types::{
    AttemptKind, AttemptOutcome, AttemptRecord, Document, ExtractionAttempt, ExtractionMethod,
    is_usable_text,
};
use tracing::{debug, info};

use super::backend::OcrStrategy;
use super::engine::{OcrModels, OcrsRecognizer};
use super::locate::ResolvedExecutable;
use super::raster::RasterOcr;
use super::render::{PageRenderer, PdftoppmRenderer};
use super::tesseract::TesseractRecognizer;
use crate::strategy::guard_engine;

/// Result of an OCR escalation for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// OCR is switched off; nothing was attempted.
    Disabled,
    Recognized {
        method: ExtractionMethod,
        text: String,
        attempts: Vec<AttemptRecord>,
    },
    /// The library variant gave nothing and no Tesseract executable was resolved.
    Unresolved { attempts: Vec<AttemptRecord> },
    /// Every OCR variant ran without producing usable text.
    Exhausted { attempts: Vec<AttemptRecord> },
    /// Every variant reported its engine (or page renderer) missing, so no
    /// recognition ran at all.
    Unavailable { attempts: Vec<AttemptRecord> },
}

impl EscalationOutcome {
    pub fn attempts(&self) -> &[AttemptRecord] {
        match self {
            EscalationOutcome::Disabled => &[],
            EscalationOutcome::Recognized { attempts, .. }
            | EscalationOutcome::Unresolved { attempts }
            | EscalationOutcome::Exhausted { attempts }
            | EscalationOutcome::Unavailable { attempts } => attempts,
        }
    }
}

pub struct OcrEscalation {
    enabled: bool,
    library: Option<Box<dyn OcrStrategy>>,
    external: Option<Box<dyn OcrStrategy>>,
}

impl OcrEscalation {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            library: None,
            external: None,
        }
    }

    /// Enabled escalation over explicit variants. `external` is `None` when no
    /// executable could be resolved.
    pub fn new(
        library: Option<Box<dyn OcrStrategy>>,
        external: Option<Box<dyn OcrStrategy>>,
    ) -> Self {
        Self {
            enabled: true,
            library,
            external,
        }
    }

    /// Stock variants: `ocrs` and Tesseract, both rendering through `pdftoppm`.
    pub fn from_settings(settings: &OcrSettings, tesseract: Option<&ResolvedExecutable>) -> Self {
        if !settings.enabled {
            return Self::disabled();
        }

        let renderer: Arc<dyn PageRenderer> = Arc::new(PdftoppmRenderer::new(settings.dpi));
        let models = OcrModels::resolve(settings.model_dir.as_deref());
        let library: Box<dyn OcrStrategy> = Box::new(RasterOcr::new(
            Arc::clone(&renderer),
            OcrsRecognizer::new(models),
        ));
        let external = tesseract.map(|resolved| {
            Box::new(RasterOcr::new(
                renderer,
                TesseractRecognizer::from_resolved(resolved, settings.language.clone()),
            )) as Box<dyn OcrStrategy>
        });

        Self::new(Some(library), external)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    pub fn run(&self, document: &Document) -> EscalationOutcome {
        if !self.enabled {
            return EscalationOutcome::Disabled;
        }

        let mut attempts = Vec::with_capacity(2);

        if let Some(library) = &self.library {
            if let Some((method, text)) = attempt(library.as_ref(), document, &mut attempts) {
                return EscalationOutcome::Recognized {
                    method,
                    text,
                    attempts,
                };
            }
        }

        let Some(external) = &self.external else {
            info!(%document, "OCR could not run: no tesseract executable resolved");
            return EscalationOutcome::Unresolved { attempts };
        };

        match attempt(external.as_ref(), document, &mut attempts) {
            Some((method, text)) => EscalationOutcome::Recognized {
                method,
                text,
                attempts,
            },
            None if attempts
                .iter()
                .all(|record| record.kind == AttemptKind::EngineUnavailable) =>
            {
                info!(%document, "OCR could not run: no variant has a usable engine");
                EscalationOutcome::Unavailable { attempts }
            }
            None => EscalationOutcome::Exhausted { attempts },
        }
    }
}

/// Run one OCR variant, record the attempt, and hand back usable text.
fn attempt(
    ocr: &dyn OcrStrategy,
    document: &Document,
    attempts: &mut Vec<AttemptRecord>,
) -> Option<(ExtractionMethod, String)> {
    let method = ocr.method();
    let outcome = if ocr.is_available() {
        guard_engine(method, || ocr.recognize(document))
    } else {
        AttemptOutcome::EngineUnavailable(ocr.availability_hint())
    };
    let attempt = ExtractionAttempt::new(method, outcome);
    attempts.push(attempt.record());

    match attempt.outcome {
        AttemptOutcome::Success(text) if is_usable_text(&text) => {
            info!(
                %document,
                %method,
                chars = text.chars().count(),
                "text recognised by OCR"
            );
            Some((method, text))
        }
        other => {
            debug!(%document, %method, kind = ?other.kind(), "OCR gave no usable text");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FakeOcr {
        method: ExtractionMethod,
        available: bool,
        outcome: AttemptOutcome,
        calls: Arc<AtomicUsize>,
    }

    impl FakeOcr {
        fn boxed(
            method: ExtractionMethod,
            available: bool,
            outcome: AttemptOutcome,
        ) -> (Box<dyn OcrStrategy>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let ocr = FakeOcr {
                method,
                available,
                outcome,
                calls: Arc::clone(&calls),
            };
            (Box::new(ocr), calls)
        }
    }

    impl OcrStrategy for FakeOcr {
        fn method(&self) -> ExtractionMethod {
            self.method
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn availability_hint(&self) -> String {
            "fake engine missing".into()
        }

        fn recognize(&self, _document: &Document) -> AttemptOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn scan() -> Document {
        Document::new("scan.pdf")
    }

    #[test]
    fn disabled_escalation_does_nothing() {
        assert_eq!(OcrEscalation::disabled().run(&scan()), EscalationOutcome::Disabled);
        assert!(!OcrEscalation::from_settings(&OcrSettings::default(), None).is_enabled());
    }

    #[test]
    fn library_success_skips_tesseract() {
        let (lib, _) = FakeOcr::boxed(
            ExtractionMethod::OcrLibrary,
            true,
            AttemptOutcome::Success("INVOICE 2024".into()),
        );
        let (ext, ext_calls) = FakeOcr::boxed(
            ExtractionMethod::OcrTesseract,
            true,
            AttemptOutcome::Success("unused".into()),
        );
        let escalation = OcrEscalation::new(Some(lib), Some(ext));

        match escalation.run(&scan()) {
            EscalationOutcome::Recognized { method, text, .. } => {
                assert_eq!(method, ExtractionMethod::OcrLibrary);
                assert_eq!(text, "INVOICE 2024");
            }
            other => panic!("expected recognised text, got {other:?}"),
        }
        assert_eq!(ext_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unavailable_library_falls_back_to_tesseract() {
        let (lib, lib_calls) =
            FakeOcr::boxed(ExtractionMethod::OcrLibrary, false, AttemptOutcome::EmptyResult);
        let (ext, _) = FakeOcr::boxed(
            ExtractionMethod::OcrTesseract,
            true,
            AttemptOutcome::Success("INVOICE 2024\n".into()),
        );

        match OcrEscalation::new(Some(lib), Some(ext)).run(&scan()) {
            EscalationOutcome::Recognized { method, attempts, .. } => {
                assert_eq!(method, ExtractionMethod::OcrTesseract);
                assert_eq!(attempts[0].kind, AttemptKind::EngineUnavailable);
                assert_eq!(attempts[1].kind, AttemptKind::Success);
            }
            other => panic!("expected recognised text, got {other:?}"),
        }
        assert_eq!(lib_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_executable_is_unresolved() {
        let (lib, _) =
            FakeOcr::boxed(ExtractionMethod::OcrLibrary, false, AttemptOutcome::EmptyResult);
        let outcome = OcrEscalation::new(Some(lib), None).run(&scan());
        assert!(matches!(outcome, EscalationOutcome::Unresolved { .. }));
        assert_eq!(outcome.attempts().len(), 1);
    }

    #[test]
    fn blank_ocr_everywhere_is_exhausted() {
        let (lib, _) =
            FakeOcr::boxed(ExtractionMethod::OcrLibrary, true, AttemptOutcome::Success("  ".into()));
        let (ext, _) =
            FakeOcr::boxed(ExtractionMethod::OcrTesseract, true, AttemptOutcome::EmptyResult);
        let outcome = OcrEscalation::new(Some(lib), Some(ext)).run(&scan());
        assert!(matches!(outcome, EscalationOutcome::Exhausted { ref attempts } if attempts.len() == 2));
    }

    #[test]
    fn missing_engines_everywhere_is_unavailable_not_exhausted() {
        let (lib, lib_calls) =
            FakeOcr::boxed(ExtractionMethod::OcrLibrary, false, AttemptOutcome::EmptyResult);
        let (ext, ext_calls) =
            FakeOcr::boxed(ExtractionMethod::OcrTesseract, false, AttemptOutcome::EmptyResult);

        let outcome = OcrEscalation::new(Some(lib), Some(ext)).run(&scan());
        assert!(matches!(outcome, EscalationOutcome::Unavailable { .. }));
        assert_eq!(outcome.attempts().len(), 2);
        assert_eq!(lib_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ext_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn one_engine_that_ran_makes_it_exhausted() {
        let (lib, _) =
            FakeOcr::boxed(ExtractionMethod::OcrLibrary, false, AttemptOutcome::EmptyResult);
        let (ext, _) =
            FakeOcr::boxed(ExtractionMethod::OcrTesseract, true, AttemptOutcome::EmptyResult);

        let outcome = OcrEscalation::new(Some(lib), Some(ext)).run(&scan());
        assert!(matches!(outcome, EscalationOutcome::Exhausted { .. }));
    }

    #[test]
    fn stock_escalation_without_tesseract_has_no_external() {
        let settings = OcrSettings {
            enabled: true,
            ..OcrSettings::default()
        };
        let escalation = OcrEscalation::from_settings(&settings, None);
        assert!(escalation.is_enabled());
        assert!(!escalation.has_external());
    }
}
