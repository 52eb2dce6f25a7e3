// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver: converts documents one after another, isolating each one.
//
// A failed or panicking document becomes a `Failed` report entry and the batch
// moves on. Only an empty input set is an error.

use std::panic::{self, AssertUnwindSafe};

use pagesift_core::error::{PagesiftError, Result};
use pagesift_core::report::{BatchEntry, BatchReport};
use pagesift_core::types::{Document, DocumentState, ExtractionOutcome, FailureReason, StateTrail};
use tracing::{error, info, instrument};

use crate::convert::DocumentConverter;
use crate::strategy::panic_message;

pub struct BatchDriver {
    converter: DocumentConverter,
}

impl BatchDriver {
    pub fn new(converter: DocumentConverter) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &DocumentConverter {
        &self.converter
    }

    pub fn run(&self, documents: &[Document]) -> Result<BatchReport> {
        self.run_with(documents, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_entry` as soon as each document's
    /// outcome is known, in input order.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn run_with<F>(&self, documents: &[Document], mut on_entry: F) -> Result<BatchReport>
    where
        F: FnMut(&BatchEntry),
    {
        if documents.is_empty() {
            return Err(PagesiftError::NoDocuments);
        }

        let mut report = BatchReport::start();
        for document in documents {
            let outcome = self.convert_isolated(document);
            report.push(document.clone(), outcome);
            if let Some(entry) = report.entries().last() {
                on_entry(entry);
            }
        }

        let report = report.finish();
        info!(
            converted = report.converted_count(),
            via_ocr = report.ocr_count(),
            failed = report.failed_count(),
            "batch finished"
        );
        Ok(report)
    }

    fn convert_isolated(&self, document: &Document) -> ExtractionOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.converter.convert(document))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(failure)) => failure.into_outcome(),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(%document, panic = %message, "conversion panicked");
                let mut states = StateTrail::new();
                states.advance(DocumentState::Failed);
                ExtractionOutcome::failed(FailureReason::Panicked(message), Vec::new(), states)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pagesift_core::report::RunStatus;
    use pagesift_core::types::{AttemptOutcome, ExtractionMethod, TerminalStatus};

    use super::*;
    use crate::ocr::OcrEscalation;
    use crate::sink::{OutputSink, SinkReceipt};
    use crate::strategy::{ExtractionStrategy, StrategyChain};

    /// Text is derived from the file name; names containing "bad" fail to parse.
    struct ByName;

    impl ExtractionStrategy for ByName {
        fn method(&self) -> ExtractionMethod {
            ExtractionMethod::Lopdf
        }

        fn extract(&self, document: &Document) -> AttemptOutcome {
            let stem = document.stem();
            if stem.contains("bad") {
                AttemptOutcome::Failure("corrupt xref".into())
            } else {
                AttemptOutcome::Success(format!("text of {stem}"))
            }
        }
    }

    fn driver() -> BatchDriver {
        BatchDriver::new(DocumentConverter::new(
            StrategyChain::new(vec![Box::new(ByName)]),
            OcrEscalation::disabled(),
        ))
    }

    #[test]
    fn empty_input_is_its_own_condition() {
        assert!(matches!(driver().run(&[]), Err(PagesiftError::NoDocuments)));
    }

    #[test]
    fn one_bad_document_does_not_affect_the_rest() {
        let docs = vec![
            Document::new("a.pdf"),
            Document::new("bad.pdf"),
            Document::new("c.pdf"),
        ];
        let report = driver().run(&docs).unwrap();

        assert_eq!(report.len(), 3);
        assert!(report.finished_at.is_some());
        assert_eq!(report.outcome_for(&docs[0]).unwrap().status, TerminalStatus::Extracted);
        assert_eq!(report.outcome_for(&docs[1]).unwrap().status, TerminalStatus::Failed);
        assert_eq!(report.outcome_for(&docs[2]).unwrap().status, TerminalStatus::Extracted);
        assert_eq!(report.status(), RunStatus::SomeFailed);
    }

    #[test]
    fn entries_are_reported_in_input_order() {
        let docs = vec![Document::new("z.pdf"), Document::new("a.pdf")];
        let mut seen = Vec::new();
        driver()
            .run_with(&docs, |entry| seen.push(entry.document.clone()))
            .unwrap();
        assert_eq!(seen, docs);
    }

    #[test]
    fn panics_are_contained_per_document() {
        struct Explodes;
        impl ExtractionStrategy for Explodes {
            fn method(&self) -> ExtractionMethod {
                ExtractionMethod::PdfExtract
            }
            fn extract(&self, _document: &Document) -> AttemptOutcome {
                AttemptOutcome::Failure("nothing".into())
            }
        }

        // The chain already guards engine panics, so make the sink panic instead.
        struct PanickingSink;
        impl OutputSink for PanickingSink {
            fn write(&self, document: &Document, _text: &str) -> Result<SinkReceipt> {
                if document.stem() == "boom" {
                    panic!("sink exploded");
                }
                Ok(SinkReceipt::Stream)
            }
        }

        let converter = DocumentConverter::new(
            StrategyChain::new(vec![Box::new(Explodes), Box::new(ByName)]),
            OcrEscalation::disabled(),
        )
        .with_sink(Box::new(PanickingSink));
        let docs = vec![Document::new("boom.pdf"), Document::new("fine.pdf")];
        let report = BatchDriver::new(converter).run(&docs).unwrap();

        let boom = report.outcome_for(&docs[0]).unwrap();
        assert!(matches!(boom.failure, Some(FailureReason::Panicked(ref m)) if m.contains("sink exploded")));
        assert_eq!(boom.states.current(), DocumentState::Failed);
        assert!(report.outcome_for(&docs[1]).unwrap().is_success());
    }

    #[test]
    fn all_good_batch_converts() {
        let report = driver()
            .run(&[Document::new("one.pdf"), Document::new("two.pdf")])
            .unwrap();
        assert_eq!(report.status(), RunStatus::AllConverted);
        assert_eq!(report.status().exit_code(), 0);
    }
}
