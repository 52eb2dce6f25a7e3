// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document conversion: the text-layer chain, then (conditionally) OCR, then
// the output sink.
//
// Every call walks the per-document state machine from `Pending` to a terminal
// state, and the visited trail travels with the outcome or the failure.

use pagesift_core::config::ConvertConfig;
use pagesift_core::types::{
    AttemptRecord, Document, DocumentState, ExtractionMethod, ExtractionOutcome, FailureReason,
    StateTrail,
};
use thiserror::Error;
use tracing::{info, instrument};

use crate::ocr::{EscalationOutcome, OcrEscalation, ResolvedExecutable};
use crate::sink::{OutputSink, StreamSink, TextFileSink};
use crate::strategy::{ChainOutcome, StrategyChain};

/// A document for which no text could be obtained or stored.
#[derive(Debug, Clone, Error)]
#[error("{document}: {reason}")]
pub struct ConversionFailure {
    pub document: Document,
    pub reason: FailureReason,
    pub attempts: Vec<AttemptRecord>,
    pub states: StateTrail,
}

impl ConversionFailure {
    /// The `Failed` outcome recorded in a batch report.
    pub fn into_outcome(self) -> ExtractionOutcome {
        ExtractionOutcome::failed(self.reason, self.attempts, self.states)
    }
}

/// Chain + OCR escalation + optional sink, applied to one document at a time.
///
/// Holds no per-document state; converting the same unchanged document twice
/// gives the same terminal status.
pub struct DocumentConverter {
    chain: StrategyChain,
    ocr: OcrEscalation,
    sink: Option<Box<dyn OutputSink>>,
}

impl DocumentConverter {
    /// Converter without a sink: the text stays on the outcome for the caller.
    pub fn new(chain: StrategyChain, ocr: OcrEscalation) -> Self {
        Self {
            chain,
            ocr,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Stock converter for a run configuration. `tesseract` is the executable
    /// resolved up front, if any.
    pub fn from_config(config: &ConvertConfig, tesseract: Option<&ResolvedExecutable>) -> Self {
        let sink: Box<dyn OutputSink> = if config.output.to_stdout {
            Box::new(StreamSink::stdout())
        } else {
            Box::new(TextFileSink::new(config.output.out_dir.clone()))
        };
        Self::new(
            StrategyChain::from_methods(&config.strategies),
            OcrEscalation::from_settings(&config.ocr, tesseract),
        )
        .with_sink(sink)
    }

    pub fn chain(&self) -> &StrategyChain {
        &self.chain
    }

    pub fn ocr(&self) -> &OcrEscalation {
        &self.ocr
    }

    #[instrument(skip_all, fields(document = %document))]
    pub fn convert(&self, document: &Document) -> Result<ExtractionOutcome, ConversionFailure> {
        let mut states = StateTrail::new();
        states.advance(DocumentState::ChainRunning);

        let mut attempts = match self.chain.run(document) {
            ChainOutcome::Usable {
                method,
                text,
                attempts,
            } => {
                states.advance(DocumentState::ChainSucceeded);
                return self.deliver(document, method, text, attempts, states);
            }
            ChainOutcome::Exhausted { attempts } => attempts,
        };
        states.advance(DocumentState::ChainExhausted);

        if !self.ocr.is_enabled() {
            return Err(fail(document, FailureReason::NoText, attempts, states));
        }

        states.advance(DocumentState::OcrRunning);
        let reason = match self.ocr.run(document) {
            EscalationOutcome::Recognized {
                method,
                text,
                attempts: ocr_attempts,
            } => {
                attempts.extend(ocr_attempts);
                states.advance(DocumentState::OcrSucceeded);
                return self.deliver(document, method, text, attempts, states);
            }
            EscalationOutcome::Unresolved {
                attempts: ocr_attempts,
            } => {
                attempts.extend(ocr_attempts);
                FailureReason::OcrUnresolved
            }
            EscalationOutcome::Exhausted {
                attempts: ocr_attempts,
            } => {
                attempts.extend(ocr_attempts);
                FailureReason::NoText
            }
            EscalationOutcome::Unavailable {
                attempts: ocr_attempts,
            } => {
                let detail = unavailable_detail(&ocr_attempts);
                attempts.extend(ocr_attempts);
                FailureReason::OcrUnavailable(detail)
            }
            EscalationOutcome::Disabled => FailureReason::NoText,
        };
        states.advance(DocumentState::OcrFailed);
        Err(fail(document, reason, attempts, states))
    }

    /// Hand usable text to the sink (if any) and seal the outcome.
    fn deliver(
        &self,
        document: &Document,
        method: ExtractionMethod,
        text: String,
        attempts: Vec<AttemptRecord>,
        mut states: StateTrail,
    ) -> Result<ExtractionOutcome, ConversionFailure> {
        let output = match &self.sink {
            Some(sink) => match sink.write(document, &text) {
                Ok(receipt) => receipt.path().map(|p| p.to_path_buf()),
                Err(err) => {
                    return Err(fail(
                        document,
                        FailureReason::Sink(err.to_string()),
                        attempts,
                        states,
                    ));
                }
            },
            None => None,
        };

        states.advance(DocumentState::Extracted);
        info!(%method, "document converted");
        let mut outcome = ExtractionOutcome::extracted(method, text, attempts, states);
        outcome.output = output;
        Ok(outcome)
    }
}

/// The availability hints of the OCR variants that could not run.
fn unavailable_detail(attempts: &[AttemptRecord]) -> String {
    let hints: Vec<&str> = attempts
        .iter()
        .filter_map(|record| record.detail.as_deref())
        .collect();
    if hints.is_empty() {
        "no OCR engine available".to_string()
    } else {
        hints.join("; ")
    }
}

fn fail(
    document: &Document,
    reason: FailureReason,
    attempts: Vec<AttemptRecord>,
    mut states: StateTrail,
) -> ConversionFailure {
    states.advance(DocumentState::Failed);
    info!(%document, %reason, "document failed");
    ConversionFailure {
        document: document.clone(),
        reason,
        attempts,
        states,
    }
}
