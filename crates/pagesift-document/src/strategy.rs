// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-layer extraction strategies and the chain that escalates through them.
//
// Each strategy returns an `AttemptOutcome` value instead of an error; the
// chain walks the strategies in order and accepts the first usable text.
// Running out of strategies is not an error, since scanned documents have no
// text layer; the chain reports it as `ChainOutcome::Exhausted`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use pagesift_core::types::{
    AttemptOutcome, AttemptRecord, Document, ExtractionAttempt, ExtractionMethod, is_usable_text,
};
use tracing::{debug, info};

use crate::pdf::{LopdfReader, PdfExtractReader, PdfOxideReader};

/// One engine that can pull a text layer out of a PDF.
pub trait ExtractionStrategy: Send + Sync {
    /// Which engine this is (also the tag recorded on the outcome).
    fn method(&self) -> ExtractionMethod;

    /// Whether the engine exists in this build/environment.
    fn is_available(&self) -> bool {
        true
    }

    /// Attempt extraction. Must not panic for well-behaved engines; the chain
    /// still guards against ones that do.
    fn extract(&self, document: &Document) -> AttemptOutcome;
}

/// Build the stock strategy for a text-layer method.
///
/// Returns `None` for OCR methods, which are not text-layer strategies.
pub fn strategy_for(method: ExtractionMethod) -> Option<Box<dyn ExtractionStrategy>> {
    match method {
        ExtractionMethod::Lopdf => Some(Box::new(LopdfReader::new())),
        ExtractionMethod::PdfExtract => Some(Box::new(PdfExtractReader::new())),
        ExtractionMethod::PdfOxide => Some(Box::new(PdfOxideReader::new())),
        ExtractionMethod::OcrLibrary | ExtractionMethod::OcrTesseract => None,
    }
}

/// Result of walking the chain for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// A strategy produced usable text.
    Usable {
        method: ExtractionMethod,
        text: String,
        attempts: Vec<AttemptRecord>,
    },
    /// No strategy produced usable text.
    Exhausted { attempts: Vec<AttemptRecord> },
}

impl ChainOutcome {
    pub fn attempts(&self) -> &[AttemptRecord] {
        match self {
            ChainOutcome::Usable { attempts, .. } | ChainOutcome::Exhausted { attempts } => {
                attempts
            }
        }
    }
}

/// Ordered list of strategies, fixed for the lifetime of the chain.
pub struct StrategyChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Chain of stock strategies in the given order (OCR methods are skipped).
    pub fn from_methods(methods: &[ExtractionMethod]) -> Self {
        Self::new(methods.iter().copied().filter_map(strategy_for).collect())
    }

    pub fn methods(&self) -> Vec<ExtractionMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Try each strategy in order; stop at the first usable text.
    pub fn run(&self, document: &Document) -> ChainOutcome {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let method = strategy.method();
            let outcome = if strategy.is_available() {
                guard_engine(method, || strategy.extract(document))
            } else {
                AttemptOutcome::EngineUnavailable(format!("{method} is not available"))
            };
            let attempt = ExtractionAttempt::new(method, outcome);
            attempts.push(attempt.record());

            match attempt.outcome {
                AttemptOutcome::Success(text) if is_usable_text(&text) => {
                    info!(
                        %document,
                        %method,
                        chars = text.chars().count(),
                        "text layer extracted"
                    );
                    return ChainOutcome::Usable {
                        method,
                        text,
                        attempts,
                    };
                }
                other => {
                    debug!(%document, %method, kind = ?other.kind(), "strategy gave no usable text");
                }
            }
        }

        ChainOutcome::Exhausted { attempts }
    }
}

/// Run an engine call, converting a panic into `AttemptOutcome::Failure`.
///
/// Several PDF engines panic on malformed input rather than returning errors.
pub(crate) fn guard_engine<F>(method: ExtractionMethod, f: F) -> AttemptOutcome
where
    F: FnOnce() -> AttemptOutcome,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome,
        Err(payload) => AttemptOutcome::Failure(format!(
            "{method} panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pagesift_core::types::AttemptKind;

    use super::*;

    /// Strategy that returns a canned outcome and counts its calls.
    struct Canned {
        method: ExtractionMethod,
        outcome: AttemptOutcome,
        available: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Canned {
        fn boxed(
            method: ExtractionMethod,
            outcome: AttemptOutcome,
        ) -> (Box<dyn ExtractionStrategy>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let strategy = Canned {
                method,
                outcome,
                available: true,
                calls: Arc::clone(&calls),
            };
            (Box::new(strategy), calls)
        }
    }

    impl ExtractionStrategy for Canned {
        fn method(&self) -> ExtractionMethod {
            self.method
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn extract(&self, _document: &Document) -> AttemptOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct Panics;

    impl ExtractionStrategy for Panics {
        fn method(&self) -> ExtractionMethod {
            ExtractionMethod::PdfExtract
        }

        fn extract(&self, _document: &Document) -> AttemptOutcome {
            panic!("unexpected end of xref")
        }
    }

    fn doc() -> Document {
        Document::new("sample.pdf")
    }

    #[test]
    fn first_usable_strategy_wins() {
        let (a, a_calls) = Canned::boxed(
            ExtractionMethod::Lopdf,
            AttemptOutcome::Success("Hello World".into()),
        );
        let (b, b_calls) = Canned::boxed(
            ExtractionMethod::PdfExtract,
            AttemptOutcome::Success("other".into()),
        );
        let chain = StrategyChain::new(vec![a, b]);

        match chain.run(&doc()) {
            ChainOutcome::Usable { method, text, attempts } => {
                assert_eq!(method, ExtractionMethod::Lopdf);
                assert_eq!(text.trim(), "Hello World");
                assert_eq!(attempts.len(), 1);
            }
            other => panic!("expected usable outcome, got {other:?}"),
        }
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn whitespace_success_escalates() {
        let (a, _) = Canned::boxed(ExtractionMethod::Lopdf, AttemptOutcome::Success(" \n ".into()));
        let (b, _) = Canned::boxed(ExtractionMethod::PdfExtract, AttemptOutcome::EmptyResult);
        let (c, _) = Canned::boxed(
            ExtractionMethod::PdfOxide,
            AttemptOutcome::Success("third engine".into()),
        );
        let chain = StrategyChain::new(vec![a, b, c]);

        match chain.run(&doc()) {
            ChainOutcome::Usable { method, attempts, .. } => {
                assert_eq!(method, ExtractionMethod::PdfOxide);
                let kinds: Vec<_> = attempts.iter().map(|a| a.kind).collect();
                assert_eq!(
                    kinds,
                    vec![AttemptKind::Success, AttemptKind::EmptyResult, AttemptKind::Success]
                );
            }
            other => panic!("expected usable outcome, got {other:?}"),
        }
    }

    #[test]
    fn failures_and_unavailable_engines_exhaust_the_chain() {
        let (a, _) = Canned::boxed(
            ExtractionMethod::Lopdf,
            AttemptOutcome::Failure("page 3: bad font".into()),
        );
        let unavailable = Canned {
            method: ExtractionMethod::PdfExtract,
            outcome: AttemptOutcome::Success("never returned".into()),
            available: false,
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let calls = Arc::clone(&unavailable.calls);
        let chain = StrategyChain::new(vec![a, Box::new(unavailable)]);

        match chain.run(&doc()) {
            ChainOutcome::Exhausted { attempts } => {
                assert_eq!(attempts[0].kind, AttemptKind::Failure);
                assert_eq!(attempts[1].kind, AttemptKind::EngineUnavailable);
            }
            other => panic!("expected exhausted chain, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0, "unavailable engine must not run");
    }

    #[test]
    fn panicking_strategy_becomes_failure() {
        let (fallback, _) = Canned::boxed(
            ExtractionMethod::PdfOxide,
            AttemptOutcome::Success("recovered".into()),
        );
        let chain = StrategyChain::new(vec![Box::new(Panics), fallback]);

        match chain.run(&doc()) {
            ChainOutcome::Usable { method, attempts, .. } => {
                assert_eq!(method, ExtractionMethod::PdfOxide);
                assert_eq!(attempts[0].kind, AttemptKind::Failure);
                assert!(attempts[0].detail.as_deref().unwrap().contains("unexpected end of xref"));
            }
            other => panic!("expected usable outcome, got {other:?}"),
        }
    }

    #[test]
    fn empty_chain_is_exhausted() {
        let chain = StrategyChain::new(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(
            chain.run(&doc()),
            ChainOutcome::Exhausted { attempts: Vec::new() }
        );
    }

    #[test]
    fn stock_chain_follows_requested_order() {
        let chain = StrategyChain::from_methods(&[
            ExtractionMethod::PdfOxide,
            ExtractionMethod::OcrTesseract,
            ExtractionMethod::Lopdf,
        ]);
        assert_eq!(
            chain.methods(),
            vec![ExtractionMethod::PdfOxide, ExtractionMethod::Lopdf]
        );
    }
}
