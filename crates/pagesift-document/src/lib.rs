// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagesift-document: PDF-to-text conversion for Pagesift.
//
// Provides the text-layer extraction strategies (lopdf, pdf-extract, pdf_oxide)
// and the chain that escalates through them, an OCR fallback (ocrs in-process,
// tesseract out-of-process), output sinks, and the per-document converter and
// batch driver built on top.

pub mod batch;
pub mod convert;
pub mod ocr;
pub mod pdf;
pub mod sink;
pub mod strategy;

// Re-export the primary types so callers can use `pagesift_document::BatchDriver` etc.
pub use batch::BatchDriver;
pub use convert::{ConversionFailure, DocumentConverter};
pub use ocr::{EscalationOutcome, OcrEscalation, ResolvedExecutable, TesseractLocator};
pub use pdf::{LopdfReader, PdfExtractReader, PdfOxideReader};
pub use sink::{OutputSink, SinkReceipt, StreamSink, TextFileSink};
pub use strategy::{ChainOutcome, ExtractionStrategy, StrategyChain};
