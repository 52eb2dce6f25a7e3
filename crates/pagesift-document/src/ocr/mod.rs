// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR fallback for documents without a text layer: page rendering, the
// in-process (`ocrs`) and external (`tesseract`) recognisers, executable
// resolution, and the escalation policy tying them together.

pub mod backend;
pub mod engine;
pub mod escalation;
pub mod locate;
pub mod raster;
pub mod render;
pub mod tesseract;

pub use backend::{OcrStrategy, PageRecognizer};
pub use engine::{OcrModels, OcrsRecognizer};
pub use escalation::{EscalationOutcome, OcrEscalation};
pub use locate::{ResolutionSource, ResolvedExecutable, TesseractLocator};
pub use raster::RasterOcr;
pub use render::{PageRenderer, PdftoppmRenderer};
pub use tesseract::TesseractRecognizer;
