// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF text-layer readers, one `ExtractionStrategy` per engine, cheapest first.

pub mod extract;
pub mod oxide;
pub mod reader;

pub use extract::PdfExtractReader;
pub use oxide::PdfOxideReader;
pub use reader::{LopdfReader, page_count};
