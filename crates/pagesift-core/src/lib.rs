// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagesift core types, configuration, and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod report;
pub mod types;

pub use config::{ConvertConfig, OcrSettings, OutputSettings};
pub use error::{PagesiftError, Result};
pub use report::{BatchEntry, BatchReport, RunStatus};
pub use types::*;
