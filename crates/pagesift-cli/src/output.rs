// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable per-document lines and the JSON run report.

use std::io::Write;
use std::path::Path;

use pagesift_core::report::{BatchEntry, BatchReport};

/// Print one entry: successes to `out` (unless suppressed), failures to `err`.
pub fn print_entry(
    out: &mut dyn Write,
    err: &mut dyn Write,
    entry: &BatchEntry,
    name: &str,
    show_success: bool,
) -> std::io::Result<()> {
    match &entry.outcome.failure {
        None if show_success => writeln!(out, "Converted: {name}"),
        None => Ok(()),
        Some(reason) => writeln!(err, "Failed: {name} -> {reason}"),
    }
}

/// One-line summary for the end of a multi-document run.
pub fn print_summary(w: &mut dyn Write, report: &BatchReport) -> std::io::Result<()> {
    writeln!(
        w,
        "{} converted ({} via OCR), {} failed",
        report.converted_count(),
        report.ocr_count(),
        report.failed_count()
    )
}

pub fn write_report(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
