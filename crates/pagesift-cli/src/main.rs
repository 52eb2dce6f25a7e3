// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagesift: batch PDF-to-text conversion.
//
// Entry point. Parses arguments, initialises logging, discovers documents,
// runs the batch and maps the result onto the process exit code.

mod args;
mod discover;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pagesift_core::error::PagesiftError;
use pagesift_core::report::RunStatus;
use pagesift_document::ocr::{PageRenderer, PdftoppmRenderer};
use pagesift_document::{BatchDriver, DocumentConverter, TesseractLocator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `--stdout` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let status = match run(&cli) {
        Ok(status) => status,
        Err(err) => {
            eprintln!("error: {err:#}");
            match err.downcast_ref::<PagesiftError>() {
                Some(PagesiftError::NoDocuments) => RunStatus::NoDocuments,
                _ => RunStatus::Fatal,
            }
        }
    };
    ExitCode::from(status.exit_code() as u8)
}

fn run(cli: &Cli) -> anyhow::Result<RunStatus> {
    let config = cli.resolve_config()?;
    let documents = discover::find_pdfs(&cli.path, cli.recurse)?;

    let tesseract = if config.ocr.enabled {
        if !PdftoppmRenderer::new(config.ocr.dpi).is_available() {
            warn!("OCR requested but pdftoppm was not found (install poppler-utils); scanned pages cannot be rendered");
        }
        let resolved = TesseractLocator::new(config.ocr.tesseract_path.clone()).resolve();
        match &resolved {
            Some(found) => info!(path = %found.path.display(), source = %found.source, "using tesseract"),
            None => warn!(
                "OCR requested but Tesseract was not found; scanned documents fail unless in-process OCR succeeds"
            ),
        }
        resolved
    } else {
        None
    };

    let driver = BatchDriver::new(DocumentConverter::from_config(&config, tesseract.as_ref()));
    let show_success = !config.output.to_stdout && !cli.quiet;

    let report = driver.run_with(&documents, |entry| {
        let name = discover::display_relative(entry.document.path(), &cli.path);
        let printed = output::print_entry(
            &mut std::io::stdout().lock(),
            &mut std::io::stderr().lock(),
            entry,
            &name,
            show_success,
        );
        if let Err(err) = printed {
            warn!(%err, "could not print status line");
        }
    })?;

    if show_success && report.len() > 1 {
        output::print_summary(&mut std::io::stdout().lock(), &report)?;
    }

    if let Some(path) = &cli.report {
        output::write_report(path, &report)
            .with_context(|| format!("could not write report to {}", path.display()))?;
    }

    Ok(report.status())
}
