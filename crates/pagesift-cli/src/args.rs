// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and configuration layering:
// defaults < JSON config file < flags.

use std::path::PathBuf;

use clap::Parser;
use pagesift_core::config::ConvertConfig;
use pagesift_core::error::Result;

/// Convert PDF documents to plain text, falling back to OCR for scans
#[derive(Parser, Debug)]
#[command(name = "pagesift", version, about, long_about = None)]
pub struct Cli {
    /// PDF file or directory of PDFs
    pub path: PathBuf,

    /// Directory for the .txt output (default: next to each PDF)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recurse: bool,

    /// Print extracted text to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Run OCR on documents without a text layer
    #[arg(long)]
    pub ocr: bool,

    /// Path to the tesseract executable
    #[arg(long, value_name = "PATH")]
    pub tesseract: Option<PathBuf>,

    /// OCR language (tesseract -l)
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Rendering resolution for OCR
    #[arg(long, value_name = "N")]
    pub dpi: Option<u32>,

    /// Directory holding the ocrs model files
    #[arg(long, value_name = "DIR")]
    pub ocr_models: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a JSON run report to FILE
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Only print failures
    #[arg(short, long)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve the run configuration from defaults, the config file and flags.
    pub fn resolve_config(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)?,
            None => ConvertConfig::default(),
        };

        if let Some(out) = &self.out {
            config.output.out_dir = Some(out.clone());
        }
        if self.stdout {
            config.output.to_stdout = true;
        }
        if self.ocr {
            config.ocr.enabled = true;
        }
        if let Some(path) = &self.tesseract {
            config.ocr.tesseract_path = Some(path.clone());
        }
        if let Some(lang) = &self.lang {
            config.ocr.language = lang.clone();
        }
        if let Some(dpi) = self.dpi {
            config.ocr.dpi = dpi;
        }
        if let Some(dir) = &self.ocr_models {
            config.ocr.model_dir = Some(dir.clone());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use pagesift_core::error::PagesiftError;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pagesift").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse(&["docs"]).resolve_config().unwrap();
        assert_eq!(config, ConvertConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "docs", "-o", "out", "--ocr", "--lang", "deu", "--dpi", "300", "--tesseract",
            "/opt/t/tesseract",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.output.out_dir, Some(PathBuf::from("out")));
        assert!(config.ocr.enabled);
        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.ocr.dpi, 300);
        assert_eq!(config.ocr.tesseract_path, Some(PathBuf::from("/opt/t/tesseract")));
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pagesift.json");
        std::fs::write(&file, r#"{ "ocr": { "enabled": true, "language": "fra", "dpi": 150 } }"#)
            .unwrap();

        let cli = parse(&["docs", "--config", file.to_str().unwrap(), "--dpi", "400"]);
        let config = cli.resolve_config().unwrap();
        assert!(config.ocr.enabled);
        assert_eq!(config.ocr.language, "fra");
        assert_eq!(config.ocr.dpi, 400);
    }

    #[test]
    fn invalid_flag_values_are_config_errors() {
        let err = parse(&["docs", "--dpi", "5"]).resolve_config().unwrap_err();
        assert!(matches!(err, PagesiftError::Config(_)));
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        assert_eq!(parse(&["docs"]).log_filter(), "warn");
        assert_eq!(parse(&["docs", "-v"]).log_filter(), "info");
        assert_eq!(parse(&["docs", "-vv"]).log_filter(), "debug");
    }
}
