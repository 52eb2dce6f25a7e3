// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output sinks: where extracted text goes once a document has some.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pagesift_core::error::{PagesiftError, Result};
use pagesift_core::types::Document;
use tracing::debug;

/// Where a sink put the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkReceipt {
    File(PathBuf),
    Stream,
}

impl SinkReceipt {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SinkReceipt::File(path) => Some(path),
            SinkReceipt::Stream => None,
        }
    }
}

/// Persists extracted text for a document.
pub trait OutputSink: Send + Sync {
    fn write(&self, document: &Document, text: &str) -> Result<SinkReceipt>;
}

/// Writes `<stem>.txt` next to the PDF, or into `out_dir` when one is set.
///
/// An existing file of the same name is overwritten.
#[derive(Debug, Clone, Default)]
pub struct TextFileSink {
    out_dir: Option<PathBuf>,
}

impl TextFileSink {
    pub fn new(out_dir: Option<PathBuf>) -> Self {
        Self { out_dir }
    }

    pub fn target_for(&self, document: &Document) -> PathBuf {
        let file_name = format!("{}.txt", document.stem());
        match &self.out_dir {
            Some(dir) => dir.join(file_name),
            None => document.path().with_file_name(file_name),
        }
    }
}

impl OutputSink for TextFileSink {
    fn write(&self, document: &Document, text: &str) -> Result<SinkReceipt> {
        let target = self.target_for(document);
        let sink_error = |err: std::io::Error| PagesiftError::Sink {
            path: target.clone(),
            detail: err.to_string(),
        };

        if let Some(dir) = &self.out_dir {
            std::fs::create_dir_all(dir).map_err(sink_error)?;
        }
        std::fs::write(&target, text).map_err(sink_error)?;

        debug!(%document, output = %target.display(), bytes = text.len(), "text written");
        Ok(SinkReceipt::File(target))
    }
}

/// Writes each document's text, followed by a newline, to a shared stream.
pub struct StreamSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl StreamSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> OutputSink for StreamSink<W> {
    fn write(&self, document: &Document, text: &str) -> Result<SinkReceipt> {
        let mut writer = self.writer.lock().map_err(|_| PagesiftError::Sink {
            path: document.path().to_path_buf(),
            detail: "output stream lock poisoned".into(),
        })?;
        writeln!(writer, "{text}")
            .and_then(|_| writer.flush())
            .map_err(|err| PagesiftError::Sink {
                path: document.path().to_path_buf(),
                detail: err.to_string(),
            })?;
        Ok(SinkReceipt::Stream)
    }
}
