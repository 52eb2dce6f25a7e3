// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch report: one entry per document, in processing order, plus the overall
// run status that the CLI turns into a process exit code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Document, ExtractionOutcome, TerminalStatus};

/// Overall result of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// Every document produced text.
    AllConverted,
    /// At least one document failed (possibly all of them).
    SomeFailed,
    /// The input matched no documents.
    NoDocuments,
    /// The run could not start (missing input, bad configuration).
    Fatal,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::AllConverted => 0,
            RunStatus::NoDocuments => 1,
            RunStatus::Fatal => 2,
            RunStatus::SomeFailed => 3,
        }
    }
}

/// A document paired with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub document: Document,
    pub outcome: ExtractionOutcome,
}

/// Ordered (document, outcome) pairs for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            entries: Vec::new(),
        }
    }

    /// Append an entry. Only the batch driver builds reports.
    pub fn push(&mut self, document: Document, outcome: ExtractionOutcome) {
        debug_assert!(self.finished_at.is_none(), "push after finish");
        self.entries.push(BatchEntry { document, outcome });
    }

    /// Seal the report.
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcome recorded for `document`, if it was part of this run.
    pub fn outcome_for(&self, document: &Document) -> Option<&ExtractionOutcome> {
        self.entries
            .iter()
            .find(|entry| &entry.document == document)
            .map(|entry| &entry.outcome)
    }

    pub fn converted_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn ocr_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.status == TerminalStatus::ExtractedViaOcr)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.converted_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.outcome.is_success())
    }

    pub fn status(&self) -> RunStatus {
        if self.entries.is_empty() {
            RunStatus::NoDocuments
        } else if self.failed_count() > 0 {
            RunStatus::SomeFailed
        } else {
            RunStatus::AllConverted
        }
    }
}
