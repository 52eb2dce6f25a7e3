// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract executable resolution.
//
// Resolution is a pure function of the configured path, a PATH lookup and a
// file-existence check; `resolve()` plugs in the real environment, tests plug
// in closures.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

#[cfg(windows)]
const KNOWN_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

#[cfg(not(windows))]
const KNOWN_LOCATIONS: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// How a Tesseract executable was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    Explicit,
    SearchPath,
    KnownLocation,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResolutionSource::Explicit => "configured path",
            ResolutionSource::SearchPath => "PATH",
            ResolutionSource::KnownLocation => "known install location",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedExecutable {
    pub path: PathBuf,
    pub source: ResolutionSource,
}

/// Finds the Tesseract executable: explicit path, then PATH, then known locations.
#[derive(Debug, Clone)]
pub struct TesseractLocator {
    explicit: Option<PathBuf>,
    known_locations: Vec<PathBuf>,
}

impl TesseractLocator {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            known_locations: KNOWN_LOCATIONS.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn with_known_locations(mut self, locations: Vec<PathBuf>) -> Self {
        self.known_locations = locations;
        self
    }

    pub fn known_locations(&self) -> &[PathBuf] {
        &self.known_locations
    }

    /// Resolve against the real PATH and filesystem.
    pub fn resolve(&self) -> Option<ResolvedExecutable> {
        self.resolve_with(|name| which::which(name).ok(), Path::is_file)
    }

    pub fn resolve_with<L, E>(&self, lookup: L, exists: E) -> Option<ResolvedExecutable>
    where
        L: Fn(&str) -> Option<PathBuf>,
        E: Fn(&Path) -> bool,
    {
        if let Some(explicit) = &self.explicit {
            if exists(explicit.as_path()) {
                return Some(found(explicit.clone(), ResolutionSource::Explicit));
            }
            warn!(
                path = %explicit.display(),
                "configured tesseract path does not exist; searching elsewhere"
            );
        }

        if let Some(path) = lookup("tesseract") {
            return Some(found(path, ResolutionSource::SearchPath));
        }

        self.known_locations
            .iter()
            .find(|candidate| exists(candidate.as_path()))
            .map(|candidate| found(candidate.clone(), ResolutionSource::KnownLocation))
    }
}

fn found(path: PathBuf, source: ResolutionSource) -> ResolvedExecutable {
    debug!(path = %path.display(), %source, "tesseract resolved");
    ResolvedExecutable { path, source }
}
