// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input discovery: turns the command-line path into an ordered document list.

use std::path::{Path, PathBuf};

use pagesift_core::error::{PagesiftError, Result};
use pagesift_core::types::Document;
use tracing::{debug, warn};

/// A file is taken as-is; a directory yields its `*.pdf` files (any case),
/// descending into subdirectories when `recursive` is set. Sorted by path.
pub fn find_pdfs(input: &Path, recursive: bool) -> Result<Vec<Document>> {
    if !input.exists() {
        return Err(PagesiftError::InputNotFound(input.to_path_buf()));
    }
    if input.is_file() {
        return Ok(vec![Document::new(input)]);
    }

    let mut found = Vec::new();
    collect(input, recursive, &mut found)?;
    found.sort();
    debug!(dir = %input.display(), count = found.len(), "documents discovered");
    Ok(found.into_iter().map(Document::new).collect())
}

/// Symlinked directories are never descended into, so link cycles cannot
/// make the walk revisit a directory. Symlinked files are kept.
fn collect(dir: &Path, recursive: bool, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let (path, file_type) = match entry.and_then(|e| Ok((e.path(), e.file_type()?))) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if file_type.is_dir() {
            if recursive {
                collect(&path, recursive, found)?;
            }
        } else if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "not following symlinked directory");
        } else if is_pdf(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// `path` relative to `base` for display, falling back to the full path.
pub fn display_relative(path: &Path, base: &Path) -> String {
    let base = if base.is_file() {
        base.parent().unwrap_or(base)
    } else {
        base
    };
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
