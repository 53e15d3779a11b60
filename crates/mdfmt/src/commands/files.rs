//! Selection of the files a command operates on.

use std::path::{Path, PathBuf};

use mdfmt_config::FilesConfig;

use crate::error::CliError;
use crate::output::Output;

/// Why a file passed on the command line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SkipReason {
    /// Extension not listed in `files.extensions`.
    Extension,
    /// Matched an entry of `files.ignore`.
    Ignored,
}

/// Split `paths` into files to process and skipped files.
pub(super) fn select(
    paths: &[PathBuf],
    files: &FilesConfig,
) -> (Vec<PathBuf>, Vec<(PathBuf, SkipReason)>) {
    let mut selected = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.clone());
        if files.is_ignored(&absolute) {
            skipped.push((path.clone(), SkipReason::Ignored));
        } else if !files.has_markdown_extension(path) {
            skipped.push((path.clone(), SkipReason::Extension));
        } else {
            selected.push(path.clone());
        }
    }
    (selected, skipped)
}

/// Select files, reporting the skipped ones.
pub(super) fn select_reporting(
    paths: &[PathBuf],
    files: &FilesConfig,
    output: &Output,
) -> Vec<PathBuf> {
    let (selected, skipped) = select(paths, files);
    for (path, reason) in skipped {
        match reason {
            SkipReason::Extension => {
                tracing::warn!(path = %path.display(), "Skipping file with unlisted extension");
                output.warning(&format!("Skipping {}: not a markdown file", path.display()));
            }
            SkipReason::Ignored => {
                tracing::debug!(path = %path.display(), "Skipping ignored file");
            }
        }
    }
    selected
}

/// Read a file as UTF-8 text.
pub(super) fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}
