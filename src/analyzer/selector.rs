//! File Selection
//!
//! Resolves ordered include/exclude glob pattern lists into a concrete,
//! deterministically sorted set of paths. An empty result after exclusion is
//! an explicit error, not an empty batch.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::types::{DocsmithError, Result};

fn expand_patterns(patterns: &[String]) -> Result<BTreeSet<PathBuf>> {
    let mut paths = BTreeSet::new();

    for pattern in patterns {
        let matches = glob::glob(pattern)
            .map_err(|e| DocsmithError::Selection(format!("Invalid pattern '{}': {}", pattern, e)))?;

        for entry in matches {
            let path = entry.map_err(|e| {
                DocsmithError::Selection(format!("Unreadable path under '{}': {}", pattern, e))
            })?;
            if path.is_file() {
                paths.insert(path);
            }
        }
    }

    Ok(paths)
}

/// Resolve include minus exclude patterns into a sorted file list.
///
/// Two runs over an unchanged filesystem enumerate files in the same order
/// (BTreeSet iteration is the sort).
pub fn select_files(include: &[String], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let included = expand_patterns(include)?;
    let excluded = expand_patterns(exclude)?;

    let selected: Vec<PathBuf> = included.difference(&excluded).cloned().collect();

    debug!(
        included = included.len(),
        excluded = excluded.len(),
        selected = selected.len(),
        "Resolved file selection"
    );

    if selected.is_empty() {
        return Err(DocsmithError::Selection(format!(
            "No files matched include patterns {:?} after applying exclude patterns {:?}",
            include, exclude
        )));
    }

    Ok(selected)
}
