// File selector: picks the distribution files that belong to the current
// release and have a known description.

use crate::context::DescriptionTable;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Filename → description, ordered by filename.
pub type SelectionSet = BTreeMap<String, String>;

/// Scan `dist` (non-recursively) for regular files whose name contains
/// `-<version>.` and starts with a known prefix. The longest matching
/// prefix supplies the description.
pub fn select_files(dist: &Path, version: &str, descriptions: &DescriptionTable) -> Result<SelectionSet> {
    let marker = format!("-{}.", version);
    let entries = std::fs::read_dir(dist)
        .with_context(|| format!("Failed to read distribution directory {}", dist.display()))?;

    let mut selection = SelectionSet::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dist.display()))?;
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::debug!(?file_name, "skipping non-UTF-8 file name");
            continue;
        };
        if !name.contains(&marker) {
            continue;
        }
        match descriptions.longest_match(name) {
            Some((prefix, description)) => {
                tracing::debug!(file = name, prefix, "selected");
                selection.insert(name.to_string(), description.to_string());
            }
            None => tracing::debug!(file = name, "no description prefix matches"),
        }
    }
    Ok(selection)
}
