// Context loader: reads the credential, the release version and the
// description table that the rest of the run works from.

use crate::config::UploadConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: expected \"<prefix> <description>\"", path.display())]
    MalformedDescription { path: PathBuf, line: usize },
}

/// Filename prefix → human readable description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionTable {
    entries: BTreeMap<String, String>,
}

impl DescriptionTable {
    /// Parse one `prefix description` record per line. The description is
    /// everything after the first whitespace, trimmed. Blank lines are
    /// ignored and a repeated prefix replaces the earlier entry.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ContextError> {
        let mut entries = BTreeMap::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (prefix, description) = line.split_once(char::is_whitespace).ok_or_else(|| {
                ContextError::MalformedDescription {
                    path: path.to_path_buf(),
                    line: index + 1,
                }
            })?;
            entries.insert(prefix.to_string(), description.trim().to_string());
        }
        Ok(DescriptionTable { entries })
    }

    pub fn load(path: &Path) -> Result<Self, ContextError> {
        let text = read(path)?;
        Self::parse(&text, path)
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    /// The entry whose prefix is the longest one `filename` starts with.
    pub fn longest_match(&self, filename: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .filter(|(prefix, _)| filename.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, description)| (prefix.as_str(), description.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything read from disk before any file is selected.
#[derive(Debug, Clone)]
pub struct UploadContext {
    pub credential: String,
    pub version: String,
    pub descriptions: DescriptionTable,
}

impl UploadContext {
    pub fn load(config: &UploadConfig) -> Result<Self, ContextError> {
        let credential = read(&config.credential_file)?.trim().to_string();
        let version = read(&config.version_file)?.trim().to_string();
        let descriptions = DescriptionTable::load(&config.descriptions_file)?;
        tracing::debug!(%version, prefixes = descriptions.len(), "context loaded");
        Ok(UploadContext {
            credential,
            version,
            descriptions,
        })
    }
}

fn read(path: &Path) -> Result<String, ContextError> {
    std::fs::read_to_string(path).map_err(|source| ContextError::Read {
        path: path.to_path_buf(),
        source,
    })
}
