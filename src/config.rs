// Configuration: every path and literal the uploader needs, built once at
// start-up and handed to each stage. Nothing here is read from globals after
// construction.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Project name on the file host.
pub const PROJECT: &str = "avbin";

/// Account that owns the uploaded files.
pub const AUTHOR: &str = "Alex.Holkner";

/// Overrides the project root (defaults to the current directory).
pub const ROOT_VAR: &str = "AVBIN_ROOT";

/// Overrides the home directory used to locate the credential file.
pub const HOME_VAR: &str = "AVBIN_UPLOAD_HOME";

/// Overrides the upload endpoint base URL.
pub const UPLOAD_URL_VAR: &str = "GOOGLECODE_UPLOAD_URL";

const CREDENTIAL_FILE: &str = ".googlecode-passwd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub credential_file: PathBuf,
    pub version_file: PathBuf,
    pub descriptions_file: PathBuf,
    pub dist_dir: PathBuf,
    pub project: String,
    pub author: String,
    /// Replaces the project's hosted endpoint when set.
    pub upload_url: Option<String>,
}

impl UploadConfig {
    /// Lay out the standard source tree under `root`, with the credential
    /// file looked up in `home`.
    pub fn new(root: &Path, home: &Path) -> Self {
        UploadConfig {
            credential_file: home.join(CREDENTIAL_FILE),
            version_file: root.join("VERSION"),
            descriptions_file: root.join("upload").join("descriptions.txt"),
            dist_dir: root.join("dist"),
            project: PROJECT.to_string(),
            author: AUTHOR.to_string(),
            upload_url: None,
        }
    }

    /// Build the configuration from `AVBIN_ROOT`, `AVBIN_UPLOAD_HOME` and
    /// `GOOGLECODE_UPLOAD_URL`, falling back to the working directory and the
    /// user's home. Without a URL override the client targets the project's
    /// hosted endpoint.
    pub fn from_env() -> Result<Self> {
        let root = match std::env::var(ROOT_VAR) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir().context("Failed to resolve current directory")?,
        };
        let home = std::env::var(HOME_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .context("Failed to resolve home directory")?;

        let mut config = UploadConfig::new(&root, &home);
        if let Ok(url) = std::env::var(UPLOAD_URL_VAR) {
            config.upload_url = Some(url.trim_end_matches('/').to_string());
        }
        tracing::debug!(dist_dir = ?config.dist_dir, upload_url = ?config.upload_url, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_paths_under_root_and_home() {
        let config = UploadConfig::new(Path::new("/src/avbin"), Path::new("/home/alex"));
        assert_eq!(config.credential_file, PathBuf::from("/home/alex/.googlecode-passwd"));
        assert_eq!(config.version_file, PathBuf::from("/src/avbin/VERSION"));
        assert_eq!(
            config.descriptions_file,
            PathBuf::from("/src/avbin/upload/descriptions.txt")
        );
        assert_eq!(config.dist_dir, PathBuf::from("/src/avbin/dist"));
    }

    #[test]
    fn uses_fixed_project_and_author() {
        let config = UploadConfig::new(Path::new("."), Path::new("."));
        assert_eq!(config.project, "avbin");
        assert_eq!(config.author, "Alex.Holkner");
        assert_eq!(config.upload_url, None);
    }
}
