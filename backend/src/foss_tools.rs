//! Static catalog of the open-source tools the project is built with

use std::path::{Path, PathBuf};

use common_types::FossToolsResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FossToolsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads the catalog from a JSON file on disk
///
/// The file is read on every call so edits show up without a restart.
pub struct FossToolsCatalog {
    path: PathBuf,
}

impl FossToolsCatalog {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and parses the catalog
    ///
    /// # Errors
    ///
    /// Returns `FossToolsError::Read` if the file cannot be read
    /// Returns `FossToolsError::Parse` if it is not a valid catalog
    pub async fn load(&self) -> Result<FossToolsResponse, FossToolsError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| FossToolsError::Read {
                    path: self.path.clone(),
                    source,
                })?;

        serde_json::from_str(&content).map_err(|source| FossToolsError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_load_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tools":[{{"name":"axum","description":"Web framework","githubUrl":"https://github.com/tokio-rs/axum"}}]}}"#
        )
        .unwrap();

        let catalog = FossToolsCatalog::new(file.path().to_path_buf());
        let response = catalog.load().await.unwrap();

        assert_eq!(response.tools.len(), 1);
        assert_eq!(response.tools[0].name, "axum");
        assert_eq!(response.tools[0].github_url, "https://github.com/tokio-rs/axum");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let catalog = FossToolsCatalog::new(PathBuf::from("does/not/exist.json"));
        assert!(matches!(
            catalog.load().await,
            Err(FossToolsError::Read { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tools": "nope"}}"#).unwrap();

        let catalog = FossToolsCatalog::new(file.path().to_path_buf());
        assert!(matches!(
            catalog.load().await,
            Err(FossToolsError::Parse { .. })
        ));
    }
}
