//! Extraction collaborators
//!
//! An [`Extractor`] produces the export artifact for a run. [`CommandExtractor`]
//! runs an external program against the source database; [`PreparedArtifact`]
//! accepts a file that was produced upstream.

pub mod command;

use crate::config::SyncConfig;
use crate::domain::{Result, SyncError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use command::CommandExtractor;

/// A produced export artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
}

/// Produces the export artifact
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Runs the extraction
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Export`] if the extraction fails or no artifact exists
    /// afterwards.
    async fn extract(&self) -> Result<ExportArtifact>;
}

/// An artifact produced outside tableswap
#[derive(Debug, Clone)]
pub struct PreparedArtifact {
    path: PathBuf,
}

impl PreparedArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Extractor for PreparedArtifact {
    async fn extract(&self) -> Result<ExportArtifact> {
        ensure_artifact_exists(&self.path).await?;
        tracing::info!(path = %self.path.display(), "Using prepared export artifact");
        Ok(ExportArtifact {
            path: self.path.clone(),
        })
    }
}

/// Picks the extractor matching `export.command`
pub fn from_config(config: &SyncConfig) -> Box<dyn Extractor> {
    if config.export.command.is_empty() {
        Box::new(PreparedArtifact::new(&config.export.artifact_path))
    } else {
        Box::new(CommandExtractor::from_config(config))
    }
}

pub(crate) async fn ensure_artifact_exists(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(SyncError::Export(format!(
            "Export artifact {} is not a regular file",
            path.display()
        ))),
        Err(e) => Err(SyncError::Export(format!(
            "Export artifact {} not found: {}",
            path.display(),
            e
        ))),
    }
}
