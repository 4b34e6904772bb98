//! Extraction through an external command
//!
//! The command receives the source connection parameters through its
//! environment and must write the artifact to `EXPORT_ARTIFACT_PATH`.

use super::{ensure_artifact_exists, ExportArtifact, Extractor};
use crate::config::{SecretString, SyncConfig};
use crate::domain::{Result, SyncError};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Extractor that runs a configured program
pub struct CommandExtractor {
    argv: Vec<String>,
    artifact_path: PathBuf,
    server: String,
    database: String,
    username: String,
    password: Option<SecretString>,
    export_query: String,
}

impl CommandExtractor {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            argv: config.export.command.clone(),
            artifact_path: PathBuf::from(&config.export.artifact_path),
            server: config.source.server.clone(),
            database: config.source.database.clone(),
            username: config.source.username.clone(),
            password: config.source.password.clone(),
            export_query: config.source.export_query.clone(),
        }
    }

    fn command(&self) -> Result<Command> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| SyncError::Export("export.command is empty".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env("SOURCE_SERVER", &self.server)
            .env("SOURCE_DATABASE", &self.database)
            .env("SOURCE_USERNAME", &self.username)
            .env(
                "SOURCE_PASSWORD",
                self.password
                    .as_ref()
                    .map(|p| p.expose_secret().as_ref())
                    .unwrap_or_default(),
            )
            .env("SOURCE_EXPORT_QUERY", &self.export_query)
            .env("EXPORT_ARTIFACT_PATH", &self.artifact_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Ok(cmd)
    }
}

#[async_trait]
impl Extractor for CommandExtractor {
    async fn extract(&self) -> Result<ExportArtifact> {
        let program = self.argv.first().map(String::as_str).unwrap_or_default();
        tracing::info!(
            program,
            server = %self.server,
            database = %self.database,
            artifact = %self.artifact_path.display(),
            "Running export command"
        );

        let output = self
            .command()?
            .output()
            .await
            .map_err(|e| SyncError::Export(format!("Failed to start '{program}': {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyncError::Export(format!(
                "'{program}' exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        ensure_artifact_exists(&self.artifact_path).await?;

        tracing::info!(artifact = %self.artifact_path.display(), "Export command finished");
        Ok(ExportArtifact {
            path: self.artifact_path.clone(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config_with(argv: &[&str], artifact: &std::path::Path) -> SyncConfig {
        let mut config = SyncConfig::default();
        config.export.command = argv.iter().map(|s| s.to_string()).collect();
        config.export.artifact_path = artifact.to_string_lossy().to_string();
        config.source.server = "sql.example.com".to_string();
        config.source.database = "Sales".to_string();
        config.source.username = "reader".to_string();
        config.source.password = Some(secret_string("pw".to_string()));
        config
    }

    #[tokio::test]
    async fn test_command_writes_artifact_from_env() {
        let dir = tempfile::TempDir::new().unwrap();
        let artifact = dir.path().join("DATA.csv");
        let config = config_with(
            &["sh", "-c", "printf '%s' \"$SOURCE_DATABASE\" > \"$EXPORT_ARTIFACT_PATH\""],
            &artifact,
        );

        let result = CommandExtractor::from_config(&config).extract().await.unwrap();
        assert_eq!(result.path, artifact);
        assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "Sales");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_export_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config_with(&["sh", "-c", "echo boom >&2; exit 3"], &dir.path().join("x.csv"));

        let err = CommandExtractor::from_config(&config)
            .extract()
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Export(ref m) if m.contains("boom")));
    }

    #[tokio::test]
    async fn test_success_without_artifact_is_export_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config_with(&["true"], &dir.path().join("never.csv"));

        let result = CommandExtractor::from_config(&config).extract().await;
        assert!(matches!(result, Err(SyncError::Export(_))));
    }
}
