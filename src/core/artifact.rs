//! Export artifact reader
//!
//! The artifact is a comma-delimited file with CRLF line endings, every field
//! quoted and backslash as the escape character. The header must be exactly
//! `ID,STATUS_DATE,RATING`. Record IDs must be unique within one artifact.

use crate::domain::record::{SourceRow, ARTIFACT_HEADER};
use crate::domain::{Result, SyncError};
use csv::{ReaderBuilder, Terminator};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Reads every row of the artifact at `path`
///
/// # Errors
///
/// Returns [`SyncError::Export`] when the file cannot be read, the header does
/// not match, any line is malformed, or a record ID repeats.
pub async fn read_artifact(path: impl AsRef<Path>) -> Result<Vec<SourceRow>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        SyncError::Export(format!(
            "Failed to read export artifact {}: {}",
            path.display(),
            e
        ))
    })?;

    let rows = read_rows(bytes.as_slice())?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Export artifact read");
    Ok(rows)
}

/// Reads rows from any artifact-shaped source
pub fn read_rows<R: Read>(source: R) -> Result<Vec<SourceRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .quoting(true)
        .double_quote(false)
        .escape(Some(b'\\'))
        .terminator(Terminator::CRLF)
        .has_headers(true)
        .from_reader(source);

    let headers = reader.headers()?;
    if headers.iter().ne(ARTIFACT_HEADER.iter().copied()) {
        return Err(SyncError::Export(format!(
            "Unexpected artifact header {:?}, expected {:?}",
            headers.iter().collect::<Vec<_>>(),
            ARTIFACT_HEADER
        )));
    }

    let rows = reader
        .deserialize::<SourceRow>()
        .map(|row| row.map_err(SyncError::from))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(rows.len());
    if let Some(duplicate) = rows.iter().find(|row| !seen.insert(row.id.as_str())) {
        return Err(SyncError::Export(format!(
            "Duplicate record ID '{}' in export artifact",
            duplicate.id
        )));
    }

    Ok(rows)
}
