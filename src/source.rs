// Snapshot source: fetches the tracker's counter snapshot and turns it into a RawLog.

use std::future::Future;
use std::path::PathBuf;

use tracing::instrument;

use crate::models::{LogError, RawLog, RawSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("reading snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
    #[error("snapshot has a bad shape: {0}")]
    Shape(#[from] LogError),
}

pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<RawLog, SourceError>> + Send;
}

/// Reads a `database.json`-style file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<RawLog, SourceError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        parse_snapshot(&data)
    }
}

/// Serves an in-memory snapshot, or a fixed failure.
#[derive(Debug, Clone)]
pub struct MemorySource {
    snapshot: Option<RawSnapshot>,
}

impl MemorySource {
    pub fn new(snapshot: RawSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    /// Every fetch fails with a not-found I/O error.
    pub fn missing() -> Self {
        Self { snapshot: None }
    }
}

impl SnapshotSource for MemorySource {
    async fn fetch(&self) -> Result<RawLog, SourceError> {
        match &self.snapshot {
            Some(s) => Ok(RawLog::try_from(s.clone())?),
            None => Err(SourceError::Io {
                path: "<memory>".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

pub fn parse_snapshot(data: &str) -> Result<RawLog, SourceError> {
    let snapshot: RawSnapshot = serde_json::from_str(data)?;
    Ok(RawLog::try_from(snapshot)?)
}
