use std::fs;
use std::path::{Path, PathBuf};

use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::DataFrame;
use tempfile::NamedTempFile;

use crate::error::{PipelineError, Result};

pub const EXTRACTED_DIR: &str = "extracted";
pub const CLEANED_DIR: &str = "cleaned";
pub const TRANSFORMED_DIR: &str = "transformed";

/// Writes per-stage parquet snapshots below a root directory, one sub-directory per stage.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    root: PathBuf,
}

impl SnapshotWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, stage_dir: &str, name: &str) -> PathBuf {
        self.root.join(stage_dir).join(format!("{name}.parquet"))
    }

    /// Writes `frame` to `<root>/<stage_dir>/<name>.parquet`, replacing any previous snapshot.
    pub fn write(&self, stage_dir: &str, name: &str, frame: &DataFrame) -> Result<PathBuf> {
        let dir = self.root.join(stage_dir);
        fs::create_dir_all(&dir).map_err(|source| PipelineError::Snapshot {
            path: dir.clone(),
            source,
        })?;

        let path = self.path_for(stage_dir, name);
        let mut staged = NamedTempFile::new_in(&dir).map_err(|source| PipelineError::Snapshot {
            path: dir.clone(),
            source,
        })?;

        let mut clone = frame.clone();
        ParquetWriter::new(staged.as_file_mut())
            .with_compression(ParquetCompression::Zstd(None))
            .with_statistics(StatisticsOptions::default())
            .finish(&mut clone)?;

        // The target only ever holds a complete file; a failed write drops the staged one.
        staged
            .persist(&path)
            .map_err(|err| PipelineError::Snapshot {
                path: path.clone(),
                source: err.error,
            })?;

        tracing::debug!(path = %path.display(), rows = frame.height(), "snapshot written");
        Ok(path)
    }
}
