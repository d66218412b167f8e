use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::segmentation::SegmentThresholds;
use crate::snapshot::SnapshotWriter;

pub const DEFAULT_TRANSACTIONS_PATH: &str = "data/raw/transactions_mock.csv";
pub const DEFAULT_PROFILES_PATH: &str = "data/raw/profiles_mock.json";
pub const DEFAULT_SNAPSHOT_ROOT: &str = "data";

/// Settings for one pipeline run, usually read from a TOML file:
///
/// ```toml
/// transactions_path = "data/raw/transactions_mock.csv"
/// profiles_path = "data/raw/profiles_mock.json"
/// snapshots = true
/// snapshot_root = "data"
///
/// [segmentation]
/// low = 1000.0
/// high = 5000.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub transactions_path: PathBuf,
    pub profiles_path: PathBuf,
    /// Write parquet snapshots after every stage.
    pub snapshots: bool,
    pub snapshot_root: PathBuf,
    pub segmentation: SegmentThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transactions_path: PathBuf::from(DEFAULT_TRANSACTIONS_PATH),
            profiles_path: PathBuf::from(DEFAULT_PROFILES_PATH),
            snapshots: true,
            snapshot_root: PathBuf::from(DEFAULT_SNAPSHOT_ROOT),
            segmentation: SegmentThresholds::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|err| PipelineError::Config(format!("invalid pipeline config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            PipelineError::Config(format!("failed to read config {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()
    }

    pub fn snapshot_writer(&self) -> Option<SnapshotWriter> {
        self.snapshots
            .then(|| SnapshotWriter::new(self.snapshot_root.clone()))
    }
}
