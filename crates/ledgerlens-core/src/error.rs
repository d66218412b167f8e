// crates/ledgerlens-core/src/error.rs

use std::fmt;
use std::path::PathBuf;

use ledgerlens_parser::IngestError;
use thiserror::Error;

/// The datasets that flow through a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Transactions,
    Profiles,
    Consolidated,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Transactions => "transactions",
            Dataset::Profiles => "profiles",
            Dataset::Consolidated => "consolidated",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("no rows left after cleaning {dataset}")]
    DataExhausted { dataset: Dataset },

    #[error("{dataset} contain duplicate {field} {value}")]
    DuplicateKey {
        dataset: Dataset,
        field: &'static str,
        value: i64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("failed to write snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A row-level defect that imputation could not repair. The row is dropped; the run goes on.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row}: {field} {reason} (value {value:?})")]
pub struct UnrecoverableField {
    /// Zero-based position of the row in the raw input.
    pub row: usize,
    pub field: &'static str,
    pub value: Option<String>,
    pub reason: &'static str,
}
