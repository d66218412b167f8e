use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{source_name} source unavailable at {}: {source}", path.display())]
    SourceUnavailable {
        source_name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name} input malformed: {reason}")]
    MalformedInput {
        source_name: &'static str,
        reason: String,
    },

    #[error("{source_name} header is missing required column {column}")]
    MissingColumn {
        source_name: &'static str,
        column: &'static str,
    },

    #[error("{source_name} CSV error: {source}")]
    Csv {
        source_name: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name} JSON error: {source}")]
    Json {
        source_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl IngestError {
    pub fn malformed(source_name: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            source_name,
            reason: reason.into(),
        }
    }

    /// True for every variant that describes a structurally broken source, as opposed to
    /// one that could not be opened at all.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, IngestError::SourceUnavailable { .. })
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            IngestError::SourceUnavailable { source_name, .. }
            | IngestError::MalformedInput { source_name, .. }
            | IngestError::MissingColumn { source_name, .. }
            | IngestError::Csv { source_name, .. }
            | IngestError::Json { source_name, .. } => source_name,
        }
    }
}
