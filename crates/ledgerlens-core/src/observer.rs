use std::fmt;

use crate::error::UnrecoverableField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    SanitizeTransactions,
    SanitizeProfiles,
    Consolidate,
    Snapshot,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::SanitizeTransactions => "clean_transactions",
            Stage::SanitizeProfiles => "clean_profiles",
            Stage::Consolidate => "transform",
            Stage::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives progress from each stage. Every stage takes one as an argument.
pub trait StageObserver {
    fn step(&self, stage: Stage, message: &str);

    fn row_dropped(&self, stage: Stage, defect: &UnrecoverableField) {
        self.step(stage, &format!("dropped {defect}"));
    }

    fn failed(&self, stage: Stage, message: &str) {
        self.step(stage, message);
    }
}

/// Forwards stage events to `tracing` with the stage as a structured field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn step(&self, stage: Stage, message: &str) {
        tracing::info!(stage = stage.as_str(), "{message}");
    }

    fn row_dropped(&self, stage: Stage, defect: &UnrecoverableField) {
        tracing::warn!(
            stage = stage.as_str(),
            row = defect.row,
            field = defect.field,
            reason = defect.reason,
            "dropped unrecoverable row"
        );
    }

    fn failed(&self, stage: Stage, message: &str) {
        tracing::error!(stage = stage.as_str(), "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl StageObserver for SilentObserver {
    fn step(&self, _stage: Stage, _message: &str) {}
}
