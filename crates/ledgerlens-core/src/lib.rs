pub mod clock;
pub mod coerce;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod frames;
pub mod observer;
pub mod pipeline;
pub mod records;
pub mod sanitize;
pub mod segmentation;
pub mod snapshot;
pub mod text;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PipelineConfig;
pub use consolidate::{consolidate, ConsolidatedSet};
pub use error::{Dataset, PipelineError, Result, UnrecoverableField};
pub use observer::{SilentObserver, Stage, StageObserver, TracingObserver};
pub use pipeline::{process, run_pipeline, PipelineOutput, PipelineSummary};
pub use records::{ConsolidatedRecord, Profile, Segment, Transaction};
pub use sanitize::{sanitize_profiles, sanitize_transactions, SanitizeReport, Sanitized};
pub use segmentation::SegmentThresholds;
pub use snapshot::SnapshotWriter;
