use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use ledgerlens_parser::{read_profiles_json, read_transactions_csv, RawProfile, RawTransaction};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::consolidate::{consolidate, ConsolidatedSet};
use crate::error::Result;
use crate::frames;
use crate::observer::{Stage, StageObserver};
use crate::records::{Profile, Segment, Transaction};
use crate::sanitize::{sanitize_profiles, sanitize_transactions, SanitizeReport};
use crate::segmentation::SegmentThresholds;
use crate::snapshot::{SnapshotWriter, CLEANED_DIR, EXTRACTED_DIR, TRANSFORMED_DIR};

/// What a completed run did, suitable for printing or serializing.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub run_id: Uuid,
    pub started_at: NaiveDateTime,
    pub transactions: SanitizeReport,
    pub profiles: SanitizeReport,
    pub consolidated_rows: usize,
    pub customers: usize,
    /// Distinct customers per segment, Low to High.
    pub customers_per_segment: BTreeMap<Segment, usize>,
    pub snapshots: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub transactions: Vec<Transaction>,
    pub profiles: Vec<Profile>,
    pub consolidated: ConsolidatedSet,
    pub summary: PipelineSummary,
}

/// Reads both sources named in `config` and runs every stage.
pub fn run_pipeline(
    config: &PipelineConfig,
    clock: &dyn Clock,
    observer: &dyn StageObserver,
) -> Result<PipelineOutput> {
    config.validate()?;

    let raw_transactions = read_transactions_csv(&config.transactions_path).map_err(|err| {
        observer.failed(Stage::Extract, &err.to_string());
        err
    })?;
    observer.step(
        Stage::Extract,
        &format!("loaded {} transaction rows", raw_transactions.len()),
    );

    let raw_profiles = read_profiles_json(&config.profiles_path).map_err(|err| {
        observer.failed(Stage::Extract, &err.to_string());
        err
    })?;
    observer.step(
        Stage::Extract,
        &format!("loaded {} profile rows", raw_profiles.len()),
    );

    let snapshots = config.snapshot_writer();
    process(
        &raw_transactions,
        &raw_profiles,
        &config.segmentation,
        snapshots.as_ref(),
        clock,
        observer,
    )
}

/// Runs sanitization and consolidation over already extracted rows.
///
/// Snapshots, when a writer is given, are written after each stage succeeds; a failing stage
/// leaves no snapshot for itself or any later stage.
pub fn process(
    raw_transactions: &[RawTransaction],
    raw_profiles: &[RawProfile],
    thresholds: &SegmentThresholds,
    snapshots: Option<&SnapshotWriter>,
    clock: &dyn Clock,
    observer: &dyn StageObserver,
) -> Result<PipelineOutput> {
    let run_id = Uuid::new_v4();
    let started_at = clock.now();
    observer.step(Stage::Extract, &format!("run {run_id} started"));

    let mut written = Vec::new();
    if let Some(writer) = snapshots {
        written.push(writer.write(
            EXTRACTED_DIR,
            "transactions",
            &frames::raw_transactions_frame(raw_transactions)?,
        )?);
        written.push(writer.write(
            EXTRACTED_DIR,
            "profiles",
            &frames::raw_profiles_frame(raw_profiles)?,
        )?);
    }

    let transactions = sanitize_transactions(raw_transactions, clock, observer)?;
    if let Some(writer) = snapshots {
        written.push(writer.write(
            CLEANED_DIR,
            "transactions",
            &frames::transactions_frame(&transactions.records)?,
        )?);
    }

    let profiles = sanitize_profiles(raw_profiles, clock, observer)?;
    if let Some(writer) = snapshots {
        written.push(writer.write(
            CLEANED_DIR,
            "profiles",
            &frames::profiles_frame(&profiles.records)?,
        )?);
    }

    let consolidated = consolidate(
        &transactions.records,
        &profiles.records,
        thresholds,
        observer,
    )?;
    if let Some(writer) = snapshots {
        written.push(writer.write(
            TRANSFORMED_DIR,
            "processed_transactions",
            &frames::consolidated_frame(consolidated.records())?,
        )?);
    }
    for path in &written {
        observer.step(Stage::Snapshot, &format!("saved {}", path.display()));
    }

    let customers_per_segment = consolidated.customers_per_segment();

    let summary = PipelineSummary {
        run_id,
        started_at,
        transactions: transactions.report,
        profiles: profiles.report,
        consolidated_rows: consolidated.len(),
        customers: customers_per_segment.values().sum(),
        customers_per_segment,
        snapshots: written,
    };

    Ok(PipelineOutput {
        transactions: transactions.records,
        profiles: profiles.records,
        consolidated,
        summary,
    })
}
