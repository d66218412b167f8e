mod common;

use std::fs::File;

use anyhow::Result;
use common::{clock, parser_fixture};
use ledgerlens_core::frames::{
    consolidated_frame, profiles_frame, raw_transactions_frame, transactions_frame,
    CONSOLIDATED_COLUMNS,
};
use ledgerlens_core::snapshot::{SnapshotWriter, TRANSFORMED_DIR};
use ledgerlens_core::{
    consolidate, sanitize_profiles, sanitize_transactions, ConsolidatedSet, PipelineError,
    SegmentThresholds, SilentObserver,
};
use ledgerlens_parser::{read_profiles_json, read_transactions_csv, TRANSACTION_COLUMNS};
use polars::prelude::*;

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn fixture_set() -> Result<ConsolidatedSet> {
    let raw_transactions = read_transactions_csv(&parser_fixture("transactions_mock.csv"))?;
    let raw_profiles = read_profiles_json(&parser_fixture("profiles_mock.json"))?;
    let transactions = sanitize_transactions(&raw_transactions, &clock(), &SilentObserver)?;
    let profiles = sanitize_profiles(&raw_profiles, &clock(), &SilentObserver)?;
    Ok(consolidate(
        &transactions.records,
        &profiles.records,
        &SegmentThresholds::default(),
        &SilentObserver,
    )?)
}

#[test]
fn raw_frame_keeps_missing_cells_as_nulls() -> Result<()> {
    let raw = read_transactions_csv(&parser_fixture("transactions_mock.csv"))?;
    let df = raw_transactions_frame(&raw)?;

    assert_eq!(df.height(), 11);
    assert_eq!(column_names(&df), TRANSACTION_COLUMNS.to_vec());
    assert_eq!(df.column("price")?.null_count(), 2);
    assert_eq!(df.column("user_id")?.str()?.get(5), None);
    assert_eq!(df.column("order_id")?.str()?.get(0), Some("1"));
    Ok(())
}

#[test]
fn cleaned_frames_are_typed() -> Result<()> {
    let raw_transactions = read_transactions_csv(&parser_fixture("transactions_mock.csv"))?;
    let transactions = sanitize_transactions(&raw_transactions, &clock(), &SilentObserver)?;
    let df = transactions_frame(&transactions.records)?;

    assert_eq!(df.height(), 7);
    assert_eq!(column_names(&df)[0], "order_id");
    assert_eq!(df.column("order_id")?.dtype(), &DataType::Int64);
    assert_eq!(df.column("price")?.dtype(), &DataType::Float64);
    assert_eq!(
        df.column("timestamp")?.dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );
    assert_eq!(df.column("category")?.str()?.get(0), Some("Electronics"));

    let raw_profiles = read_profiles_json(&parser_fixture("profiles_mock.json"))?;
    let profiles = sanitize_profiles(&raw_profiles, &clock(), &SilentObserver)?;
    let df = profiles_frame(&profiles.records)?;

    assert_eq!(df.height(), 5);
    assert_eq!(column_names(&df)[0], "user_id");
    assert_eq!(df.column("signup_date")?.dtype(), &DataType::Date);
    assert_eq!(df.column("location")?.str()?.get(0), Some("New York"));
    Ok(())
}

#[test]
fn consolidated_frame_uses_canonical_order() -> Result<()> {
    let set = fixture_set()?;
    let df = consolidated_frame(set.records())?;

    assert_eq!(column_names(&df), CONSOLIDATED_COLUMNS.to_vec());
    assert_eq!(df.height(), 6);

    let segment = df.column("segment")?.str()?;
    assert_eq!(segment.get(0), Some("Medium"));
    assert_eq!(segment.get(5), Some("High"));

    let clv = df.column("customer_lifetime_value")?.f64()?;
    assert_eq!(clv.get(0), Some(1251.0));
    Ok(())
}

#[test]
fn snapshot_round_trips_through_parquet() -> Result<()> {
    let set = fixture_set()?;
    let df = consolidated_frame(set.records())?;

    let dir = tempfile::tempdir()?;
    let writer = SnapshotWriter::new(dir.path());
    let path = writer.write(TRANSFORMED_DIR, "processed_transactions", &df)?;

    assert_eq!(
        path,
        dir.path()
            .join("transformed")
            .join("processed_transactions.parquet")
    );

    let read = ParquetReader::new(File::open(&path)?).finish()?;
    assert_eq!(read.height(), df.height());
    assert_eq!(column_names(&read), CONSOLIDATED_COLUMNS.to_vec());
    assert_eq!(read.column("order_id")?.i64()?.get(5), Some(8));
    assert_eq!(read.column("location")?.str()?.get(0), Some("New York"));
    Ok(())
}

fn entries(dir: &std::path::Path) -> Result<Vec<String>> {
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn snapshot_rewrite_leaves_a_single_file() -> Result<()> {
    let set = fixture_set()?;
    let df = consolidated_frame(set.records())?;

    let dir = tempfile::tempdir()?;
    let writer = SnapshotWriter::new(dir.path());
    writer.write(TRANSFORMED_DIR, "processed_transactions", &df)?;
    let path = writer.write(TRANSFORMED_DIR, "processed_transactions", &df.head(Some(2)))?;

    assert_eq!(
        entries(&dir.path().join(TRANSFORMED_DIR))?,
        vec!["processed_transactions.parquet".to_string()]
    );
    let read = ParquetReader::new(File::open(&path)?).finish()?;
    assert_eq!(read.height(), 2);
    Ok(())
}

#[test]
fn failed_snapshot_leaves_no_staged_file() -> Result<()> {
    let set = fixture_set()?;
    let df = consolidated_frame(set.records())?;

    let dir = tempfile::tempdir()?;
    let writer = SnapshotWriter::new(dir.path());
    // A non-empty directory squatting on the target path makes the final rename fail.
    let target = writer.path_for(TRANSFORMED_DIR, "processed_transactions");
    std::fs::create_dir_all(&target)?;
    std::fs::write(target.join("keep"), b"x")?;

    let err = writer
        .write(TRANSFORMED_DIR, "processed_transactions", &df)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Snapshot { .. }));

    assert_eq!(
        entries(&dir.path().join(TRANSFORMED_DIR))?,
        vec!["processed_transactions.parquet".to_string()]
    );
    assert!(target.is_dir());
    Ok(())
}
