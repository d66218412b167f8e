//! Columnar views of each stage's records. Every frame leads with its key column.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use ledgerlens_parser::{RawProfile, RawTransaction, PROFILE_COLUMNS, TRANSACTION_COLUMNS};
use polars::prelude::*;

use crate::records::{ConsolidatedRecord, Profile, Transaction};

pub const CONSOLIDATED_COLUMNS: [&str; 11] = [
    "order_id",
    "user_id",
    "product",
    "category",
    "price",
    "quantity",
    "total_price",
    "timestamp",
    "location",
    "customer_lifetime_value",
    "segment",
];

const DAYS_FROM_CE_TO_UNIX_EPOCH: i32 = 719_163;

/// Raw ledger rows as all-text columns, missing cells as nulls.
pub fn raw_transactions_frame(rows: &[RawTransaction]) -> PolarsResult<DataFrame> {
    let cells: [fn(&RawTransaction) -> Option<&str>; 7] = [
        |row| row.order_id.as_deref(),
        |row| row.user_id.as_deref(),
        |row| row.product.as_deref(),
        |row| row.category.as_deref(),
        |row| row.price.as_deref(),
        |row| row.quantity.as_deref(),
        |row| row.timestamp.as_deref(),
    ];

    let columns = TRANSACTION_COLUMNS
        .iter()
        .zip(cells)
        .map(|(name, cell)| text_column(name, rows.iter().map(cell).collect()))
        .collect();
    DataFrame::new(columns)
}

pub fn raw_profiles_frame(rows: &[RawProfile]) -> PolarsResult<DataFrame> {
    let cells: [fn(&RawProfile) -> Option<&str>; 5] = [
        |row| row.user_id.as_deref(),
        |row| row.name.as_deref(),
        |row| row.email.as_deref(),
        |row| row.location.as_deref(),
        |row| row.signup_date.as_deref(),
    ];

    let columns = PROFILE_COLUMNS
        .iter()
        .zip(cells)
        .map(|(name, cell)| text_column(name, rows.iter().map(cell).collect()))
        .collect();
    DataFrame::new(columns)
}

pub fn transactions_frame(records: &[Transaction]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(
            "order_id".into(),
            records.iter().map(|r| r.order_id).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "user_id".into(),
            records.iter().map(|r| r.user_id).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "product".into(),
            records.iter().map(|r| r.product.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "category".into(),
            records.iter().map(|r| r.category.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "price".into(),
            records.iter().map(|r| r.price).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "quantity".into(),
            records.iter().map(|r| r.quantity).collect::<Vec<_>>(),
        )
        .into(),
        datetime_column("timestamp", records.iter().map(|r| &r.timestamp))?,
    ])
}

pub fn profiles_frame(records: &[Profile]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(
            "user_id".into(),
            records.iter().map(|r| r.user_id).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "name".into(),
            records.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "email".into(),
            records.iter().map(|r| r.email.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "location".into(),
            records.iter().map(|r| r.location.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        date_column("signup_date", records.iter().map(|r| &r.signup_date))?,
    ])
}

/// The consolidated set in canonical column order.
pub fn consolidated_frame(records: &[ConsolidatedRecord]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(
            "order_id".into(),
            records.iter().map(|r| r.order_id).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "user_id".into(),
            records.iter().map(|r| r.user_id).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "product".into(),
            records.iter().map(|r| r.product.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "category".into(),
            records.iter().map(|r| r.category.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "price".into(),
            records.iter().map(|r| r.price).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "quantity".into(),
            records.iter().map(|r| r.quantity).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "total_price".into(),
            records.iter().map(|r| r.total_price).collect::<Vec<_>>(),
        )
        .into(),
        datetime_column("timestamp", records.iter().map(|r| &r.timestamp))?,
        Series::new(
            "location".into(),
            records.iter().map(|r| r.location.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "customer_lifetime_value".into(),
            records
                .iter()
                .map(|r| r.customer_lifetime_value)
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "segment".into(),
            records.iter().map(|r| r.segment.as_str()).collect::<Vec<_>>(),
        )
        .into(),
    ])
}

fn text_column(name: &str, values: Vec<Option<&str>>) -> Column {
    Series::new(name.into(), values).into()
}

fn datetime_column<'a>(
    name: &str,
    values: impl Iterator<Item = &'a NaiveDateTime>,
) -> PolarsResult<Column> {
    let micros: Vec<i64> = values
        .map(|value| value.and_utc().timestamp_micros())
        .collect();
    let series = Series::new(name.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    Ok(series.into())
}

fn date_column<'a>(
    name: &str,
    values: impl Iterator<Item = &'a NaiveDate>,
) -> PolarsResult<Column> {
    let days: Vec<i32> = values
        .map(|value| value.num_days_from_ce() - DAYS_FROM_CE_TO_UNIX_EPOCH)
        .collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into())
}
