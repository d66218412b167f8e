use std::collections::HashMap;

use chrono::NaiveDateTime;
use ledgerlens_parser::RawTransaction;

use super::{dedupe, DedupeCell, SanitizeReport, Sanitized};
use crate::clock::Clock;
use crate::coerce::{parse_integral, parse_price, parse_timestamp};
use crate::error::{Dataset, PipelineError, Result, UnrecoverableField};
use crate::observer::{Stage, StageObserver};
use crate::records::Transaction;
use crate::text::title_case;

pub const UNKNOWN: &str = "Unknown";

const STAGE: Stage = Stage::SanitizeTransactions;

/// A row that still carries its key cells as text.
struct PendingTransaction<'a> {
    row: usize,
    order_id: &'a str,
    user_id: &'a str,
    quantity: &'a str,
    product: String,
    category: String,
    price: Option<f64>,
    timestamp: NaiveDateTime,
}

/// Repairs raw ledger rows into [`Transaction`]s.
///
/// Steps run in a fixed order: dedupe, drop rows without keys, fill product/category, copy a
/// missing price from the first other row of the same product, parse timestamps, drop rows still without a price, coerce, title-case
/// categories. Fails with [`PipelineError::DataExhausted`] when nothing survives.
pub fn sanitize_transactions(
    raw: &[RawTransaction],
    clock: &dyn Clock,
    observer: &dyn StageObserver,
) -> Result<Sanitized<Transaction>> {
    let mut report = SanitizeReport {
        input_rows: raw.len(),
        ..SanitizeReport::default()
    };

    let unique = dedupe(raw, dedupe_key);
    report.duplicates_removed = raw.len() - unique.len();
    observer.step(
        STAGE,
        &format!("removed {} duplicate rows", report.duplicates_removed),
    );

    let mut pending = Vec::with_capacity(unique.len());
    for (row, record) in unique {
        let (Some(order_id), Some(user_id), Some(quantity)) = (
            record.order_id.as_deref(),
            record.user_id.as_deref(),
            record.quantity.as_deref(),
        ) else {
            report.missing_keys_dropped += 1;
            observer.row_dropped(STAGE, &missing_key(row, record));
            continue;
        };

        let product = record.product.clone().unwrap_or_else(|| {
            report.defaults_filled += 1;
            UNKNOWN.to_string()
        });
        let category = record.category.clone().unwrap_or_else(|| {
            report.defaults_filled += 1;
            UNKNOWN.to_string()
        });
        let price = record
            .price
            .as_deref()
            .and_then(parse_price)
            .filter(|price| *price >= 0.0);

        pending.push((
            record,
            PendingTransaction {
                row,
                order_id,
                user_id,
                quantity,
                product,
                category,
                price,
                timestamp: NaiveDateTime::MIN,
            },
        ));
    }
    observer.step(
        STAGE,
        &format!(
            "removed {} rows with missing ids; filled {} missing product/category values",
            report.missing_keys_dropped, report.defaults_filled
        ),
    );

    let reference_prices = reference_prices(&pending);
    let now = clock.now();
    for (record, entry) in pending.iter_mut() {
        if entry.price.is_none() {
            let donor = reference_prices
                .get(entry.product.as_str())
                .and_then(|occurrences| occurrences.iter().find(|(row, _)| *row != entry.row))
                .and_then(|(_, price)| *price);
            if let Some(price) = donor {
                entry.price = Some(price);
                report.prices_imputed += 1;
            }
        }

        entry.timestamp = match record.timestamp.as_deref().and_then(parse_timestamp) {
            Some(timestamp) => timestamp,
            None => {
                report.dates_imputed += 1;
                now
            }
        };
    }
    observer.step(
        STAGE,
        &format!(
            "imputed {} prices and {} timestamps",
            report.prices_imputed, report.dates_imputed
        ),
    );

    let mut records = Vec::with_capacity(pending.len());
    for (record, entry) in pending {
        let Some(price) = entry.price else {
            report.missing_price_dropped += 1;
            observer.row_dropped(
                STAGE,
                &UnrecoverableField {
                    row: entry.row,
                    field: "price",
                    value: record.price.clone(),
                    reason: "is missing and the first other row of the product has no price",
                },
            );
            continue;
        };

        match coerce(entry, price) {
            Ok(transaction) => records.push(transaction),
            Err(defect) => {
                report.unrecoverable_dropped += 1;
                observer.row_dropped(STAGE, &defect);
            }
        }
    }
    observer.step(
        STAGE,
        &format!(
            "removed {} rows without price and {} rows with invalid keys",
            report.missing_price_dropped, report.unrecoverable_dropped
        ),
    );

    if records.is_empty() {
        let err = PipelineError::DataExhausted {
            dataset: Dataset::Transactions,
        };
        observer.failed(STAGE, &err.to_string());
        return Err(err);
    }

    report.output_rows = records.len();
    observer.step(STAGE, &format!("{} transactions cleaned", records.len()));

    Ok(Sanitized { records, report })
}

/// First two occurrences of every product as `(row, price)`, in input order, prices as read.
/// Two are enough to find the first occurrence other than any given row.
fn reference_prices(
    pending: &[(&RawTransaction, PendingTransaction<'_>)],
) -> HashMap<String, Vec<(usize, Option<f64>)>> {
    let mut occurrences: HashMap<String, Vec<(usize, Option<f64>)>> = HashMap::new();
    for (_, entry) in pending {
        let seen = occurrences.entry(entry.product.clone()).or_default();
        if seen.len() < 2 {
            seen.push((entry.row, entry.price));
        }
    }
    occurrences
}

fn dedupe_key(record: &RawTransaction) -> [DedupeCell<'_>; 7] {
    [
        DedupeCell::numeric(record.order_id.as_deref()),
        DedupeCell::numeric(record.user_id.as_deref()),
        DedupeCell::text(record.product.as_deref()),
        DedupeCell::text(record.category.as_deref()),
        DedupeCell::numeric(record.price.as_deref()),
        DedupeCell::numeric(record.quantity.as_deref()),
        DedupeCell::text(record.timestamp.as_deref()),
    ]
}

fn coerce(
    entry: PendingTransaction<'_>,
    price: f64,
) -> std::result::Result<Transaction, UnrecoverableField> {
    let integral = |field: &'static str, value: &str| {
        parse_integral(value).ok_or_else(|| UnrecoverableField {
            row: entry.row,
            field,
            value: Some(value.to_string()),
            reason: "is not an integer",
        })
    };

    let order_id = integral("order_id", entry.order_id)?;
    let user_id = integral("user_id", entry.user_id)?;
    let quantity = integral("quantity", entry.quantity)?;
    if quantity <= 0 {
        return Err(UnrecoverableField {
            row: entry.row,
            field: "quantity",
            value: Some(entry.quantity.to_string()),
            reason: "is not positive",
        });
    }

    Ok(Transaction {
        order_id,
        user_id,
        category: title_case(&entry.category),
        product: entry.product,
        price,
        quantity,
        timestamp: entry.timestamp,
    })
}

fn missing_key(row: usize, record: &RawTransaction) -> UnrecoverableField {
    let field = if record.order_id.is_none() {
        "order_id"
    } else if record.user_id.is_none() {
        "user_id"
    } else {
        "quantity"
    };

    UnrecoverableField {
        row,
        field,
        value: None,
        reason: "is missing",
    }
}
