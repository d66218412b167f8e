use std::fs;
use std::path::Path;

use crate::errors::IngestError;
use crate::model::{cell, RawTransaction, TRANSACTIONS_SOURCE, TRANSACTION_COLUMNS};

/// Reads the delimited ledger file at `path`.
pub fn read_transactions_csv(path: &Path) -> Result<Vec<RawTransaction>, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::SourceUnavailable {
        source_name: TRANSACTIONS_SOURCE,
        path: path.to_path_buf(),
        source,
    })?;
    parse_transactions_csv(&content)
}

/// Parses ledger CSV content. The header must name every ledger column; column order is free
/// and unknown columns are ignored.
pub fn parse_transactions_csv(content: &str) -> Result<Vec<RawTransaction>, IngestError> {
    if content.trim().is_empty() {
        return Err(IngestError::malformed(
            TRANSACTIONS_SOURCE,
            "no columns to parse from file",
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            source_name: TRANSACTIONS_SOURCE,
            source,
        })?
        .clone();

    let mut positions = [0usize; TRANSACTION_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(TRANSACTION_COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or(IngestError::MissingColumn {
                source_name: TRANSACTIONS_SOURCE,
                column,
            })?;
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            source_name: TRANSACTIONS_SOURCE,
            source,
        })?;
        let field = |idx: usize| record.get(positions[idx]).and_then(cell);

        rows.push(RawTransaction {
            order_id: field(0),
            user_id: field(1),
            product: field(2),
            category: field(3),
            price: field(4),
            quantity: field(5),
            timestamp: field(6),
        });
    }

    Ok(rows)
}
