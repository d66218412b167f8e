mod profiles;
mod transactions;

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

use crate::coerce::parse_price;

pub use profiles::{normalize_location, sanitize_profiles, DEFAULT_LOCATION, DEFAULT_NAME};
pub use transactions::{sanitize_transactions, UNKNOWN};

/// Counts of every repair and drop a sanitization pass performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub missing_keys_dropped: usize,
    pub defaults_filled: usize,
    pub prices_imputed: usize,
    pub dates_imputed: usize,
    pub missing_price_dropped: usize,
    pub unrecoverable_dropped: usize,
    pub output_rows: usize,
}

/// Output of a sanitization pass.
#[derive(Debug, Clone)]
pub struct Sanitized<T> {
    pub records: Vec<T>,
    pub report: SanitizeReport,
}

/// Identity of one cell for duplicate detection. Numeric cells compare by parsed value, so
/// `1` and `1.0` are the same cell; anything that does not parse compares as text.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DedupeCell<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl<'a> DedupeCell<'a> {
    fn text(value: Option<&'a str>) -> Self {
        value.map_or(DedupeCell::Missing, DedupeCell::Text)
    }

    fn numeric(value: Option<&'a str>) -> Self {
        match value {
            None => DedupeCell::Missing,
            Some(text) => match parse_price(text) {
                // -0.0 and 0.0 are equal values with different bits.
                Some(number) if number == 0.0 => DedupeCell::Number(0f64.to_bits()),
                Some(number) => DedupeCell::Number(number.to_bits()),
                None => DedupeCell::Text(text),
            },
        }
    }
}

/// Keeps the first occurrence of every distinct row key, paired with its raw position.
fn dedupe<'a, T, K, F>(rows: &'a [T], key: F) -> Vec<(usize, &'a T)>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut seen: HashSet<K> = HashSet::with_capacity(rows.len());
    rows.iter()
        .enumerate()
        .filter(|(_, row)| seen.insert(key(*row)))
        .collect()
}
