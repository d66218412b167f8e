use std::collections::{BTreeMap, HashMap};

use crate::error::{Dataset, PipelineError, Result};
use crate::observer::{Stage, StageObserver};
use crate::records::{ConsolidatedRecord, Profile, Segment, Transaction};
use crate::segmentation::SegmentThresholds;

const STAGE: Stage = Stage::Consolidate;

/// The terminal record set of a run, in join order and addressable by order id.
#[derive(Debug, Clone, Default)]
pub struct ConsolidatedSet {
    records: Vec<ConsolidatedRecord>,
    by_order: BTreeMap<i64, usize>,
}

impl ConsolidatedSet {
    pub fn records(&self) -> &[ConsolidatedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ConsolidatedRecord> {
        self.records
    }

    pub fn get(&self, order_id: i64) -> Option<&ConsolidatedRecord> {
        self.by_order.get(&order_id).map(|idx| &self.records[*idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lifetime value of every customer present in the set.
    pub fn lifetime_values(&self) -> BTreeMap<i64, f64> {
        self.records
            .iter()
            .map(|record| (record.user_id, record.customer_lifetime_value))
            .collect()
    }

    /// Number of distinct customers per segment; every segment is present, possibly with zero.
    pub fn customers_per_segment(&self) -> BTreeMap<Segment, usize> {
        let mut segments: BTreeMap<i64, Segment> = BTreeMap::new();
        for record in &self.records {
            segments.insert(record.user_id, record.segment);
        }

        let mut counts: BTreeMap<Segment, usize> =
            Segment::ALL.iter().map(|segment| (*segment, 0)).collect();
        for segment in segments.values() {
            *counts.entry(*segment).or_insert(0) += 1;
        }
        counts
    }
}

/// Joins sanitized transactions to profiles and derives per-customer metrics.
///
/// Only transactions whose user has a profile survive the inner join. Lifetime value is summed
/// over the joined rows, segmented once per customer and copied onto each of their rows.
pub fn consolidate(
    transactions: &[Transaction],
    profiles: &[Profile],
    thresholds: &SegmentThresholds,
    observer: &dyn StageObserver,
) -> Result<ConsolidatedSet> {
    thresholds.validate()?;

    let mut locations: HashMap<i64, &str> = HashMap::with_capacity(profiles.len());
    for profile in profiles {
        if locations
            .insert(profile.user_id, profile.location.as_str())
            .is_some()
        {
            return Err(duplicate(observer, Dataset::Profiles, "user_id", profile.user_id));
        }
    }

    let joined: Vec<(&Transaction, f64, &str)> = transactions
        .iter()
        .filter_map(|transaction| {
            locations
                .get(&transaction.user_id)
                .map(|location| (transaction, transaction.total_price(), *location))
        })
        .collect();
    observer.step(
        STAGE,
        &format!(
            "joined {} of {} transactions to profiles",
            joined.len(),
            transactions.len()
        ),
    );

    let mut lifetime_values: HashMap<i64, f64> = HashMap::new();
    for (transaction, total_price, _) in &joined {
        *lifetime_values.entry(transaction.user_id).or_insert(0.0) += total_price;
    }
    observer.step(
        STAGE,
        &format!(
            "calculated lifetime value for {} customers",
            lifetime_values.len()
        ),
    );

    let segments: HashMap<i64, Segment> = lifetime_values
        .iter()
        .map(|(user_id, value)| (*user_id, thresholds.classify(*value)))
        .collect();

    let mut records = Vec::with_capacity(joined.len());
    let mut by_order = BTreeMap::new();
    for (transaction, total_price, location) in joined {
        if by_order.insert(transaction.order_id, records.len()).is_some() {
            return Err(duplicate(
                observer,
                Dataset::Transactions,
                "order_id",
                transaction.order_id,
            ));
        }

        let customer_lifetime_value = lifetime_values[&transaction.user_id];
        records.push(ConsolidatedRecord {
            order_id: transaction.order_id,
            user_id: transaction.user_id,
            product: transaction.product.clone(),
            category: transaction.category.clone(),
            price: transaction.price,
            quantity: transaction.quantity,
            total_price,
            timestamp: transaction.timestamp,
            location: location.to_string(),
            customer_lifetime_value,
            segment: segments[&transaction.user_id],
        });
    }

    if records.is_empty() {
        observer.step(
            STAGE,
            "no transaction matched a profile; consolidated set is empty",
        );
    }
    observer.step(
        STAGE,
        &format!("generated segment labels for {} rows", records.len()),
    );

    Ok(ConsolidatedSet { records, by_order })
}

fn duplicate(
    observer: &dyn StageObserver,
    dataset: Dataset,
    field: &'static str,
    value: i64,
) -> PipelineError {
    let err = PipelineError::DuplicateKey {
        dataset,
        field,
        value,
    };
    observer.failed(STAGE, &err.to_string());
    err
}
