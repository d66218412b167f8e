#![allow(dead_code)]

use std::cell::RefCell;

use chrono::{NaiveDate, NaiveDateTime};
use ledgerlens_core::{FixedClock, Stage, StageObserver, UnrecoverableField};
use ledgerlens_parser::{RawProfile, RawTransaction};

#[derive(Default)]
pub struct RecordingObserver {
    pub steps: RefCell<Vec<(Stage, String)>>,
    pub dropped: RefCell<Vec<(Stage, UnrecoverableField)>>,
    pub failures: RefCell<Vec<(Stage, String)>>,
}

impl StageObserver for RecordingObserver {
    fn step(&self, stage: Stage, message: &str) {
        self.steps.borrow_mut().push((stage, message.to_string()));
    }

    fn row_dropped(&self, stage: Stage, defect: &UnrecoverableField) {
        self.dropped.borrow_mut().push((stage, defect.clone()));
    }

    fn failed(&self, stage: Stage, message: &str) {
        self.failures.borrow_mut().push((stage, message.to_string()));
    }
}

pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 30)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap()
}

pub fn clock() -> FixedClock {
    FixedClock(fixed_now())
}

fn cell(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

pub fn raw_tx(
    order_id: Option<&str>,
    user_id: Option<&str>,
    product: Option<&str>,
    category: Option<&str>,
    price: Option<&str>,
    quantity: Option<&str>,
    timestamp: Option<&str>,
) -> RawTransaction {
    RawTransaction {
        order_id: cell(order_id),
        user_id: cell(user_id),
        product: cell(product),
        category: cell(category),
        price: cell(price),
        quantity: cell(quantity),
        timestamp: cell(timestamp),
    }
}

/// A well-formed ledger row with the given key, product and price.
pub fn tx(order_id: i64, user_id: i64, product: &str, price: Option<&str>) -> RawTransaction {
    raw_tx(
        Some(&order_id.to_string()),
        Some(&user_id.to_string()),
        Some(product),
        Some("misc"),
        price,
        Some("1"),
        Some("2024-01-01 00:00:00"),
    )
}

pub fn raw_profile(
    user_id: Option<&str>,
    name: Option<&str>,
    email: Option<&str>,
    location: Option<&str>,
    signup_date: Option<&str>,
) -> RawProfile {
    RawProfile {
        user_id: cell(user_id),
        name: cell(name),
        email: cell(email),
        location: cell(location),
        signup_date: cell(signup_date),
    }
}

pub fn parser_fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../ledgerlens-parser/tests/data")
        .join(name)
}
