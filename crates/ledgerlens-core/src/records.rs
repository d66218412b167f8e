use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use ledgerlens_parser::{RawProfile, RawTransaction};
use serde::Serialize;

use crate::coerce::{format_date, format_timestamp};

/// A sanitized purchase event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub order_id: i64,
    pub user_id: i64,
    pub product: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub timestamp: NaiveDateTime,
}

impl Transaction {
    pub fn total_price(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Renders the record back into raw cells, e.g. to feed a cleaned set through the
    /// sanitizer again.
    pub fn to_raw(&self) -> RawTransaction {
        RawTransaction {
            order_id: Some(self.order_id.to_string()),
            user_id: Some(self.user_id.to_string()),
            product: Some(self.product.clone()),
            category: Some(self.category.clone()),
            price: Some(self.price.to_string()),
            quantity: Some(self.quantity.to_string()),
            timestamp: Some(format_timestamp(&self.timestamp)),
        }
    }
}

/// A sanitized customer profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub location: String,
    pub signup_date: NaiveDate,
}

impl Profile {
    pub fn to_raw(&self) -> RawProfile {
        RawProfile {
            user_id: Some(self.user_id.to_string()),
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            location: Some(self.location.clone()),
            signup_date: Some(format_date(&self.signup_date)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Segment {
    Low,
    Medium,
    High,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Low, Segment::Medium, Segment::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Low => "Low",
            Segment::Medium => "Medium",
            Segment::High => "High",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One joined transaction with its derived metrics, fields in canonical output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedRecord {
    pub order_id: i64,
    pub user_id: i64,
    pub product: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub total_price: f64,
    pub timestamp: NaiveDateTime,
    pub location: String,
    pub customer_lifetime_value: f64,
    pub segment: Segment,
}
