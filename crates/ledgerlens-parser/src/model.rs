use serde::Serialize;

pub const TRANSACTIONS_SOURCE: &str = "transactions";
pub const PROFILES_SOURCE: &str = "profiles";

pub const TRANSACTION_COLUMNS: [&str; 7] = [
    "order_id",
    "user_id",
    "product",
    "category",
    "price",
    "quantity",
    "timestamp",
];

pub const PROFILE_COLUMNS: [&str; 5] = ["user_id", "name", "email", "location", "signup_date"];

/// Cell values read as missing (the usual dataframe NA vocabulary).
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na_token(value: &str) -> bool {
    NA_TOKENS.contains(&value)
}

/// Normalizes a raw text cell: NA tokens become `None`, everything else is kept verbatim.
pub fn cell(value: &str) -> Option<String> {
    if is_na_token(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// One ledger row exactly as it appeared in the source, before any repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RawTransaction {
    pub order_id: Option<String>,
    pub user_id: Option<String>,
    pub product: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub timestamp: Option<String>,
}

/// One registry entry exactly as it appeared in the source, before any repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RawProfile {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub signup_date: Option<String>,
}
