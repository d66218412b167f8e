use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::IngestError;
use crate::model::{RawProfile, PROFILES_SOURCE, PROFILE_COLUMNS};

/// Reads the structured profile registry at `path`.
pub fn read_profiles_json(path: &Path) -> Result<Vec<RawProfile>, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::SourceUnavailable {
        source_name: PROFILES_SOURCE,
        path: path.to_path_buf(),
        source,
    })?;
    parse_profiles_json(&content)
}

/// Parses profile JSON in either of two layouts:
///
/// * records: `[{"user_id": 1, "name": "A", ...}, ...]`
/// * columns: `{"user_id": {"0": 1, "1": 2}, "name": {"0": "A", "1": "B"}, ...}`
///
/// Absent keys and `null` become missing cells. Scalars are rendered to text; nested arrays or
/// objects in a cell make the whole source malformed.
pub fn parse_profiles_json(content: &str) -> Result<Vec<RawProfile>, IngestError> {
    let document: Value = serde_json::from_str(content).map_err(|source| IngestError::Json {
        source_name: PROFILES_SOURCE,
        source,
    })?;

    match document {
        Value::Array(entries) => entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| match entry {
                Value::Object(fields) => profile_from_record(fields),
                other => Err(IngestError::malformed(
                    PROFILES_SOURCE,
                    format!("record {idx} is {} rather than an object", kind(other)),
                )),
            })
            .collect(),
        Value::Object(columns) => profiles_from_columns(&columns),
        other => Err(IngestError::malformed(
            PROFILES_SOURCE,
            format!("expected an array or object at top level, found {}", kind(&other)),
        )),
    }
}

fn profile_from_record(fields: &Map<String, Value>) -> Result<RawProfile, IngestError> {
    let get = |column: &str| fields.get(column).map(scalar_text).transpose().map(Option::flatten);

    Ok(RawProfile {
        user_id: get("user_id")?,
        name: get("name")?,
        email: get("email")?,
        location: get("location")?,
        signup_date: get("signup_date")?,
    })
}

fn profiles_from_columns(columns: &Map<String, Value>) -> Result<Vec<RawProfile>, IngestError> {
    if !PROFILE_COLUMNS.iter().any(|column| columns.contains_key(*column)) {
        return Err(IngestError::malformed(
            PROFILES_SOURCE,
            "column layout does not contain any profile column",
        ));
    }

    // Row labels are collected across every column so that a label missing from one column
    // still yields a row with that cell missing.
    let mut rows: BTreeMap<RowLabel, RawProfile> = BTreeMap::new();

    for (column, values) in columns {
        let Value::Object(values) = values else {
            return Err(IngestError::malformed(
                PROFILES_SOURCE,
                format!("column {column} is {} rather than an object", kind(values)),
            ));
        };

        for (label, value) in values {
            let text = scalar_text(value)?;
            let row = rows.entry(RowLabel::parse(label)).or_default();
            match column.as_str() {
                "user_id" => row.user_id = text,
                "name" => row.name = text,
                "email" => row.email = text,
                "location" => row.location = text,
                "signup_date" => row.signup_date = text,
                _ => {}
            }
        }
    }

    Ok(rows.into_values().collect())
}

/// Row label of the column layout. Numeric labels sort numerically ahead of any textual ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RowLabel {
    Index(u64),
    Name(String),
}

impl RowLabel {
    fn parse(label: &str) -> Self {
        label
            .parse::<u64>()
            .map(RowLabel::Index)
            .unwrap_or_else(|_| RowLabel::Name(label.to_string()))
    }
}

fn scalar_text(value: &Value) -> Result<Option<String>, IngestError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Array(_) | Value::Object(_) => Err(IngestError::malformed(
            PROFILES_SOURCE,
            format!("nested {} found where a scalar was expected", kind(value)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
