use ledgerlens_parser::RawProfile;

use super::{dedupe, DedupeCell, SanitizeReport, Sanitized};
use crate::clock::Clock;
use crate::coerce::{parse_date, parse_integral};
use crate::error::{Dataset, PipelineError, Result, UnrecoverableField};
use crate::observer::{Stage, StageObserver};
use crate::records::Profile;
use crate::text::{is_blank, leading_segment, title_case};

pub const DEFAULT_NAME: &str = "John Doe";
pub const DEFAULT_LOCATION: &str = "Unknown";

const STAGE: Stage = Stage::SanitizeProfiles;

/// Repairs raw registry entries into [`Profile`]s.
pub fn sanitize_profiles(
    raw: &[RawProfile],
    clock: &dyn Clock,
    observer: &dyn StageObserver,
) -> Result<Sanitized<Profile>> {
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

    let today = clock.today();
    let mut records = Vec::with_capacity(unique.len());

    for (row, record) in unique {
        let Some(raw_user_id) = record.user_id.as_deref() else {
            report.missing_keys_dropped += 1;
            observer.row_dropped(
                STAGE,
                &UnrecoverableField {
                    row,
                    field: "user_id",
                    value: None,
                    reason: "is missing",
                },
            );
            continue;
        };

        let name = match record.name.as_deref() {
            Some(name) if !is_blank(Some(name)) => name.to_string(),
            _ => {
                report.defaults_filled += 1;
                DEFAULT_NAME.to_string()
            }
        };

        let location = match record.location.as_deref() {
            Some(location) if !is_blank(Some(location)) => location,
            _ => {
                report.defaults_filled += 1;
                DEFAULT_LOCATION
            }
        };

        let signup_date = match record.signup_date.as_deref().and_then(parse_date) {
            Some(date) => date,
            None => {
                report.dates_imputed += 1;
                today
            }
        };

        let Some(user_id) = parse_integral(raw_user_id) else {
            report.unrecoverable_dropped += 1;
            observer.row_dropped(
                STAGE,
                &UnrecoverableField {
                    row,
                    field: "user_id",
                    value: Some(raw_user_id.to_string()),
                    reason: "is not an integer",
                },
            );
            continue;
        };

        records.push(Profile {
            user_id,
            name,
            email: record.email.clone().unwrap_or_default(),
            location: normalize_location(location),
            signup_date,
        });
    }

    observer.step(
        STAGE,
        &format!(
            "removed {} rows with missing ids and {} with invalid ids; filled {} names/locations; imputed {} signup dates",
            report.missing_keys_dropped,
            report.unrecoverable_dropped,
            report.defaults_filled,
            report.dates_imputed
        ),
    );

    if records.is_empty() {
        let err = PipelineError::DataExhausted {
            dataset: Dataset::Profiles,
        };
        observer.failed(STAGE, &err.to_string());
        return Err(err);
    }

    report.output_rows = records.len();
    observer.step(STAGE, &format!("{} profiles cleaned", records.len()));

    Ok(Sanitized { records, report })
}

fn dedupe_key(record: &RawProfile) -> [DedupeCell<'_>; 5] {
    [
        DedupeCell::numeric(record.user_id.as_deref()),
        DedupeCell::text(record.name.as_deref()),
        DedupeCell::text(record.email.as_deref()),
        DedupeCell::text(record.location.as_deref()),
        DedupeCell::text(record.signup_date.as_deref()),
    ]
}

/// `"new york, NY"` becomes `"New York"`.
pub fn normalize_location(location: &str) -> String {
    let city = leading_segment(location);
    if city.is_empty() {
        DEFAULT_LOCATION.to_string()
    } else {
        title_case(city)
    }
}
