mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{clock, fixed_now, parser_fixture, raw_profile, RecordingObserver};
use ledgerlens_core::sanitize::{normalize_location, sanitize_profiles, DEFAULT_NAME};
use ledgerlens_core::{Dataset, PipelineError, SilentObserver, Stage};
use ledgerlens_parser::read_profiles_json;

#[test]
fn sanitizes_fixture_registry() -> Result<()> {
    let raw = read_profiles_json(&parser_fixture("profiles_mock.json"))?;
    let cleaned = sanitize_profiles(&raw, &clock(), &SilentObserver)?;

    let user_ids: Vec<i64> = cleaned.records.iter().map(|p| p.user_id).collect();
    assert_eq!(user_ids, vec![1, 2, 3, 4, 6]);

    let locations: Vec<&str> = cleaned
        .records
        .iter()
        .map(|p| p.location.as_str())
        .collect();
    assert_eq!(
        locations,
        vec!["New York", "San Francisco", "Unknown", "Austin", "Boston"]
    );

    assert_eq!(cleaned.records[1].name, DEFAULT_NAME);
    assert_eq!(cleaned.records[2].signup_date, fixed_now().date());
    assert_eq!(cleaned.records[3].email, "");
    assert_eq!(
        cleaned.records[0].signup_date,
        NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
    );

    let report = &cleaned.report;
    assert_eq!(report.input_rows, 7);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.missing_keys_dropped, 1);
    assert_eq!(report.defaults_filled, 2);
    assert_eq!(report.dates_imputed, 1);
    assert_eq!(report.output_rows, 5);
    Ok(())
}

#[test]
fn blank_and_missing_names_get_default() -> Result<()> {
    let raw = vec![
        raw_profile(Some("1"), Some(" \t"), Some("a@x.com"), Some("Rome"), None),
        raw_profile(Some("2"), None, Some("b@x.com"), None, Some("2023-02-02")),
        raw_profile(Some("3"), Some("Zoe"), None, Some("   "), Some("2023-02-03")),
    ];
    let cleaned = sanitize_profiles(&raw, &clock(), &SilentObserver)?;

    let names: Vec<&str> = cleaned.records.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["John Doe", "John Doe", "Zoe"]);

    let locations: Vec<&str> = cleaned
        .records
        .iter()
        .map(|p| p.location.as_str())
        .collect();
    assert_eq!(locations, vec!["Rome", "Unknown", "Unknown"]);
    assert_eq!(cleaned.records[0].signup_date, fixed_now().date());
    Ok(())
}

#[test]
fn location_keeps_text_before_first_comma() {
    assert_eq!(normalize_location("NYC, NY"), "Nyc");
    assert_eq!(normalize_location("los angeles, CA, USA"), "Los Angeles");
    assert_eq!(normalize_location("berlin"), "Berlin");
    assert_eq!(normalize_location(", somewhere"), "Unknown");
}

#[test]
fn non_integral_user_ids_are_dropped() -> Result<()> {
    let observer = RecordingObserver::default();
    let raw = vec![
        raw_profile(Some("abc"), Some("A"), None, Some("X"), None),
        raw_profile(Some("5.0"), Some("B"), None, Some("Y"), None),
    ];
    let cleaned = sanitize_profiles(&raw, &clock(), &observer)?;

    assert_eq!(cleaned.records.len(), 1);
    assert_eq!(cleaned.records[0].user_id, 5);

    let dropped = observer.dropped.borrow();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].0, Stage::SanitizeProfiles);
    assert_eq!(dropped[0].1.value.as_deref(), Some("abc"));
    Ok(())
}

#[test]
fn profiles_without_ids_exhaust_the_dataset() {
    let raw = vec![
        raw_profile(None, Some("A"), None, None, None),
        raw_profile(None, Some("B"), None, None, None),
    ];
    let err = sanitize_profiles(&raw, &clock(), &SilentObserver).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::DataExhausted {
            dataset: Dataset::Profiles
        }
    ));
    assert_eq!(err.to_string(), "no rows left after cleaning profiles");
}

#[test]
fn duplicate_profiles_compare_user_ids_by_value() -> Result<()> {
    let raw = vec![
        raw_profile(Some("1"), Some("A"), None, Some("Oslo"), Some("2023-01-01")),
        raw_profile(Some("1.0"), Some("A"), None, Some("Oslo"), Some("2023-01-01")),
    ];
    let cleaned = sanitize_profiles(&raw, &clock(), &SilentObserver)?;

    assert_eq!(cleaned.records.len(), 1);
    assert_eq!(cleaned.report.duplicates_removed, 1);
    Ok(())
}

#[test]
fn sanitizing_profiles_twice_is_idempotent() -> Result<()> {
    let raw = read_profiles_json(&parser_fixture("profiles_mock.json"))?;
    let first = sanitize_profiles(&raw, &clock(), &SilentObserver)?;

    let again: Vec<_> = first.records.iter().map(|p| p.to_raw()).collect();
    let second = sanitize_profiles(&again, &clock(), &SilentObserver)?;

    assert_eq!(first.records, second.records);
    assert_eq!(second.report.defaults_filled, 0);
    assert_eq!(second.report.dates_imputed, 0);
    Ok(())
}
