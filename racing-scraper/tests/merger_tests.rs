//! Supplemental merger tests against the scripted API
//!
//! The merge must be monotonic: fields only ever go from absent to present,
//! whichever endpoint supplies them and whether or not lookups fail.

mod helpers;

use helpers::{formed_runner, race_detail, runner, FakeApi};
use racing_common::catalog::MERGEABLE_FORM_FIELDS;
use racing_scraper::services::SupplementMerger;
use serde_json::json;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_form_then_runner_merge() {
    let api = FakeApi::new()
        .with_form(
            "r1",
            json!({"data": {"runners": [
                {"entrant_id": "a", "form_comment": "From form", "class_level": "BM70"}
            ]}}),
        )
        .with_runner("r1", "a", json!({"data": {"entrant": {
            "form_comment": "From runner",
            "gear": "Hood",
            "odds": 4.5
        }}}))
        .with_runner("r1", "b", json!({"data": {"jockey_stats": {"wins": 12}}}));
    let mut record = race_detail("r1", "GBR", vec![runner("a", "Alpha"), runner("b", "Bravo")]);

    let report = SupplementMerger::new(&api, Duration::ZERO)
        .enhance("r1", &mut record)
        .await;

    let runners = record["data"]["runners"].as_array().unwrap();
    assert_eq!(runners[0]["form_comment"], "From form");
    assert_eq!(runners[0]["class_level"], "BM70");
    assert_eq!(runners[0]["gear"], "Hood");
    // Per-runner merge is limited to the form field list
    assert!(runners[0].get("odds").is_none());
    assert_eq!(runners[1]["jockey_stats"]["wins"], 12);

    assert!(report.form_fetched);
    assert_eq!(report.form_fields_filled, 2);
    assert_eq!(report.runners_fetched, 2);
    assert_eq!(report.runner_fields_filled, 2);
    assert_eq!(report.total_filled(), 4);
}

#[tokio::test]
async fn test_failures_are_absorbed() {
    let api = FakeApi::new();
    let mut record = race_detail("r9", "USA", vec![runner("a", "Alpha"), runner("b", "Bravo")]);
    let before = record.clone();

    let report = SupplementMerger::new(&api, Duration::ZERO)
        .enhance("r9", &mut record)
        .await;

    assert_eq!(record, before);
    assert!(!report.form_fetched);
    assert_eq!(report.runner_failures, 2);
    assert_eq!(api.runner_calls(), 2);
}

#[tokio::test]
async fn test_complete_record_is_unchanged() {
    let mut complete_runner = formed_runner("a", "Alpha");
    for field in MERGEABLE_FORM_FIELDS {
        if complete_runner.get(*field).is_none() {
            complete_runner[*field] = json!(format!("base {field}"));
        }
    }
    let mut supplemental = json!({"entrant_id": "a"});
    for field in MERGEABLE_FORM_FIELDS {
        supplemental[*field] = json!(format!("other {field}"));
    }

    let api = FakeApi::new()
        .with_form("r1", json!({"data": {"runners": [supplemental.clone()]}}))
        .with_runner("r1", "a", json!({"data": {"entrant": supplemental}}));
    let mut record = race_detail("r1", "IRL", vec![complete_runner]);
    let before = record.clone();

    let report = SupplementMerger::new(&api, Duration::ZERO)
        .enhance("r1", &mut record)
        .await;

    assert_eq!(record, before);
    assert_eq!(report.total_filled(), 0);
}

#[tokio::test]
async fn test_runner_pause_between_lookups_only() {
    let api = FakeApi::new();
    let mut record = race_detail(
        "r1",
        "GBR",
        vec![runner("a", "A"), runner("b", "B"), runner("c", "C")],
    );

    let start = Instant::now();
    SupplementMerger::new(&api, Duration::from_millis(100))
        .enhance("r1", &mut record)
        .await;
    let elapsed = start.elapsed();

    // Two gaps for three runners, none after the last
    assert!(elapsed >= Duration::from_millis(190), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(290), "{elapsed:?}");
}

#[tokio::test]
async fn test_runners_without_ids_not_fetched() {
    let api = FakeApi::new();
    let mut record = race_detail("r1", "GBR", vec![json!({"name": "Ghost"}), runner("a", "A")]);

    let report = SupplementMerger::new(&api, Duration::ZERO)
        .enhance("r1", &mut record)
        .await;

    assert_eq!(api.runner_calls(), 1);
    assert_eq!(report.runner_failures, 1);
}
