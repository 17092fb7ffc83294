//! Supplemental form merging for incomplete race records
//!
//! Two best-effort strategies run in order against the same base record:
//! the race-scoped form endpoint, then one lookup per runner. Both only fill
//! fields the base runner lacks, so the record moves monotonically from
//! absent to present and never loses or replaces data.
//!
//! **Merge Strategy:**
//! - Existing present values always win
//! - Supplemental values are copied only when present themselves
//! - Failures are logged and skipped; the base record is returned as-is

use racing_common::catalog::MERGEABLE_FORM_FIELDS;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{is_present, runner_id, runner_payload, runners, runners_mut};
use crate::services::affiliate_client::RacingApi;

/// Default pause between consecutive per-runner lookups
pub const DEFAULT_RUNNER_DELAY_MS: u64 = 200;

/// Outcome of one enhancement pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhancementReport {
    /// Form endpoint returned a usable runner list
    pub form_fetched: bool,
    /// Fields filled from the form endpoint
    pub form_fields_filled: usize,
    /// Runner lookups that succeeded
    pub runners_fetched: usize,
    /// Runner lookups that failed or returned nothing usable
    pub runner_failures: usize,
    /// Fields filled from runner lookups
    pub runner_fields_filled: usize,
}

impl EnhancementReport {
    pub fn total_filled(&self) -> usize {
        self.form_fields_filled + self.runner_fields_filled
    }
}

/// Copy `keys` from `supplemental` into `base` where `base` has nothing.
///
/// Returns how many fields were filled.
pub fn fill_missing<'k>(
    base: &mut Map<String, Value>,
    supplemental: &Map<String, Value>,
    keys: impl IntoIterator<Item = &'k str>,
) -> usize {
    keys.into_iter().fold(0, |filled, key| {
        match supplemental.get(key) {
            Some(value) if is_present(Some(value)) && !is_present(base.get(key)) => {
                base.insert(key.to_string(), value.clone());
                filled + 1
            }
            _ => filled,
        }
    })
}

/// Merge every field of each supplemental runner into the base runner with
/// the same identifier. Returns how many fields were filled.
pub fn merge_runner_lists(base_runners: &mut [Value], supplemental_runners: &[Value]) -> usize {
    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, runner) in base_runners.iter().enumerate() {
        if let Some(id) = runner_id(runner) {
            index.entry(id).or_default().push(i);
        }
    }

    let mut filled = 0;
    for supplemental in supplemental_runners {
        let Some(supplemental_obj) = supplemental.as_object() else {
            continue;
        };
        let Some(positions) = runner_id(supplemental).and_then(|id| index.get(&id)) else {
            continue;
        };
        for &i in positions {
            if let Some(base) = base_runners[i].as_object_mut() {
                filled += fill_missing(
                    base,
                    supplemental_obj,
                    supplemental_obj.keys().map(String::as_str),
                );
            }
        }
    }
    filled
}

/// Fills form gaps in race records from the secondary endpoints
pub struct SupplementMerger<'a, A: RacingApi + ?Sized> {
    api: &'a A,
    runner_pause: Duration,
}

impl<'a, A: RacingApi + ?Sized> SupplementMerger<'a, A> {
    pub fn new(api: &'a A, runner_pause: Duration) -> Self {
        Self { api, runner_pause }
    }

    /// Run both strategies against `record` in place
    pub async fn enhance(&self, race_id: &str, record: &mut Value) -> EnhancementReport {
        let mut report = EnhancementReport::default();

        self.merge_form(race_id, record, &mut report).await;
        self.merge_runners(race_id, record, &mut report).await;

        info!(
            race_id = %race_id,
            form_fields = report.form_fields_filled,
            runner_fields = report.runner_fields_filled,
            runner_failures = report.runner_failures,
            "Supplemental merge complete"
        );
        report
    }

    async fn merge_form(&self, race_id: &str, record: &mut Value, report: &mut EnhancementReport) {
        let form = match self.api.race_form(race_id).await {
            Ok(form) => form,
            Err(e) => {
                debug!(race_id = %race_id, error = %e, "Form fetch failed");
                return;
            }
        };

        let Some(form_runners) = runners(&form) else {
            debug!(race_id = %race_id, "Form response has no runner list");
            return;
        };
        let Some(base_runners) = runners_mut(record) else {
            return;
        };

        report.form_fetched = true;
        report.form_fields_filled = merge_runner_lists(base_runners, form_runners);
    }

    async fn merge_runners(&self, race_id: &str, record: &mut Value, report: &mut EnhancementReport) {
        // Ids first: the record is edited between awaits
        let targets: Vec<(usize, String)> = runners(record)
            .map(|list| {
                list.iter()
                    .enumerate()
                    .filter_map(|(i, runner)| runner_id(runner).map(|id| (i, id)))
                    .collect()
            })
            .unwrap_or_default();

        let total = targets.len();
        for (n, (i, id)) in targets.into_iter().enumerate() {
            match self.api.runner(race_id, &id).await {
                Ok(response) => match runner_payload(&response) {
                    Some(supplemental) => {
                        report.runners_fetched += 1;
                        if let Some(base) = runners_mut(record)
                            .and_then(|list| list.get_mut(i))
                            .and_then(Value::as_object_mut)
                        {
                            report.runner_fields_filled += fill_missing(
                                base,
                                supplemental,
                                MERGEABLE_FORM_FIELDS.iter().copied(),
                            );
                        }
                    }
                    None => {
                        report.runner_failures += 1;
                        debug!(race_id = %race_id, runner_id = %id, "Runner response has no runner object");
                    }
                },
                Err(e) => {
                    report.runner_failures += 1;
                    debug!(race_id = %race_id, runner_id = %id, error = %e, "Runner fetch failed");
                }
            }

            if n + 1 < total && !self.runner_pause.is_zero() {
                tokio::time::sleep(self.runner_pause).await;
            }
        }
    }
}
