//! Completeness heuristic for race detail records
//!
//! International races often come back from the primary endpoint without form
//! data. The heuristic samples the first few runners and treats one bare
//! runner as evidence for the whole race.

use racing_common::catalog::{is_international, SIGNIFICANT_FORM_FIELDS};
use serde_json::Value;

use crate::models::{is_present, race_country, runners};

/// Number of leading runners inspected
pub const SAMPLE_SIZE: usize = 3;

/// Decide whether a race record should get supplemental fetches.
///
/// **Algorithm:**
/// 1. No record or no runner list: nothing to enhance
/// 2. International if the race's own country or `requested_country` is in the
///    international set
/// 3. Domestic records are trusted as complete
/// 4. Sample the first [`SAMPLE_SIZE`] runners; any runner with none of the
///    significant form fields makes the race incomplete
pub fn needs_enhancement(record: Option<&Value>, requested_country: &str) -> bool {
    let Some(record) = record else {
        return false;
    };
    let Some(runner_list) = runners(record) else {
        return false;
    };

    let international = race_country(record).is_some_and(|c| is_international(&c))
        || is_international(requested_country);
    if !international {
        return false;
    }

    runner_list
        .iter()
        .take(SAMPLE_SIZE)
        .any(|runner| !has_any_form(runner))
}

/// True when the runner carries at least one significant form field
pub fn has_any_form(runner: &Value) -> bool {
    SIGNIFICANT_FORM_FIELDS
        .iter()
        .any(|field| is_present(runner.get(*field)))
}
