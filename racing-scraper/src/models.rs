//! Views over raw API records
//!
//! The scraper keeps every record as `serde_json::Value` so the files on disk
//! hold exactly what the API sent (plus merged form fields). These helpers pull
//! out the handful of fields the walker, heuristic, and merger need.

use serde_json::{Map, Value};

/// Meeting summary extracted from a meetings-list entry
#[derive(Debug, Clone)]
pub struct Meeting {
    /// Meeting identifier (`meeting` key)
    pub id: String,
    /// Venue display name
    pub name: String,
    /// Category display name (e.g. "Thoroughbred Racing")
    pub category_name: String,
    /// Country code as recorded by the API
    pub country: String,
    /// State or region
    pub state: String,
    /// Race stubs in API order
    pub races: Vec<RaceStub>,
    /// Full record as returned by the API
    pub raw: Value,
}

/// Race entry within a meeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceStub {
    /// Race identifier; races without one are skipped
    pub id: Option<String>,
    /// Race number within the meeting
    pub race_number: u32,
    /// Race display name
    pub name: String,
}

impl Meeting {
    /// Build a meeting view; missing fields fall back to placeholders
    pub fn from_value(raw: Value) -> Self {
        let races = raw
            .get("races")
            .and_then(Value::as_array)
            .map(|races| races.iter().map(RaceStub::from_value).collect())
            .unwrap_or_default();

        Self {
            id: id_string(raw.get("meeting")).unwrap_or_default(),
            name: text(&raw, "name").unwrap_or_else(|| "Unknown".to_string()),
            category_name: text(&raw, "category_name").unwrap_or_else(|| "Unknown".to_string()),
            country: text(&raw, "country").unwrap_or_default(),
            state: text(&raw, "state").unwrap_or_default(),
            races,
            raw,
        }
    }
}

impl RaceStub {
    pub fn from_value(raw: &Value) -> Self {
        let race_number = raw
            .get("race_number")
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);

        Self {
            id: id_string(raw.get("id")),
            race_number,
            name: text(raw, "name").unwrap_or_else(|| "Unknown Race".to_string()),
        }
    }
}

/// Normalize an identifier that may arrive as a string or a number.
///
/// Empty strings and other JSON types count as no identifier.
pub fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Whether a field carries usable data.
///
/// Missing, `null`, blank strings, empty arrays and empty objects are absent.
/// `false` and `0` are real values.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}

/// The object holding race content: `data` when the body is wrapped, else the body
fn payload(record: &Value) -> &Value {
    match record.get("data") {
        Some(data @ Value::Object(_)) => data,
        _ => record,
    }
}

fn payload_mut(record: &mut Value) -> &mut Value {
    if matches!(record.get("data"), Some(Value::Object(_))) {
        &mut record["data"]
    } else {
        record
    }
}

const RUNNER_LIST_KEYS: &[&str] = &["runners", "entrants"];

/// Runner list of a race or form record, if it has one
pub fn runners(record: &Value) -> Option<&Vec<Value>> {
    let payload = payload(record);
    RUNNER_LIST_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array))
}

/// Mutable runner list of a race record, if it has one
pub fn runners_mut(record: &mut Value) -> Option<&mut Vec<Value>> {
    let payload = payload_mut(record);
    let key = RUNNER_LIST_KEYS
        .iter()
        .find(|key| payload.get(**key).is_some_and(Value::is_array))?;
    payload.get_mut(*key).and_then(Value::as_array_mut)
}

/// Runner identifier: `entrant_id`, falling back to `id`
pub fn runner_id(runner: &Value) -> Option<String> {
    id_string(runner.get("entrant_id")).or_else(|| id_string(runner.get("id")))
}

/// Country recorded on the race itself
///
/// Looks at `race.country`, then `meeting.country`, then a top-level `country`.
pub fn race_country(record: &Value) -> Option<String> {
    let payload = payload(record);
    [
        payload.get("race").and_then(|r| r.get("country")),
        payload.get("meeting").and_then(|m| m.get("country")),
        payload.get("country"),
    ]
    .into_iter()
    .flatten()
    .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()))
    .map(str::to_string)
}

/// Runner object from a per-runner response: `entrant`, `runner`, or the payload itself
pub fn runner_payload(response: &Value) -> Option<&Map<String, Value>> {
    let payload = payload(response);
    payload
        .get("entrant")
        .and_then(Value::as_object)
        .or_else(|| payload.get("runner").and_then(Value::as_object))
        .or_else(|| payload.as_object())
}
