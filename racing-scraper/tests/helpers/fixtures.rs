//! JSON fixtures shaped like affiliate API responses

use serde_json::{json, Value};

/// Meetings-list entry with races `(id, number, name)`
pub fn meeting(
    id: &str,
    name: &str,
    category: &str,
    country: &str,
    state: &str,
    races: &[(&str, u32, &str)],
) -> Value {
    let races: Vec<Value> = races
        .iter()
        .map(|(race_id, number, race_name)| {
            json!({"id": race_id, "race_number": number, "name": race_name})
        })
        .collect();
    json!({
        "meeting": id,
        "name": name,
        "category_name": category,
        "country": country,
        "state": state,
        "races": races,
    })
}

/// Runner with no form fields
pub fn runner(id: &str, name: &str) -> Value {
    json!({"entrant_id": id, "name": name, "barrier": 1})
}

/// Runner with the four significant form fields populated
pub fn formed_runner(id: &str, name: &str) -> Value {
    json!({
        "entrant_id": id,
        "name": name,
        "form_comment": format!("{name} ran on well"),
        "last_twenty_starts": "1x2315",
        "past_performances": [{"position": 1}],
        "form_indicators": ["CD"],
    })
}

/// Race detail body wrapping `runners`
pub fn race_detail(race_id: &str, country: &str, runners: Vec<Value>) -> Value {
    json!({
        "data": {
            "race": {"event_id": race_id, "country": country},
            "runners": runners,
        }
    })
}
