//! Scripted in-memory racing API
//!
//! Responses are registered up front; anything not registered fails with a
//! 404. Every call is recorded so tests can assert on the request sequence.

use async_trait::async_trait;
use racing_scraper::services::{FetchError, RacingApi};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Meetings { country: String, category: String },
    Race(String),
    Form(String),
    Runner { race_id: String, runner_id: String },
}

#[derive(Default)]
pub struct FakeApi {
    meetings: HashMap<(String, String), Result<Vec<Value>, u16>>,
    races: HashMap<String, Result<Value, u16>>,
    forms: HashMap<String, Value>,
    runners: HashMap<(String, String), Value>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meetings(mut self, country: &str, category: &str, meetings: Vec<Value>) -> Self {
        self.meetings
            .insert((country.to_string(), category.to_string()), Ok(meetings));
        self
    }

    pub fn with_failing_meetings(mut self, country: &str, category: &str, status: u16) -> Self {
        self.meetings
            .insert((country.to_string(), category.to_string()), Err(status));
        self
    }

    pub fn with_race(mut self, race_id: &str, detail: Value) -> Self {
        self.races.insert(race_id.to_string(), Ok(detail));
        self
    }

    pub fn with_failing_race(mut self, race_id: &str, status: u16) -> Self {
        self.races.insert(race_id.to_string(), Err(status));
        self
    }

    pub fn with_form(mut self, race_id: &str, form: Value) -> Self {
        self.forms.insert(race_id.to_string(), form);
        self
    }

    pub fn with_runner(mut self, race_id: &str, runner_id: &str, detail: Value) -> Self {
        self.runners
            .insert((race_id.to_string(), runner_id.to_string()), detail);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn form_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Form(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn runner_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Runner { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn not_found(what: &str) -> FetchError {
    FetchError::Status(404, format!("{what} not found"))
}

#[async_trait]
impl RacingApi for FakeApi {
    async fn meetings(
        &self,
        _date: &str,
        country: &str,
        category: &str,
    ) -> Result<Vec<Value>, FetchError> {
        self.record(Call::Meetings {
            country: country.to_string(),
            category: category.to_string(),
        });
        match self.meetings.get(&(country.to_string(), category.to_string())) {
            Some(Ok(meetings)) => Ok(meetings.clone()),
            Some(Err(status)) => Err(FetchError::Status(*status, "meetings failed".to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn race(&self, race_id: &str) -> Result<Value, FetchError> {
        self.record(Call::Race(race_id.to_string()));
        match self.races.get(race_id) {
            Some(Ok(detail)) => Ok(detail.clone()),
            Some(Err(status)) => Err(FetchError::Status(*status, "race failed".to_string())),
            None => Err(not_found(race_id)),
        }
    }

    async fn race_form(&self, race_id: &str) -> Result<Value, FetchError> {
        self.record(Call::Form(race_id.to_string()));
        self.forms.get(race_id).cloned().ok_or_else(|| not_found(race_id))
    }

    async fn runner(&self, race_id: &str, runner_id: &str) -> Result<Value, FetchError> {
        self.record(Call::Runner {
            race_id: race_id.to_string(),
            runner_id: runner_id.to_string(),
        });
        self.runners
            .get(&(race_id.to_string(), runner_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found(runner_id))
    }
}
