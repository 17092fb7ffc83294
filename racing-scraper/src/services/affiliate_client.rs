//! Ladbrokes affiliate racing API client
//!
//! Every request carries the `From` / `X-Partner` identification headers and
//! `enc=json`. A single rate limiter spaces all outbound requests, so the
//! minimum gap holds across meetings, races, form, and runner lookups alike.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

/// Production API root
pub const AFFILIATE_BASE_URL: &str = "https://api-affiliates.ladbrokes.com.au/affiliates/v1/racing";

/// Default minimum spacing between requests
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size for meeting listings
const MEETINGS_LIMIT: u32 = 200;

/// Fetch failures, one variant per failure class
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),
}

/// Remote racing data source
///
/// The walker and merger only talk to this trait, which keeps them testable
/// without a network.
#[async_trait]
pub trait RacingApi: Send + Sync {
    /// Meetings for one country and category on `date` (YYYY-MM-DD)
    async fn meetings(
        &self,
        date: &str,
        country: &str,
        category: &str,
    ) -> Result<Vec<Value>, FetchError>;

    /// Full race detail body
    async fn race(&self, race_id: &str) -> Result<Value, FetchError>;

    /// Race-scoped form body
    async fn race_form(&self, race_id: &str) -> Result<Value, FetchError>;

    /// Single runner detail body
    async fn runner(&self, race_id: &str, runner_id: &str) -> Result<Value, FetchError>;
}

/// Rate limiter enforcing a minimum interval between requests
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    /// Wait if necessary to comply with rate limit
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Connection settings for [`AffiliateClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// Sent as the `From` header
    pub email: String,
    /// Sent as the `X-Partner` header
    pub partner: String,
    pub request_delay: Duration,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(email: impl Into<String>, partner: impl Into<String>) -> Self {
        Self {
            base_url: AFFILIATE_BASE_URL.to_string(),
            email: email.into(),
            partner: partner.into(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP implementation of [`RacingApi`]
pub struct AffiliateClient {
    http_client: reqwest::Client,
    settings: ClientSettings,
    rate_limiter: Arc<RateLimiter>,
}

impl AffiliateClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("racing-scraper/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(settings.request_delay)),
            settings,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    /// Issue one rate-limited GET and parse the JSON body
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
        self.rate_limiter.wait().await;

        let url = self.url(path);
        tracing::debug!(url = %url, "Querying affiliate API");

        let response = self
            .http_client
            .get(&url)
            .header("From", self.settings.email.as_str())
            .header("X-Partner", self.settings.partner.as_str())
            .query(&[("enc", "json")])
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RacingApi for AffiliateClient {
    async fn meetings(
        &self,
        date: &str,
        country: &str,
        category: &str,
    ) -> Result<Vec<Value>, FetchError> {
        let params = [
            ("date_from", date.to_string()),
            ("date_to", date.to_string()),
            ("category", category.to_string()),
            ("country", country.to_string()),
            ("limit", MEETINGS_LIMIT.to_string()),
        ];
        let body = self.get_json("meetings", &params).await?;
        extract_meetings(body)
    }

    async fn race(&self, race_id: &str) -> Result<Value, FetchError> {
        self.get_json(&format!("events/{race_id}"), &[]).await
    }

    async fn race_form(&self, race_id: &str) -> Result<Value, FetchError> {
        self.get_json(&format!("events/{race_id}/form"), &[]).await
    }

    async fn runner(&self, race_id: &str, runner_id: &str) -> Result<Value, FetchError> {
        self.get_json(&format!("events/{race_id}/entrants/{runner_id}"), &[])
            .await
    }
}

/// Pull `data.meetings` out of a meetings-list body
pub fn extract_meetings(body: Value) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Object(mut root) => match root.remove("data") {
            Some(Value::Object(mut data)) => match data.remove("meetings") {
                Some(Value::Array(meetings)) => Ok(meetings),
                Some(Value::Null) | None => {
                    Err(FetchError::MissingField("data.meetings".to_string()))
                }
                Some(_) => Err(FetchError::Parse("data.meetings is not an array".to_string())),
            },
            _ => Err(FetchError::MissingField("data".to_string())),
        },
        _ => Err(FetchError::Parse("response body is not an object".to_string())),
    }
}
