//! Configuration resolution for racing-scraper
//!
//! **Priority:** CLI argument → environment variable → TOML → built-in default
//!
//! CLI and environment are both handled by clap (`env = ...`); this module
//! layers the TOML file and the defaults underneath.

use chrono::NaiveDate;
use clap::Parser;
use racing_common::config::TomlConfig;
use racing_common::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::services::affiliate_client::{
    ClientSettings, AFFILIATE_BASE_URL, DEFAULT_REQUEST_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};
use crate::services::supplement_merger::DEFAULT_RUNNER_DELAY_MS;

/// Default root of the output tree
pub const DEFAULT_BASE_DIR: &str = "racing_data";

/// Date format used for the API query and the date directory
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted request timeout range, in seconds
const TIMEOUT_RANGE_SECS: (u64, u64) = (20, 30);

/// Accepted spacing between requests, in milliseconds
const REQUEST_DELAY_RANGE_MS: (u64, u64) = (200, 500);

/// Command-line arguments for racing-scraper
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "racing-scraper")]
#[command(about = "Fetch racing meetings and race form into JSON files")]
#[command(version)]
pub struct Args {
    /// Contact email sent in the `From` header
    #[arg(long, env = "SCRAPER_EMAIL")]
    pub email: Option<String>,

    /// Partner name sent in the `X-Partner` header
    #[arg(long, env = "SCRAPER_PARTNER")]
    pub partner: Option<String>,

    /// Date to scrape (YYYY-MM-DD, default today)
    #[arg(short, long, env = "SCRAPE_DATE")]
    pub date: Option<String>,

    /// Countries: codes, catalog numbers, or ALL (comma separated)
    #[arg(long, env = "SCRAPE_COUNTRIES")]
    pub countries: Option<String>,

    /// Categories: T, H, G, catalog numbers, or ALL (comma separated)
    #[arg(long, env = "SCRAPE_CATEGORIES")]
    pub categories: Option<String>,

    /// Root of the output tree
    #[arg(short, long, env = "SCRAPER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Prompt for countries and categories
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the country and category catalog and exit
    #[arg(long)]
    pub list_countries: bool,
}

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub client: ClientSettings,
    pub date: String,
    pub base_dir: PathBuf,
    /// Raw country tokens, resolved later by the selection module
    pub countries: String,
    /// Raw category tokens, resolved later by the selection module
    pub categories: String,
    pub runner_delay: Duration,
    pub log_level: String,
}

impl ScraperConfig {
    /// Merge CLI/env arguments over the TOML file and defaults
    ///
    /// `today` supplies the date when none is configured.
    pub fn resolve(args: &Args, toml: &TomlConfig, today: NaiveDate) -> Result<Self> {
        let email = non_blank(args.email.as_deref())
            .or_else(|| non_blank(toml.email.as_deref()))
            .ok_or_else(|| missing_credential("email", "--email", "SCRAPER_EMAIL"))?;
        let partner = non_blank(args.partner.as_deref())
            .or_else(|| non_blank(toml.partner.as_deref()))
            .ok_or_else(|| missing_credential("partner", "--partner", "SCRAPER_PARTNER"))?;

        let date = match non_blank(args.date.as_deref()) {
            Some(raw) => parse_date(&raw)?,
            None => today,
        }
        .format(DATE_FORMAT)
        .to_string();

        let base_dir = args
            .output_dir
            .clone()
            .or_else(|| toml.base_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));

        let countries = non_blank(args.countries.as_deref())
            .or_else(|| non_blank(toml.countries.as_deref()))
            .unwrap_or_default();
        let categories = non_blank(args.categories.as_deref())
            .or_else(|| non_blank(toml.categories.as_deref()))
            .unwrap_or_default();

        let timeout_secs = toml
            .timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(TIMEOUT_RANGE_SECS.0, TIMEOUT_RANGE_SECS.1);

        let client = ClientSettings {
            base_url: non_blank(toml.api_base_url.as_deref())
                .unwrap_or_else(|| AFFILIATE_BASE_URL.to_string()),
            email,
            partner,
            request_delay: Duration::from_millis(
                toml.request_delay_ms
                    .unwrap_or(DEFAULT_REQUEST_DELAY_MS)
                    .clamp(REQUEST_DELAY_RANGE_MS.0, REQUEST_DELAY_RANGE_MS.1),
            ),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            client,
            date,
            base_dir,
            countries,
            categories,
            runner_delay: Duration::from_millis(
                toml.runner_delay_ms.unwrap_or(DEFAULT_RUNNER_DELAY_MS),
            ),
            log_level: toml.logging.level.clone(),
        })
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("Date '{}' is not YYYY-MM-DD: {}", raw, e)))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn missing_credential(name: &str, flag: &str, env: &str) -> Error {
    Error::Config(format!(
        "Affiliate {name} not configured. Please configure using one of:\n\
         1. Command line: {flag} <value>\n\
         2. Environment: {env}=<value>\n\
         3. TOML config: {name} = \"<value>\""
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 3).unwrap()
    }

    fn args(list: &[&str]) -> Args {
        let mut argv = vec!["racing-scraper"];
        argv.extend_from_slice(list);
        Args::try_parse_from(argv).unwrap()
    }

    fn credentials() -> Args {
        Args {
            email: Some("me@example.com".to_string()),
            partner: Some("Acme".to_string()),
            ..Args::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::resolve(&credentials(), &TomlConfig::default(), today()).unwrap();

        assert_eq!(config.date, "2025-10-03");
        assert_eq!(config.base_dir, PathBuf::from(DEFAULT_BASE_DIR));
        assert_eq!(config.client.base_url, AFFILIATE_BASE_URL);
        assert_eq!(config.client.request_delay, Duration::from_millis(DEFAULT_REQUEST_DELAY_MS));
        assert_eq!(config.client.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.runner_delay, Duration::from_millis(DEFAULT_RUNNER_DELAY_MS));
        assert!(config.countries.is_empty());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_cli_overrides_toml() {
        let toml = TomlConfig {
            email: Some("toml@example.com".to_string()),
            partner: Some("Toml Partner".to_string()),
            base_dir: Some(PathBuf::from("/from/toml")),
            countries: Some("GBR".to_string()),
            ..TomlConfig::default()
        };
        let args = Args {
            email: Some("cli@example.com".to_string()),
            output_dir: Some(PathBuf::from("/from/cli")),
            ..Args::default()
        };

        let config = ScraperConfig::resolve(&args, &toml, today()).unwrap();

        assert_eq!(config.client.email, "cli@example.com");
        assert_eq!(config.client.partner, "Toml Partner");
        assert_eq!(config.base_dir, PathBuf::from("/from/cli"));
        assert_eq!(config.countries, "GBR");
    }

    #[test]
    fn test_missing_credentials() {
        let err = ScraperConfig::resolve(&Args::default(), &TomlConfig::default(), today())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("SCRAPER_EMAIL"));

        let blank = Args {
            email: Some("me@example.com".to_string()),
            partner: Some("   ".to_string()),
            ..Args::default()
        };
        let err = ScraperConfig::resolve(&blank, &TomlConfig::default(), today()).unwrap_err();
        assert!(err.to_string().contains("SCRAPER_PARTNER"));
    }

    #[test]
    fn test_date_parsing() {
        let mut args = credentials();
        args.date = Some(" 2024-02-29 ".to_string());
        let config = ScraperConfig::resolve(&args, &TomlConfig::default(), today()).unwrap();
        assert_eq!(config.date, "2024-02-29");

        args.date = Some("03/10/2025".to_string());
        let err = ScraperConfig::resolve(&args, &TomlConfig::default(), today()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_timeout_clamped() {
        let mut toml = TomlConfig {
            timeout_secs: Some(300),
            ..TomlConfig::default()
        };
        let config = ScraperConfig::resolve(&credentials(), &toml, today()).unwrap();
        assert_eq!(config.client.timeout, Duration::from_secs(30));

        toml.timeout_secs = Some(1);
        let config = ScraperConfig::resolve(&credentials(), &toml, today()).unwrap();
        assert_eq!(config.client.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_request_delay_clamped() {
        let mut toml = TomlConfig {
            request_delay_ms: Some(0),
            ..TomlConfig::default()
        };
        let config = ScraperConfig::resolve(&credentials(), &toml, today()).unwrap();
        assert_eq!(config.client.request_delay, Duration::from_millis(200));

        toml.request_delay_ms = Some(5_000);
        let config = ScraperConfig::resolve(&credentials(), &toml, today()).unwrap();
        assert_eq!(config.client.request_delay, Duration::from_millis(500));

        toml.request_delay_ms = Some(350);
        let config = ScraperConfig::resolve(&credentials(), &toml, today()).unwrap();
        assert_eq!(config.client.request_delay, Duration::from_millis(350));
    }

    #[test]
    fn test_flags_parse() {
        let parsed = args(&["--interactive", "--countries", "ALL", "-o", "out"]);
        assert!(parsed.interactive);
        assert_eq!(parsed.countries.as_deref(), Some("ALL"));
        assert_eq!(parsed.output_dir, Some(PathBuf::from("out")));
    }
}
