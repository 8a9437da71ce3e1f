use chrono::NaiveDate;
use eyre::{Result, WrapErr, eyre};
use signage_core::models::{block::ScreenId, schedule::ScheduleScope};
use std::{env, time::Duration};
use uuid::Uuid;

/// Connection and scope settings for talking to the signage API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server, without a trailing slash (required)
    pub api_url: String,
    /// Per-request timeout (defaults to 30 seconds)
    pub request_timeout: Duration,
    /// Screens to load when syncing
    pub screens: Vec<ScreenId>,
    /// Reference date of the displayed week (defaults to today)
    pub date: Option<NaiveDate>,
    pub organization_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
            screens: Vec::new(),
            date: None,
            organization_id: None,
            branch_id: None,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("SIGNAGE_API_URL")
            .map_err(|_| eyre!("SIGNAGE_API_URL environment variable not set"))?;
        let mut config = Self::new(api_url);

        if let Ok(timeout) = env::var("SIGNAGE_REQUEST_TIMEOUT_SECONDS") {
            let seconds: u64 = timeout
                .parse()
                .wrap_err("SIGNAGE_REQUEST_TIMEOUT_SECONDS must be a number of seconds")?;
            config.request_timeout = Duration::from_secs(seconds);
        }

        config.screens = env::var("SIGNAGE_SCREENS")
            .map(|screens| parse_screens(&screens))
            .unwrap_or_default();

        config.date = env::var("SIGNAGE_DATE")
            .ok()
            .map(|date| date.parse())
            .transpose()
            .wrap_err("SIGNAGE_DATE must be formatted as YYYY-MM-DD")?;

        config.organization_id = optional_uuid("SIGNAGE_ORGANIZATION_ID")?;
        config.branch_id = optional_uuid("SIGNAGE_BRANCH_ID")?;

        Ok(config)
    }

    /// The scope described by the configured screens and ids.
    pub fn scope(&self) -> ScheduleScope {
        ScheduleScope {
            organization_id: self.organization_id,
            branch_id: self.branch_id,
            screen_ids: self.screens.clone(),
        }
    }
}

/// Splits a comma-separated screen list, dropping blanks.
pub fn parse_screens(value: &str) -> Vec<ScreenId> {
    value
        .split(',')
        .map(str::trim)
        .filter(|screen| !screen.is_empty())
        .map(ScreenId::from)
        .collect()
}

fn optional_uuid(key: &str) -> Result<Option<Uuid>> {
    env::var(key)
        .ok()
        .map(|value| Uuid::parse_str(value.trim()))
        .transpose()
        .wrap_err_with(|| format!("{key} must be a UUID"))
}
