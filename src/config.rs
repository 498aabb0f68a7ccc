//! Extractor configuration from the environment

use crate::error::ConfigError;
use crate::patterns::Gazetteer;
use crate::remote::{DEFAULT_AI_SERVICE_URL, DEFAULT_TIMEOUT};
use std::env;
use std::time::Duration;

/// Settings for a [`crate::JobExtractor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Remote AI endpoint; `None` skips the remote step
    pub ai_service_url: Option<String>,

    /// Bound on one remote call
    pub ai_service_timeout: Duration,

    /// Region codes recognized after a place name
    pub gazetteer: Gazetteer,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ai_service_url: Some(DEFAULT_AI_SERVICE_URL.to_string()),
            ai_service_timeout: DEFAULT_TIMEOUT,
            gazetteer: Gazetteer::default(),
        }
    }
}

impl ExtractorConfig {
    /// Configuration without a remote service
    #[must_use]
    pub fn local_only() -> Self {
        Self {
            ai_service_url: None,
            ..Self::default()
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    ///
    /// - `AI_SERVICE_URL`: remote endpoint, empty disables it
    /// - `AI_SERVICE_TIMEOUT_SECS`: remote timeout in seconds
    /// - `EXTRACT_REGION_CODES`: comma-separated region codes
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ai_service_url = match lookup("AI_SERVICE_URL") {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url.trim().to_string()),
            None => defaults.ai_service_url,
        };

        let ai_service_timeout = match lookup("AI_SERVICE_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.ai_service_timeout,
        };

        let gazetteer = lookup("EXTRACT_REGION_CODES")
            .map_or(defaults.gazetteer, |raw| Gazetteer::from_codes(raw.split(',')));

        Ok(Self {
            ai_service_url,
            ai_service_timeout,
            gazetteer,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidValue {
            key: "AI_SERVICE_TIMEOUT_SECS".into(),
            details: e.to_string(),
        })?;

    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "AI_SERVICE_TIMEOUT_SECS".into(),
            details: format!("must be a positive number of seconds, got {secs}"),
        })
}
