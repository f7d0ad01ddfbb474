use crate::errors::ExtractError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_API_KEY_HEADER: &str = "x-cg-api-key";
pub const DEFAULT_QUOTE_CURRENCY: &str = "usd";
pub const DEFAULT_DAYS: u32 = 100;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Sampling interval requested from the market-chart endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
    Hourly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Hourly => "hourly",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key_header: String,
    pub quote_currency: String,
    pub days: u32,
    pub interval: Interval,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            quote_currency: DEFAULT_QUOTE_CURRENCY.to_string(),
            days: DEFAULT_DAYS,
            interval: Interval::Daily,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.base_url.trim().is_empty() {
            return Err(ExtractError::configuration("api.base_url must not be empty"));
        }
        if self.api_key_header.trim().is_empty() {
            return Err(ExtractError::configuration(
                "api.api_key_header must not be empty",
            ));
        }
        if self.quote_currency.trim().is_empty() {
            return Err(ExtractError::configuration(
                "api.quote_currency must not be empty",
            ));
        }
        if self.days == 0 {
            return Err(ExtractError::configuration("api.days must be > 0"));
        }
        if self.timeout_seconds == 0 {
            return Err(ExtractError::configuration("api.timeout_seconds must be > 0"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, Interval};

    #[test]
    fn defaults_match_public_api() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.quote_currency, "usd");
        assert_eq!(config.days, 100);
        assert_eq!(config.interval, Interval::Daily);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_days_and_timeout() {
        let config = ApiConfig {
            days: 0,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            timeout_seconds: 0,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9000/api/v3/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(config.endpoint("/ping"), "http://127.0.0.1:9000/api/v3/ping");
    }
}
