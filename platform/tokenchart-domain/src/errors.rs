use std::error::Error;
use std::fmt;

type BoxedCause = Box<dyn Error + Send + Sync + 'static>;

/// Failure talking to the price-data provider.
///
/// `target` names what was being requested: `ping`, `coins/list`, or the coin
/// display name of a market-chart fetch.
#[derive(Debug)]
pub struct ProviderError {
    pub target: String,
    pub status: Option<u16>,
    pub message: String,
    cause: Option<BoxedCause>,
}

impl ProviderError {
    pub fn transport(target: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        let cause = cause.into();
        Self {
            target: target.into(),
            status: None,
            message: format!("request failed: {cause}"),
            cause: Some(cause),
        }
    }

    pub fn http_status(target: impl Into<String>, status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("http error: status {status}")
        } else {
            format!("http error: status {status}: {body}")
        };
        Self {
            target: target.into(),
            status: Some(status),
            message,
            cause: None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target, self.message)
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn Error + 'static))
    }
}

#[derive(Debug)]
pub enum ExtractError {
    /// Missing or empty required setting; raised before any network call.
    Configuration(String),
    Provider(ProviderError),
    Normalization { coin: String, reason: String },
    /// Every token in the run failed.
    NoData { failed_tokens: Vec<String> },
}

impl ExtractError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ExtractError::Configuration(message.into())
    }

    pub fn normalization(coin: &str, reason: impl Into<String>) -> Self {
        ExtractError::Normalization {
            coin: coin.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Configuration(_) => "configuration",
            ExtractError::Provider(_) => "provider",
            ExtractError::Normalization { .. } => "normalization",
            ExtractError::NoData { .. } => "no_data",
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            ExtractError::Provider(err) => write!(f, "provider error: {err}"),
            ExtractError::Normalization { coin, reason } => {
                write!(f, "normalization error for {coin}: {reason}")
            }
            ExtractError::NoData { failed_tokens } => write!(
                f,
                "no data could be fetched for any token (failed: {})",
                failed_tokens.join(", ")
            ),
        }
    }
}

impl Error for ExtractError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExtractError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for ExtractError {
    fn from(err: ProviderError) -> Self {
        ExtractError::Provider(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtractError, ProviderError};
    use std::error::Error;
    use std::io;

    #[test]
    fn provider_error_keeps_transport_cause() {
        let cause = io::Error::new(io::ErrorKind::TimedOut, "deadline elapsed");
        let err = ExtractError::from(ProviderError::transport("aave", cause));

        assert_eq!(err.kind(), "provider");
        assert!(err.to_string().contains("aave"));
        let provider = err.source().expect("provider source");
        let transport = provider.source().expect("transport source");
        assert!(transport.to_string().contains("deadline elapsed"));
    }

    #[test]
    fn http_status_message_includes_body_text() {
        let err = ProviderError::http_status("cronos", 429, "  rate limited \n");
        assert_eq!(err.status, Some(429));
        assert_eq!(err.to_string(), "cronos: http error: status 429: rate limited");
        assert!(err.source().is_none());
    }

    #[test]
    fn no_data_lists_every_failed_token() {
        let err = ExtractError::NoData {
            failed_tokens: vec!["aave".to_string(), "chainlink".to_string()],
        };
        assert!(err.to_string().ends_with("(failed: aave, chainlink)"));
    }
}
