use crate::errors::ExtractError;
use crate::value_objects::api_config::ApiConfig;
use crate::value_objects::token::Token;

/// Source of raw market-chart payloads.
pub trait MarketChartProvider {
    /// Connectivity probe; must succeed before any fetch is attempted.
    fn ping(&self) -> Result<(), ExtractError>;

    /// Returns the provider's JSON body unmodified.
    fn fetch_market_chart(
        &self,
        token: &Token,
        config: &ApiConfig,
    ) -> Result<serde_json::Value, ExtractError>;
}
