use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use std::time::{Duration, Instant};
use tokenchart_domain::errors::{ExtractError, ProviderError};
use tokenchart_domain::repositories::coin_directory::CoinDirectory;
use tokenchart_domain::repositories::market_chart::MarketChartProvider;
use tokenchart_domain::value_objects::api_config::ApiConfig;
use tokenchart_domain::value_objects::coin_listing::CoinListing;
use tokenchart_domain::value_objects::token::Token;

/// Blocking CoinGecko client.
///
/// Holds one connection pool for its whole lifetime; the pool is released when
/// the client is dropped.
pub struct CoinGeckoClient {
    config: ApiConfig,
    client: Client,
}

impl CoinGeckoClient {
    pub fn new(api_key: &str, config: ApiConfig) -> Result<Self, ExtractError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ExtractError::configuration(
                "api key is required (set COINGECKO_API_KEY or pass --api-key)",
            ));
        }
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let key_header = HeaderName::from_bytes(config.api_key_header.trim().as_bytes())
            .map_err(|_| {
                ExtractError::configuration(format!(
                    "invalid header name: {}",
                    config.api_key_header
                ))
            })?;
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|_| ExtractError::configuration("api key is not a valid header value"))?;
        key_value.set_sensitive(true);
        headers.insert(key_header, key_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| {
                ExtractError::configuration(format!("failed to build http client: {err}"))
            })?;

        tracing::debug!(base_url = %config.base_url, "coingecko session opened");
        Ok(Self { config, client })
    }

    /// Sends the request and turns transport errors and non-success statuses into
    /// [`ProviderError`]s for `target`.
    fn send(
        &self,
        builder: RequestBuilder,
        target: &str,
        endpoint: &'static str,
    ) -> Result<Response, ExtractError> {
        metrics::counter!("tokenchart.infra.coingecko.requests_total", "endpoint" => endpoint)
            .increment(1);
        let start = Instant::now();

        let response = match builder.send() {
            Ok(response) => response,
            Err(err) => {
                metrics::counter!(
                    "tokenchart.infra.coingecko.errors_total",
                    "endpoint" => endpoint,
                    "kind" => "transport",
                    "status" => "none"
                )
                .increment(1);
                tracing::error!(target_name = target, error = %err, "coingecko request failed");
                return Err(ProviderError::transport(target, err).into());
            }
        };

        let status = response.status();
        metrics::histogram!(
            "tokenchart.infra.coingecko.request_ms",
            "endpoint" => endpoint,
            "status" => status.as_u16().to_string()
        )
        .record(start.elapsed().as_millis() as f64);

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            metrics::counter!(
                "tokenchart.infra.coingecko.errors_total",
                "endpoint" => endpoint,
                "kind" => "http_status",
                "status" => status.as_u16().to_string()
            )
            .increment(1);
            tracing::error!(
                target_name = target,
                status = status.as_u16(),
                body = %body,
                "coingecko returned an error status"
            );
            return Err(ProviderError::http_status(target, status.as_u16(), &body).into());
        }

        Ok(response)
    }
}

impl MarketChartProvider for CoinGeckoClient {
    fn ping(&self) -> Result<(), ExtractError> {
        let url = self.config.endpoint("ping");
        let span = tracing::info_span!("infra.coingecko.ping", endpoint = %url);
        let _enter = span.enter();

        self.send(self.client.get(&url), "ping", "ping")?;
        tracing::debug!("coingecko ping ok");
        Ok(())
    }

    fn fetch_market_chart(
        &self,
        token: &Token,
        config: &ApiConfig,
    ) -> Result<serde_json::Value, ExtractError> {
        let url = config.endpoint(&format!("coins/{}/market_chart", token.id()));
        let span = tracing::info_span!(
            "infra.coingecko.market_chart",
            coin = token.coin(),
            endpoint = %url,
            timeout_seconds = config.timeout_seconds
        );
        let _enter = span.enter();

        let builder = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", config.quote_currency.as_str()),
                ("days", &config.days.to_string()),
                ("interval", config.interval.as_str()),
            ])
            .timeout(config.timeout());
        let response = self.send(builder, token.coin(), "market_chart")?;

        let body = response.json::<serde_json::Value>().map_err(|err| {
            ExtractError::normalization(
                token.coin(),
                format!("response body is not valid JSON: {err}"),
            )
        })?;
        tracing::debug!(coin = token.coin(), "market chart received");
        Ok(body)
    }
}

impl CoinDirectory for CoinGeckoClient {
    fn list_coins(&self) -> Result<Vec<CoinListing>, ExtractError> {
        let url = self.config.endpoint("coins/list");
        let span = tracing::info_span!("infra.coingecko.coins_list", endpoint = %url);
        let _enter = span.enter();

        let builder = self
            .client
            .get(&url)
            .query(&[("include_platform", "true")]);
        let response = self.send(builder, "coins/list", "coins_list")?;
        response.json::<Vec<CoinListing>>().map_err(|err| {
            ExtractError::normalization("coins/list", format!("malformed coin list: {err}"))
        })
    }
}

impl Drop for CoinGeckoClient {
    fn drop(&mut self) {
        tracing::debug!(base_url = %self.config.base_url, "coingecko session closed");
    }
}
