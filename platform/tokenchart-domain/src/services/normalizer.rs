use crate::errors::ExtractError;
use crate::value_objects::market_row::NormalizedRow;
use chrono::DateTime;
use serde::Deserialize;

/// `[timestamp_ms, value]` pair as returned by the market-chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeriesPoint(pub i64, pub f64);

#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<SeriesPoint>,
    pub market_caps: Vec<SeriesPoint>,
    pub total_volumes: Vec<SeriesPoint>,
}

impl MarketChart {
    pub fn from_json(raw: &serde_json::Value, coin: &str) -> Result<Self, ExtractError> {
        if !raw.is_object() {
            return Err(ExtractError::normalization(
                coin,
                "market chart response is not a JSON object",
            ));
        }
        MarketChart::deserialize(raw).map_err(|err| {
            ExtractError::normalization(coin, format!("malformed market chart: {err}"))
        })
    }
}

/// Flattens one coin's market chart into rows, zipping the three series by index.
///
/// Series are assumed to share timestamp order; only lengths are checked.
pub fn normalize(raw: &serde_json::Value, coin: &str) -> Result<Vec<NormalizedRow>, ExtractError> {
    let chart = MarketChart::from_json(raw, coin)?;
    normalize_chart(&chart, coin)
}

pub fn normalize_chart(chart: &MarketChart, coin: &str) -> Result<Vec<NormalizedRow>, ExtractError> {
    let expected = chart.prices.len();
    for (name, len) in [
        ("market_caps", chart.market_caps.len()),
        ("total_volumes", chart.total_volumes.len()),
    ] {
        if len != expected {
            return Err(ExtractError::normalization(
                coin,
                format!("{name} has {len} points, prices has {expected}"),
            ));
        }
    }

    let mut rows = Vec::with_capacity(expected);
    for ((price, market_cap), volume) in chart
        .prices
        .iter()
        .zip(&chart.market_caps)
        .zip(&chart.total_volumes)
    {
        let timestamp_ms = price.0;
        let datetime = DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
            ExtractError::normalization(coin, format!("timestamp out of range: {timestamp_ms}"))
        })?;
        rows.push(NormalizedRow {
            coin: coin.to_string(),
            timestamp_ms,
            price: price.1,
            market_cap: market_cap.1,
            volume: volume.1,
            datetime,
        });
    }
    Ok(rows)
}
