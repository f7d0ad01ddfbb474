use chrono::{DateTime, Utc};
use serde::Serialize;

/// One sampled timestamp of one coin's market chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub coin: String,
    pub timestamp_ms: i64,
    pub price: f64,
    pub market_cap: f64,
    pub volume: f64,
    pub datetime: DateTime<Utc>,
}

impl NormalizedRow {
    /// `YYYY-MM-DD HH:MM:SS` in UTC, the form written to the table store.
    pub fn datetime_label(&self) -> String {
        self.datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
