pub mod csv_export;
pub mod sqlite;

use std::time::Instant;

fn record_write_metrics<T>(sink: &'static str, start: Instant, result: &Result<T, String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "tokenchart.infra.persistence.write.calls_total",
        "sink" => sink,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!(
        "tokenchart.infra.persistence.write_ms",
        "sink" => sink,
        "result" => result_label
    )
    .record(start.elapsed().as_millis() as f64);
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::DateTime;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tokenchart_domain::entities::dataset::CombinedDataset;
    use tokenchart_domain::value_objects::market_row::NormalizedRow;

    pub fn unique_tmp_dir(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("tokenchart_{prefix}_{}_{}", std::process::id(), now))
    }

    pub fn sample_dataset() -> CombinedDataset {
        let row = |coin: &str, ts: i64, price: f64| NormalizedRow {
            coin: coin.to_string(),
            timestamp_ms: ts,
            price,
            market_cap: price * 1_000.0,
            volume: price * 10.0,
            datetime: DateTime::from_timestamp_millis(ts).expect("timestamp"),
        };
        CombinedDataset::concat(vec![
            vec![
                row("aave", 1_735_689_600_000, 300.5),
                row("aave", 1_735_776_000_000, 310.0),
            ],
            vec![row("cronos", 1_735_689_600_000, 0.09)],
        ])
    }
}
