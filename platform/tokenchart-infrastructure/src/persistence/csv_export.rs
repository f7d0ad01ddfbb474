use super::record_write_metrics;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokenchart_domain::entities::dataset::CombinedDataset;
use tokenchart_domain::repositories::dataset_sink::{DatasetSink, SinkOutcome};

pub const CSV_HEADER: [&str; 6] = ["coin", "timestamp", "price", "market_cap", "volume", "datetime"];

/// Writes the dataset as CSV, replacing any previous file.
#[derive(Debug, Clone)]
pub struct CsvDatasetSink {
    path: PathBuf,
}

impl CsvDatasetSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub fn write_dataset_csv(path: &Path, dataset: &CombinedDataset) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create dir {}: {}", parent.display(), err))?;
        }
    }

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create dataset csv {}: {}", path.display(), err))?;
    wtr.write_record(CSV_HEADER)
        .map_err(|err| format!("failed to write dataset csv header: {}", err))?;

    for row in dataset.rows() {
        wtr.write_record([
            row.coin.clone(),
            row.timestamp_ms.to_string(),
            row.price.to_string(),
            row.market_cap.to_string(),
            row.volume.to_string(),
            row.datetime_label(),
        ])
        .map_err(|err| format!("failed to write dataset row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush dataset csv: {}", err))
}

impl DatasetSink for CsvDatasetSink {
    fn write_dataset(&self, dataset: &CombinedDataset) -> Result<SinkOutcome, String> {
        let start = Instant::now();
        let result = write_dataset_csv(&self.path, dataset).map(|()| SinkOutcome::Written {
            rows: dataset.len(),
        });
        record_write_metrics("csv", start, &result);
        if result.is_ok() {
            tracing::info!(path = %self.path.display(), rows = dataset.len(), "dataset csv written");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::CsvDatasetSink;
    use crate::persistence::test_support::{sample_dataset, unique_tmp_dir};
    use std::fs;
    use tokenchart_domain::repositories::dataset_sink::{DatasetSink, SinkOutcome};

    #[test]
    fn writes_header_and_rows_in_order() {
        let dir = unique_tmp_dir("csv_sink");
        let path = dir.join("nested").join("crypto.csv");
        let sink = CsvDatasetSink::new(&path);

        let outcome = sink.write_dataset(&sample_dataset()).expect("write csv");
        assert_eq!(outcome, SinkOutcome::Written { rows: 3 });

        let contents = fs::read_to_string(&path).expect("read csv");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "coin,timestamp,price,market_cap,volume,datetime");
        assert_eq!(
            lines[1],
            "aave,1735689600000,300.5,300500,3005,2025-01-01 00:00:00"
        );
        assert!(lines[3].starts_with("cronos,"));
        assert_eq!(lines.len(), 4);

        let _ = fs::remove_dir_all(&dir);
    }
}
