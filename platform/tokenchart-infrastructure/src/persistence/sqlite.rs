use super::record_write_metrics;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::PathBuf;
use std::time::Instant;
use tokenchart_domain::entities::dataset::CombinedDataset;
use tokenchart_domain::repositories::dataset_sink::{DatasetSink, SinkOutcome};

const STAGING_TABLE: &str = "tokenchart_staging";

/// Loads a dataset into a local SQLite file with `CREATE TABLE IF NOT EXISTS ... AS
/// SELECT` semantics: the first run creates the table, later runs leave it untouched.
#[derive(Debug, Clone)]
pub struct SqliteDatasetSink {
    path: PathBuf,
    table: String,
}

impl SqliteDatasetSink {
    pub fn new(path: impl Into<PathBuf>, table: &str) -> Result<Self, String> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err("sqlite path is empty".to_string());
        }
        validate_table_name(table)?;
        Ok(Self {
            path,
            table: table.to_string(),
        })
    }

    fn open_conn(&self) -> Result<Connection, String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    format!("failed to create dir {}: {}", parent.display(), err)
                })?;
            }
        }
        Connection::open(&self.path)
            .map_err(|err| format!("failed to open sqlite {}: {}", self.path.display(), err))
    }

    pub fn table_exists(&self) -> Result<bool, String> {
        let conn = self.open_conn()?;
        table_exists(&conn, &self.table)
    }

    pub fn row_count(&self) -> Result<u64, String> {
        let conn = self.open_conn()?;
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", self.table);
        conn.query_row(&sql, [], |row| row.get::<_, i64>(0))
            .map(|count| count.max(0) as u64)
            .map_err(|err| format!("failed to count rows in {}: {}", self.table, err))
    }

    fn write(&self, dataset: &CombinedDataset) -> Result<SinkOutcome, String> {
        let mut conn = self.open_conn()?;
        // Write lock held from here so the existence check and the create see the same schema.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| format!("failed to start transaction: {err}"))?;
        if table_exists(&tx, &self.table)? {
            tracing::warn!(
                table = %self.table,
                path = %self.path.display(),
                "table already exists; skipping load"
            );
            return Ok(SinkOutcome::AlreadyExists);
        }

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS temp.{STAGING_TABLE};
             CREATE TEMP TABLE {STAGING_TABLE} (
                coin TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                price REAL,
                market_cap REAL,
                volume REAL,
                datetime TEXT NOT NULL
             );"
        ))
        .map_err(|err| format!("failed to create staging table: {err}"))?;

        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO temp.{STAGING_TABLE}
                        (coin, timestamp, price, market_cap, volume, datetime)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ))
                .map_err(|err| format!("failed to prepare insert: {err}"))?;
            for row in dataset.rows() {
                stmt.execute(params![
                    row.coin,
                    row.timestamp_ms,
                    row.price,
                    row.market_cap,
                    row.volume,
                    row.datetime_label(),
                ])
                .map_err(|err| format!("insert failed for {}: {}", row.coin, err))?;
            }
        }

        tx.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS main.\"{table}\" AS SELECT * FROM temp.{STAGING_TABLE};
             DROP TABLE temp.{STAGING_TABLE};",
            table = self.table
        ))
        .map_err(|err| format!("failed to create table {}: {}", self.table, err))?;

        tx.commit()
            .map_err(|err| format!("failed to commit: {err}"))?;

        tracing::info!(
            table = %self.table,
            path = %self.path.display(),
            rows = dataset.len(),
            "table created"
        );
        Ok(SinkOutcome::Created {
            rows: dataset.len(),
        })
    }
}

impl DatasetSink for SqliteDatasetSink {
    fn write_dataset(&self, dataset: &CombinedDataset) -> Result<SinkOutcome, String> {
        let start = Instant::now();
        let result = self.write(dataset);
        record_write_metrics("sqlite", start, &result);
        result
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, String> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        params![table],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(|err| format!("failed to inspect sqlite schema: {err}"))
}

pub fn validate_table_name(table: &str) -> Result<(), String> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid || table.len() > 63 {
        return Err(format!("invalid table name: {table:?}"));
    }
    Ok(())
}
