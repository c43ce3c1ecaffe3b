//! DuckDB-backed fee store

use crate::error::{Error, Result};
use crate::sampler::{FeeAverages, FeeRange, FeeRecord};
use crate::types::Chain;
use chrono::{DateTime, Utc};
use duckdb::{Connection, ToSql};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Table holding one row per sample
pub const TABLE_NAME: &str = "fee_records";

/// Persistent store of fee samples
pub struct FeeStore {
    conn: Mutex<Connection>,
    /// Database location (for logging)
    location: String,
}

impl FeeStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Self::init(conn, path.display().to_string())
    }

    /// Open a throwaway in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, ":memory:".to_string())
    }

    fn init(conn: Connection, location: String) -> Result<Self> {
        conn.execute_batch(&create_table_sql())?;
        debug!(location = %location, table = TABLE_NAME, "fee store ready");
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Other("fee store connection poisoned".to_string()))
    }

    /// Append one sample
    pub fn insert(&self, record: &FeeRecord) -> Result<()> {
        let tracked_at_ms = record.tracked_at.timestamp_millis();
        let prices: Vec<Option<f64>> = Chain::ALL
            .into_iter()
            .flat_map(|chain| {
                let fee = record.fee(chain);
                [fee.map(|f| f.low), fee.map(|f| f.high)]
            })
            .collect();

        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(prices.len() + 1);
        params.push(&tracked_at_ms);
        params.extend(prices.iter().map(|p| p as &dyn ToSql));

        let placeholders = vec!["?"; params.len()].join(", ");
        let sql = format!(
            "INSERT INTO {TABLE_NAME} (tracked_at_ms, {}) VALUES ({placeholders})",
            price_columns().join(", ")
        );

        self.lock()?.execute(&sql, params.as_slice())?;
        Ok(())
    }

    /// Average fee per chain over samples tracked in `[since, until]`
    pub fn averages(&self, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<FeeAverages> {
        let columns = price_columns();
        let selects: Vec<String> = columns.iter().map(|c| format!("AVG({c})")).collect();
        let sql = format!(
            "SELECT COUNT(*), {} FROM {TABLE_NAME} WHERE tracked_at_ms BETWEEN ? AND ?",
            selects.join(", ")
        );

        let conn = self.lock()?;
        let (samples, averages) = conn.query_row(
            &sql,
            [since.timestamp_millis(), until.timestamp_millis()],
            |row| {
                let samples: i64 = row.get(0)?;
                let mut averages = Vec::with_capacity(columns.len());
                for i in 0..columns.len() {
                    averages.push(row.get::<_, Option<f64>>(i + 1)?);
                }
                Ok((samples, averages))
            },
        )?;

        let mut fees = BTreeMap::new();
        for (chain, pair) in Chain::ALL.into_iter().zip(averages.chunks(2)) {
            if let [Some(low), Some(high)] = pair {
                fees.insert(chain, FeeRange::new(*low, *high));
            }
        }

        Ok(FeeAverages {
            samples: samples.max(0) as u64,
            fees,
        })
    }

    /// Number of stored samples
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.lock()?.query_row(
            &format!("SELECT COUNT(*) FROM {TABLE_NAME}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Flush and close the connection
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| Error::Other("fee store connection poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| Error::Storage(e))?;
        debug!(location = %self.location, "fee store closed");
        Ok(())
    }
}

impl std::fmt::Debug for FeeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Low/high column names in `Chain::ALL` order
fn price_columns() -> Vec<String> {
    Chain::ALL
        .into_iter()
        .flat_map(|chain| {
            let prefix = chain.column_prefix();
            [format!("{prefix}_low_price"), format!("{prefix}_high_price")]
        })
        .collect()
}

fn create_table_sql() -> String {
    let columns: Vec<String> = price_columns()
        .into_iter()
        .map(|c| format!("{c} DOUBLE"))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (tracked_at_ms BIGINT NOT NULL, {});",
        columns.join(", ")
    )
}
