//! SQLite Store Implementation

use crate::{Measurement, MeasurementId, MeasurementStore, StorageError, StoreQuery, MEASUREMENT_GROUP};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_key TEXT NOT NULL,
    temperature REAL NOT NULL,
    humidity REAL NOT NULL,
    date INTEGER NOT NULL
)";

const CREATE_INDEX_SQL: &str = "CREATE INDEX IF NOT EXISTS idx_measurements_group_date
    ON measurements (group_key, date DESC, id DESC)";

const INSERT_SQL: &str =
    "INSERT INTO measurements (group_key, temperature, humidity, date) VALUES (?1, ?2, ?3, ?4)";

const SELECT_SQL: &str = "SELECT temperature, humidity, date FROM measurements
    WHERE group_key = ?1 AND (?2 IS NULL OR date >= ?2)
    ORDER BY date DESC, id DESC
    LIMIT ?3";

/// Connection settings for [`SqliteStore`]
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    /// sqlx connection URL, e.g. `sqlite://measurements.db`
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// How long a writer waits on a locked database before giving up
    pub busy_timeout: Duration,
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://measurements.db".to_string(),
            max_connections: 4,
            busy_timeout: Duration::from_millis(5_000),
        }
    }
}

#[derive(sqlx::FromRow)]
struct MeasurementRow {
    temperature: f32,
    humidity: f32,
    date: i64,
}

impl From<MeasurementRow> for Measurement {
    fn from(row: MeasurementRow) -> Self {
        Measurement::new(row.temperature, row.humidity, row.date)
    }
}

/// Durable store backed by a SQLite database in WAL mode.
///
/// SQLite serializes writers, so every append into the single group takes
/// the database write lock. Writers that cannot get it within the busy
/// timeout fail with [`StorageError::Contention`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database and ensure the schema exists
    pub async fn connect(config: &SqliteStoreConfig) -> Result<Self, StorageError> {
        info!("Opening SQLite measurement store at {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        sqlx::query(CREATE_INDEX_SQL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Close the pool, waiting for in-flight queries
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl MeasurementStore for SqliteStore {
    async fn append(&self, record: Measurement) -> Result<MeasurementId, StorageError> {
        let result = sqlx::query(INSERT_SQL)
            .bind(MEASUREMENT_GROUP)
            .bind(record.temperature)
            .bind(record.humidity)
            .bind(record.date)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let id = result.last_insert_rowid();
        debug!("Appended measurement {} (date={})", id, record.date);
        Ok(MeasurementId(id))
    }

    async fn query(&self, query: &StoreQuery) -> Result<Vec<Measurement>, StorageError> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let rows: Vec<MeasurementRow> = sqlx::query_as(SELECT_SQL)
            .bind(query.group.as_str())
            .bind(query.since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Measurement::from).collect())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::Database(db) => {
            let primary = db
                .code()
                .and_then(|c| c.parse::<i64>().ok())
                .map(|c| c & 0xff);
            if matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED)) {
                warn!("Measurement group contended: {}", db.message());
                StorageError::Contention(db.message().to_string())
            } else {
                StorageError::Database(db.message().to_string())
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Unavailable(err.to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StorageError::Serialization(err.to_string())
        }
        other => StorageError::Database(other.to_string()),
    }
}
