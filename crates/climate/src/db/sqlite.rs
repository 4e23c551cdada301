use async_trait::async_trait;
use climate_core::is_file;
use log::{debug, info};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row, TypeInfo, ValueRef,
};
use std::time::Duration;

use super::{
    ClimateData, Error, RawTable, SqlValue, MEASUREMENT_COLUMNS, MEASUREMENT_TABLE,
    STATION_COLUMNS, STATION_TABLE,
};

const MEASUREMENT_QUERY: &str =
    "SELECT station, date, prcp, tobs FROM measurement ORDER BY date DESC";
const STATION_QUERY: &str = "SELECT station, name, latitude, longitude, elevation FROM station";

/// Read-only access to the SQLite file holding `measurement` and `station`
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(path: &str) -> Result<Self, Error> {
        if !is_file(path) {
            return Err(Error::StoreNotFound(path.to_owned()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000");

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(Error::Connection)?;

        info!("Opened climate store (read-only) at: {}", path);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Column names of `table` as reported by the store, minus the leading id column
    pub async fn discover_columns(&self, table: &str) -> Result<Vec<String>, Error> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", table))
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(Error::MissingTable(table.to_owned()));
        }

        let columns = rows
            .iter()
            .skip(1)
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("discovered columns for {}: {:?}", table, columns);
        Ok(columns)
    }

    async fn validated_columns(&self, table: &str, expected: &[&str]) -> Result<Vec<String>, Error> {
        let columns = self.discover_columns(table).await?;
        if let Some(missing) = expected
            .iter()
            .find(|name| !columns.iter().any(|c| c == *name))
        {
            return Err(Error::MissingColumn {
                table: table.to_owned(),
                column: missing.to_string(),
            });
        }
        Ok(columns)
    }

    async fn fetch_table(
        &self,
        table: &str,
        expected: &[&str],
        query: &str,
    ) -> Result<RawTable, Error> {
        let columns = self.validated_columns(table, expected).await?;
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;
        info!("loaded {} rows from {}", rows.len(), table);

        Ok(RawTable {
            name: table.to_owned(),
            columns,
            rows,
        })
    }
}

fn decode_row(row: &SqliteRow) -> Result<Vec<SqlValue>, sqlx::Error> {
    (0..row.len())
        .map(|index| {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                return Ok(SqlValue::Null);
            }
            let kind = raw.type_info().name().to_owned();
            match kind.as_str() {
                "INTEGER" => row.try_get::<i64, _>(index).map(SqlValue::Integer),
                "REAL" => row.try_get::<f64, _>(index).map(SqlValue::Real),
                _ => row.try_get::<String, _>(index).map(SqlValue::Text),
            }
        })
        .collect()
}

#[async_trait]
impl ClimateData for SqliteStore {
    async fn measurement_table(&self) -> Result<RawTable, Error> {
        self.fetch_table(MEASUREMENT_TABLE, &MEASUREMENT_COLUMNS, MEASUREMENT_QUERY)
            .await
    }

    async fn station_table(&self) -> Result<RawTable, Error> {
        self.fetch_table(STATION_TABLE, &STATION_COLUMNS, STATION_QUERY)
            .await
    }
}
