mod records;
pub mod sqlite;

pub use records::*;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Climate store not found at: {0}")]
    StoreNotFound(String),
    #[error("Failed to connect to climate store: {0}")]
    Connection(sqlx::Error),
    #[error("Failed to query climate store: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Table `{0}` is missing from the climate store")]
    MissingTable(String),
    #[error("Table `{table}` is missing expected column `{column}`")]
    MissingColumn { table: String, column: String },
    #[error("Row {row} of `{table}` has {found} values but {expected} columns")]
    SchemaMismatch {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row} of `{table}` has an invalid value in column `{column}`")]
    InvalidValue {
        table: String,
        column: String,
        row: usize,
    },
}

/// A single cell as stored, before it is bound to a declared column type
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// Positional rows of one fixed query along with the column names
/// discovered from the live schema (synthetic id column excluded)
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl RawTable {
    pub fn new(name: &str, columns: &[&str], rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            name: name.to_owned(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Rows of `SELECT station, date, prcp, tobs FROM measurement ORDER BY date DESC`
    async fn measurement_table(&self) -> Result<RawTable, Error>;
    /// Rows of `SELECT station, name, latitude, longitude, elevation FROM station`
    async fn station_table(&self) -> Result<RawTable, Error>;
}
