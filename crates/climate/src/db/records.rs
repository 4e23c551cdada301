use serde::{Deserialize, Serialize};

use super::{Error, RawTable, SqlValue};

pub const MEASUREMENT_TABLE: &str = "measurement";
pub const STATION_TABLE: &str = "station";

/// Columns the service reads from `measurement`, in query order
pub const MEASUREMENT_COLUMNS: [&str; 4] = ["station", "date", "prcp", "tobs"];
/// Columns the service reads from `station`, in query order
pub const STATION_COLUMNS: [&str; 5] = ["station", "name", "latitude", "longitude", "elevation"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub station: String,
    /// ISO 8601 calendar date as stored, e.g. "2017-08-23"
    pub date: Option<String>,
    /// None when no precipitation was recorded that day
    pub prcp: Option<f64>,
    pub tobs: f64,
}

/// A measurement with the temperature observation dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationRecord {
    pub station: String,
    pub date: Option<String>,
    pub prcp: Option<f64>,
}

impl From<&MeasurementRecord> for PrecipitationRecord {
    fn from(value: &MeasurementRecord) -> Self {
        Self {
            station: value.station.clone(),
            date: value.date.clone(),
            prcp: value.prcp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub station: String,
    pub date: Option<String>,
    pub prcp: Option<f64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl JoinedRecord {
    pub fn new(precipitation: &PrecipitationRecord, station: &StationRecord) -> Self {
        Self {
            station: precipitation.station.clone(),
            date: precipitation.date.clone(),
            prcp: precipitation.prcp,
            name: station.name.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            elevation: station.elevation,
        }
    }
}

/// One positional row with its values bound to the discovered column names
pub struct LabeledRow<'a> {
    table: &'a str,
    index: usize,
    columns: &'a [String],
    values: &'a [SqlValue],
}

impl LabeledRow<'_> {
    fn value(&self, column: &str) -> Result<&SqlValue, Error> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|pos| &self.values[pos])
            .ok_or_else(|| Error::MissingColumn {
                table: self.table.to_owned(),
                column: column.to_owned(),
            })
    }

    fn invalid(&self, column: &str) -> Error {
        Error::InvalidValue {
            table: self.table.to_owned(),
            column: column.to_owned(),
            row: self.index,
        }
    }

    pub fn optional_text(&self, column: &str) -> Result<Option<String>, Error> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(value) => Ok(Some(value.clone())),
            _ => Err(self.invalid(column)),
        }
    }

    pub fn text(&self, column: &str) -> Result<String, Error> {
        self.optional_text(column)?
            .ok_or_else(|| self.invalid(column))
    }

    /// INTEGER cells are widened, SQLite happily stores `0` in a REAL column
    pub fn optional_real(&self, column: &str) -> Result<Option<f64>, Error> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Real(value) => Ok(Some(*value)),
            SqlValue::Integer(value) => Ok(Some(*value as f64)),
            SqlValue::Text(_) => Err(self.invalid(column)),
        }
    }

    pub fn real(&self, column: &str) -> Result<f64, Error> {
        self.optional_real(column)?
            .ok_or_else(|| self.invalid(column))
    }
}

/// Record types that can be built from a labeled row
pub trait FromColumns: Sized {
    fn from_columns(row: &LabeledRow<'_>) -> Result<Self, Error>;
}

impl FromColumns for MeasurementRecord {
    fn from_columns(row: &LabeledRow<'_>) -> Result<Self, Error> {
        Ok(Self {
            station: row.text("station")?,
            date: row.optional_text("date")?,
            prcp: row.optional_real("prcp")?,
            tobs: row.real("tobs")?,
        })
    }
}

impl FromColumns for StationRecord {
    fn from_columns(row: &LabeledRow<'_>) -> Result<Self, Error> {
        Ok(Self {
            station: row.text("station")?,
            name: row.text("name")?,
            latitude: row.real("latitude")?,
            longitude: row.real("longitude")?,
            elevation: row.real("elevation")?,
        })
    }
}

/// Bind every row of `table` to its column names and decode it as `T`.
///
/// Fails on the first row whose arity differs from the number of columns.
pub fn load_table<T: FromColumns>(table: &RawTable) -> Result<Vec<T>, Error> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, values)| {
            if values.len() != table.columns.len() {
                return Err(Error::SchemaMismatch {
                    table: table.name.clone(),
                    row: index,
                    expected: table.columns.len(),
                    found: values.len(),
                });
            }
            T::from_columns(&LabeledRow {
                table: &table.name,
                index,
                columns: &table.columns,
                values,
            })
        })
        .collect()
}
