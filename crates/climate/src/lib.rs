pub mod db;
mod queries;
mod routes;
mod startup;
pub mod tables;
mod utils;

pub use db::{
    load_table, ClimateData, JoinedRecord, MeasurementRecord, PrecipitationRecord, RawTable,
    SqlValue, SqliteStore, StationRecord,
};
pub use queries::*;
pub use routes::*;
pub use startup::*;
pub use tables::{
    inner_join, load_tables, parse_date, ClimateTables, CutoffAnchor, CutoffPolicy,
    DEFAULT_REFERENCE_DATE, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS,
};
pub use utils::*;
