//! Aggregations served by the API.
//!
//! Every function here is a pure read of [`ClimateTables`](crate::ClimateTables):
//! same tables in, same value out.

mod describe;
mod precipitation;
mod stations;
mod temperature;

pub use describe::{describe, ColumnSummary};
pub use precipitation::{precipitation_summary, PrecipitationSummary};
pub use stations::{station_activity, station_count, ActivityRanking};
pub use temperature::{most_active_station, most_active_temperature, TemperatureStats};
