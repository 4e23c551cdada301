use log::{info, warn};
use std::collections::HashMap;
use time::{macros::date, macros::format_description, Date, Duration};

use crate::db::{
    self, load_table, ClimateData, JoinedRecord, MeasurementRecord, PrecipitationRecord,
    StationRecord,
};

/// Anchor the summary window ends on when nothing else is configured
pub const DEFAULT_REFERENCE_DATE: Date = date!(2017 - 08 - 23);
pub const DEFAULT_WINDOW_DAYS: i64 = 365;
/// Longest window a `time::Duration` can hold in whole days
pub const MAX_WINDOW_DAYS: i64 = i64::MAX / 86_400;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load climate data: {0}")]
    Store(#[from] db::Error),
    #[error("Invalid reference date `{0}`, expected YYYY-MM-DD or `latest`")]
    ReferenceDate(String),
    #[error("Invalid window of {0} days, must be between 0 and {max}", max = MAX_WINDOW_DAYS)]
    WindowDays(i64),
}

/// Parse a stored measurement date (`YYYY-MM-DD`, month and day may be unpadded)
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(
        value,
        format_description!("[year]-[month padding:none]-[day padding:none]"),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffAnchor {
    Fixed(Date),
    /// Use the first date of the measurement query (newest row)
    LatestObservation,
}

impl std::str::FromStr for CutoffAnchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(CutoffAnchor::LatestObservation);
        }
        parse_date(s)
            .map(CutoffAnchor::Fixed)
            .map_err(|_| Error::ReferenceDate(s.to_owned()))
    }
}

/// Decides where the "recent" precipitation window starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffPolicy {
    pub anchor: CutoffAnchor,
    pub window_days: i64,
}

impl Default for CutoffPolicy {
    fn default() -> Self {
        Self {
            anchor: CutoffAnchor::Fixed(DEFAULT_REFERENCE_DATE),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl CutoffPolicy {
    pub fn new(anchor: CutoffAnchor, window_days: i64) -> Result<Self, Error> {
        if !(0..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(Error::WindowDays(window_days));
        }
        Ok(Self {
            anchor,
            window_days,
        })
    }

    pub fn cutoff_date(&self, latest_date: Option<&str>) -> Date {
        let anchor = match self.anchor {
            CutoffAnchor::Fixed(date) => date,
            CutoffAnchor::LatestObservation => match latest_date.map(parse_date) {
                Some(Ok(date)) => date,
                _ => {
                    warn!(
                        "latest observation date {:?} is unusable, anchoring window on {}",
                        latest_date, DEFAULT_REFERENCE_DATE
                    );
                    DEFAULT_REFERENCE_DATE
                }
            },
        };
        anchor.saturating_sub(Duration::days(self.window_days))
    }
}

/// Everything the query handlers read, built once at startup
#[derive(Debug, Clone)]
pub struct ClimateTables {
    /// Full measurement table, newest first
    pub measurements: Vec<MeasurementRecord>,
    /// Measurements without the temperature observation
    pub precipitation: Vec<PrecipitationRecord>,
    pub stations: Vec<StationRecord>,
    /// Inner join of `precipitation` and `stations` on the station id
    pub joined: Vec<JoinedRecord>,
    /// Date of the first measurement row, which is the newest given the query order
    pub latest_date: Option<String>,
    pub cutoff_date: Date,
}

impl ClimateTables {
    pub fn new(
        measurements: Vec<MeasurementRecord>,
        stations: Vec<StationRecord>,
        cutoff: &CutoffPolicy,
    ) -> Self {
        let precipitation: Vec<PrecipitationRecord> =
            measurements.iter().map(PrecipitationRecord::from).collect();
        let joined = inner_join(&precipitation, &stations);
        let latest_date = measurements.first().and_then(|m| m.date.clone());
        let cutoff_date = cutoff.cutoff_date(latest_date.as_deref());

        Self {
            measurements,
            precipitation,
            stations,
            joined,
            latest_date,
            cutoff_date,
        }
    }
}

/// Rows without a partner on either side are dropped; a station id repeated
/// in `stations` joins once per occurrence.
pub fn inner_join(
    precipitation: &[PrecipitationRecord],
    stations: &[StationRecord],
) -> Vec<JoinedRecord> {
    let mut by_station: HashMap<&str, Vec<&StationRecord>> = HashMap::new();
    for station in stations {
        by_station
            .entry(station.station.as_str())
            .or_default()
            .push(station);
    }

    precipitation
        .iter()
        .flat_map(|record| {
            by_station
                .get(record.station.as_str())
                .into_iter()
                .flatten()
                .map(move |station| JoinedRecord::new(record, station))
        })
        .collect()
}

/// Read both tables from the store, then join and derive the window constants.
pub async fn load_tables(
    source: &dyn ClimateData,
    cutoff: &CutoffPolicy,
) -> Result<ClimateTables, Error> {
    let measurement_table = source.measurement_table().await?;
    let station_table = source.station_table().await?;

    let measurements: Vec<MeasurementRecord> = load_table(&measurement_table)?;
    let stations: Vec<StationRecord> = load_table(&station_table)?;

    let tables = ClimateTables::new(measurements, stations, cutoff);

    info!(
        "climate tables ready: {} measurements, {} stations, {} joined rows",
        tables.measurements.len(),
        tables.stations.len(),
        tables.joined.len()
    );
    info!(
        "latest measurement date: {}, precipitation window starts: {}",
        tables.latest_date.as_deref().unwrap_or("(none)"),
        tables.cutoff_date
    );
    warn!("climate data is loaded once, changes to the store are not picked up until restart");

    Ok(tables)
}
