use log::debug;
use std::collections::BTreeMap;

use crate::ClimateTables;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl From<TemperatureStats> for Vec<f64> {
    fn from(stats: TemperatureStats) -> Self {
        vec![stats.min, stats.max, stats.mean]
    }
}

/// Most frequent station id in the measurement table, lowest id on ties
pub fn most_active_station(tables: &ClimateTables) -> Option<&str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &tables.measurements {
        *counts.entry(record.station.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (station, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((station, count));
        }
    }
    best.map(|(station, _)| station)
}

/// Min, max and mean temperature observation of the most active station
pub fn most_active_temperature(tables: &ClimateTables) -> Option<TemperatureStats> {
    let station = most_active_station(tables)?;
    let observations: Vec<f64> = tables
        .measurements
        .iter()
        .filter(|record| record.station == station)
        .map(|record| record.tobs)
        .collect();
    debug!(
        "most active station {} has {} observations",
        station,
        observations.len()
    );

    let min = observations.iter().copied().reduce(f64::min)?;
    let max = observations.iter().copied().reduce(f64::max)?;
    let mean = observations.iter().sum::<f64>() / observations.len() as f64;
    Some(TemperatureStats { min, max, mean })
}
