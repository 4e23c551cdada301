use serde::{ser::SerializeMap, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

use crate::ClimateTables;

/// Distinct station ids that survived the join with the station table
pub fn station_count(tables: &ClimateTables) -> usize {
    tables
        .joined
        .iter()
        .map(|record| record.station.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Station ids with their observation counts, busiest first.
///
/// Serializes as a JSON object whose keys keep this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityRanking(pub Vec<(String, usize)>);

#[cfg(test)]
impl ActivityRanking {
    fn entries(&self) -> &[(String, usize)] {
        &self.0
    }

    fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for ActivityRanking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (station, count) in &self.0 {
            map.serialize_entry(station, count)?;
        }
        map.end()
    }
}

/// Count dated observations per station, sorted by count descending with
/// ties kept in ascending station order.
pub fn station_activity(tables: &ClimateTables) -> ActivityRanking {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &tables.precipitation {
        let count = counts.entry(record.station.as_str()).or_default();
        if record.date.is_some() {
            *count += 1;
        }
    }

    let mut ranking: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(station, count)| (station.to_owned(), count))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ActivityRanking(ranking)
}
