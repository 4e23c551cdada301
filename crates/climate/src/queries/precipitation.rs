use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::{describe, ColumnSummary};
use crate::{parse_date, ClimateTables};

/// Statistic name mapped to column name mapped to value.
///
/// Statistics that are undefined for the window (no values, or `std` with
/// a single value) serialize as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct PrecipitationSummary {
    pub count: BTreeMap<String, usize>,
    pub mean: BTreeMap<String, Option<f64>>,
    pub std: BTreeMap<String, Option<f64>>,
    pub min: BTreeMap<String, Option<f64>>,
    #[serde(rename = "25%")]
    pub p25: BTreeMap<String, Option<f64>>,
    #[serde(rename = "50%")]
    pub p50: BTreeMap<String, Option<f64>>,
    #[serde(rename = "75%")]
    pub p75: BTreeMap<String, Option<f64>>,
    pub max: BTreeMap<String, Option<f64>>,
}

impl PrecipitationSummary {
    fn insert(&mut self, column: &str, summary: ColumnSummary) {
        let column = column.to_owned();
        self.count.insert(column.clone(), summary.count);
        self.mean.insert(column.clone(), summary.mean);
        self.std.insert(column.clone(), summary.std);
        self.min.insert(column.clone(), summary.min);
        self.p25.insert(column.clone(), summary.p25);
        self.p50.insert(column.clone(), summary.p50);
        self.p75.insert(column.clone(), summary.p75);
        self.max.insert(column, summary.max);
    }
}

/// Describe every numeric column of the precipitation table over rows dated
/// on or after the cutoff. Rows whose date is missing or malformed are left
/// out of the window.
pub fn precipitation_summary(tables: &ClimateTables) -> PrecipitationSummary {
    let mut skipped = 0usize;
    let window: Vec<_> = tables
        .precipitation
        .iter()
        .filter(|record| match record.date.as_deref().map(parse_date) {
            Some(Ok(date)) => date >= tables.cutoff_date,
            _ => {
                skipped += 1;
                false
            }
        })
        .collect();
    if skipped > 0 {
        debug!("{} precipitation rows without a usable date left out of window", skipped);
    }

    let mut summary = PrecipitationSummary::default();
    summary.insert("prcp", describe(window.iter().map(|record| record.prcp)));
    summary
}
