use axum::{extract::State, Json};
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    most_active_temperature, precipitation_summary, station_activity, station_count,
    ActivityRanking, AppState, PrecipitationSummary,
};

pub const PRECIP_ROUTE: &str = "/api/v1.0/precip";
pub const STATIONS_ROUTE: &str = "/api/v1.0/stations";
pub const ACTIVITY_ROUTE: &str = "/api/v1.0/activity";
pub const TEMP_AVG_ACTIVE_ROUTE: &str = "/api/v1.0/tempavgactive";
pub const ACTIVE_STATS_ROUTE: &str = "/api/v1.0/actstats";

pub const API_ROUTES: [&str; 5] = [
    PRECIP_ROUTE,
    STATIONS_ROUTE,
    ACTIVITY_ROUTE,
    TEMP_AVG_ACTIVE_ROUTE,
    ACTIVE_STATS_ROUTE,
];

#[utoipa::path(
    get,
    path = "/api/v1.0/precip",
    responses(
        (status = OK, description = "Descriptive statistics of precipitation since the cutoff date", content_type = "application/json", body = PrecipitationSummary)
    ))]
pub async fn precip(State(state): State<Arc<AppState>>) -> Json<PrecipitationSummary> {
    Json(precipitation_summary(&state.tables))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Number of distinct stations with measurements", content_type = "application/json", body = u64)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Json<usize> {
    Json(station_count(&state.tables))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/activity",
    responses(
        (status = OK, description = "Observation count per station, most active first", content_type = "application/json", body = BTreeMap<String, u64>)
    ))]
pub async fn activity(State(state): State<Arc<AppState>>) -> Json<ActivityRanking> {
    Json(station_activity(&state.tables))
}

/// Same ranking as `activity`, kept at its older path
#[utoipa::path(
    get,
    path = "/api/v1.0/actstats",
    responses(
        (status = OK, description = "Observation count per station, most active first (alias of /api/v1.0/activity)", content_type = "application/json", body = BTreeMap<String, u64>)
    ))]
pub async fn active_stats(state: State<Arc<AppState>>) -> Json<ActivityRanking> {
    activity(state).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tempavgactive",
    responses(
        (status = OK, description = "[min, max, mean] temperature of the most active station, empty when there is no data", content_type = "application/json", body = [f64])
    ))]
pub async fn temp_avg_active(State(state): State<Arc<AppState>>) -> Json<Vec<f64>> {
    Json(
        most_active_temperature(&state.tables)
            .map(Vec::from)
            .unwrap_or_default(),
    )
}
