use crate::helpers::{
    get, mock_climate_data, mock_measurements, mock_stations, spawn_app, spawn_app_with_cutoff,
};
use axum::http::StatusCode;
use climate::{CutoffAnchor, CutoffPolicy, PrecipitationSummary, RawTable};
use serde_json::{from_str, Value};
use std::sync::Arc;
use time::macros::date;

#[tokio::test]
async fn precip_describes_last_year_of_precipitation() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, content_type, body) = get(&test_app.app, "/api/v1.0/precip").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let summary: PrecipitationSummary = from_str(&body).unwrap();
    // 2016-08-22 and 2010-01-01 fall before the cutoff, the null reading is not counted
    assert_eq!(summary.count["prcp"], 5);
    assert!((summary.mean["prcp"].unwrap() - 0.244).abs() < 1e-9);
    assert_eq!(summary.min["prcp"], Some(0.0));
    assert_eq!(summary.p50["prcp"], Some(0.06));
    assert_eq!(summary.max["prcp"], Some(0.7));
}

#[tokio::test]
async fn precip_with_empty_window_reports_zero_count() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let cutoff = CutoffPolicy::new(CutoffAnchor::Fixed(date!(2030 - 01 - 01)), 1).unwrap();
    let test_app = spawn_app_with_cutoff(Arc::new(climate_data), cutoff).await;

    let (status, _, body) = get(&test_app.app, "/api/v1.0/precip").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = from_str(&body).unwrap();
    assert_eq!(json["count"]["prcp"], 0);
    assert!(json["mean"]["prcp"].is_null());
    assert!(json["std"]["prcp"].is_null());
}

#[tokio::test]
async fn precip_window_can_follow_latest_observation() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let cutoff = CutoffPolicy::new(CutoffAnchor::LatestObservation, 7).unwrap();
    let test_app = spawn_app_with_cutoff(Arc::new(climate_data), cutoff).await;

    let (_, _, body) = get(&test_app.app, "/api/v1.0/precip").await;

    let summary: PrecipitationSummary = from_str(&body).unwrap();
    // window is 2017-08-16 ..= 2017-08-23
    assert_eq!(summary.count["prcp"], 4);
}

#[tokio::test]
async fn stations_counts_joined_stations() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, _, body) = get(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    // USC00511918 has measurements but no station record
    assert_eq!(body, "3");
}

#[tokio::test]
async fn activity_ranks_stations_by_observation_count() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, _, body) = get(&test_app.app, "/api/v1.0/activity").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"USC00519281":4,"USC00516128":2,"USC00511918":1,"USC00519397":1}"#
    );
}

#[tokio::test]
async fn actstats_matches_activity() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (_, _, activity) = get(&test_app.app, "/api/v1.0/activity").await;
    let (status, _, actstats) = get(&test_app.app, "/api/v1.0/actstats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(activity, actstats);
}

#[tokio::test]
async fn tempavgactive_returns_min_max_mean_of_busiest_station() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (status, _, body) = get(&test_app.app, "/api/v1.0/tempavgactive").await;

    assert_eq!(status, StatusCode::OK);
    let values: Vec<f64> = from_str(&body).unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0], 54.0);
    assert_eq!(values[1], 79.0);
    assert!((values[2] - 70.25).abs() < 1e-9);
}

#[tokio::test]
async fn empty_store_gives_empty_results() {
    let measurements = RawTable::new("measurement", &["station", "date", "prcp", "tobs"], vec![]);
    let stations = RawTable::new(
        "station",
        &["station", "name", "latitude", "longitude", "elevation"],
        vec![],
    );
    let climate_data = mock_climate_data(measurements, stations);
    let test_app = spawn_app(Arc::new(climate_data)).await;

    let (_, _, stations) = get(&test_app.app, "/api/v1.0/stations").await;
    let (_, _, activity) = get(&test_app.app, "/api/v1.0/activity").await;
    let (status, _, temperature) = get(&test_app.app, "/api/v1.0/tempavgactive").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stations, "0");
    assert_eq!(activity, "{}");
    assert_eq!(temperature, "[]");
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let climate_data = mock_climate_data(mock_measurements(), mock_stations());
    let test_app = spawn_app(Arc::new(climate_data)).await;

    for uri in [
        "/api/v1.0/precip",
        "/api/v1.0/stations",
        "/api/v1.0/activity",
        "/api/v1.0/tempavgactive",
        "/api/v1.0/actstats",
    ] {
        let (_, _, first) = get(&test_app.app, uri).await;
        let (_, _, second) = get(&test_app.app, uri).await;
        assert_eq!(first, second, "{uri} changed between requests");
    }
}
