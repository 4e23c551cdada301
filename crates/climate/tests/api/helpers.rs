use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate::{
    app, build_app_state, db, ClimateData, CutoffPolicy, RawTable, SqlValue,
};
use hyper::Method;
use mockall::mock;
use std::sync::Arc;
use tower::ServiceExt;

mock! {
    pub ClimateAccess {}
    #[async_trait]
    impl ClimateData for ClimateAccess {
        async fn measurement_table(&self) -> Result<RawTable, db::Error>;
        async fn station_table(&self) -> Result<RawTable, db::Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(climate_data: Arc<dyn ClimateData>) -> TestApp {
    spawn_app_with_cutoff(climate_data, CutoffPolicy::default()).await
}

pub async fn spawn_app_with_cutoff(
    climate_data: Arc<dyn ClimateData>,
    cutoff: CutoffPolicy,
) -> TestApp {
    let app_state = build_app_state(climate_data, cutoff)
        .await
        .expect("Failed to build app state");
    TestApp {
        app: app(app_state),
    }
}

/// Mock returning the given tables, each read exactly once
pub fn mock_climate_data(measurements: RawTable, stations: RawTable) -> MockClimateAccess {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_measurement_table()
        .times(1)
        .returning(move || Ok(measurements.clone()));
    climate_data
        .expect_station_table()
        .times(1)
        .returning(move || Ok(stations.clone()));
    climate_data
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let content_type = response
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

fn text(value: &str) -> SqlValue {
    SqlValue::Text(value.to_owned())
}

fn real(value: f64) -> SqlValue {
    SqlValue::Real(value)
}

/// A slice of the Hawaii measurement table, newest first like the real query
pub fn mock_measurements() -> RawTable {
    let rows = vec![
        vec![text("USC00519397"), text("2017-08-23"), real(0.0), real(81.0)],
        vec![text("USC00516128"), text("2017-08-23"), real(0.45), real(76.0)],
        vec![text("USC00519281"), text("2017-08-18"), real(0.06), real(79.0)],
        vec![text("USC00519281"), text("2017-08-17"), real(0.01), real(76.0)],
        vec![text("USC00519281"), text("2017-01-01"), SqlValue::Null, real(72.0)],
        vec![text("USC00516128"), text("2016-08-23"), real(0.7), real(74.0)],
        vec![text("USC00519281"), text("2016-08-22"), real(2.0), real(54.0)],
        vec![text("USC00511918"), text("2010-01-01"), real(0.05), SqlValue::Integer(66)],
    ];
    RawTable::new(
        "measurement",
        &["station", "date", "prcp", "tobs"],
        rows,
    )
}

pub fn mock_stations() -> RawTable {
    let rows = vec![
        vec![
            text("USC00519397"),
            text("WAIKIKI 717.2, HI US"),
            real(21.2716),
            real(-157.8168),
            real(3.0),
        ],
        vec![
            text("USC00519281"),
            text("WAIHEE 837.5, HI US"),
            real(21.45167),
            real(-157.84889),
            real(32.9),
        ],
        vec![
            text("USC00516128"),
            text("MANOA LYON ARBO 785.2, HI US"),
            real(21.3331),
            real(-157.8025),
            real(152.4),
        ],
    ];
    RawTable::new(
        "station",
        &["station", "name", "latitude", "longitude", "elevation"],
        rows,
    )
}
