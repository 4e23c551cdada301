use crate::helpers::{mock_measurements, mock_stations, MockClimateAccess};
use climate::{build_app_state, db, CutoffPolicy, SqlValue};
use std::sync::Arc;

#[tokio::test]
async fn unreachable_store_fails_startup() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_measurement_table()
        .times(1)
        .returning(|| Err(db::Error::StoreNotFound(String::from("/missing/hawaii.sqlite"))));
    climate_data.expect_station_table().times(0);

    let result = build_app_state(Arc::new(climate_data), CutoffPolicy::default()).await;

    let err = result.err().expect("startup should fail");
    assert!(err.to_string().contains("/missing/hawaii.sqlite"));
}

#[tokio::test]
async fn missing_table_fails_startup() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_measurement_table()
        .times(1)
        .returning(|| Ok(mock_measurements()));
    climate_data
        .expect_station_table()
        .times(1)
        .returning(|| Err(db::Error::MissingTable(String::from("station"))));

    let result = build_app_state(Arc::new(climate_data), CutoffPolicy::default()).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn row_arity_mismatch_fails_startup() {
    let mut measurements = mock_measurements();
    measurements.rows.push(vec![SqlValue::Text(String::from("USC00519397"))]);

    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_measurement_table()
        .times(1)
        .returning(move || Ok(measurements.clone()));
    climate_data
        .expect_station_table()
        .times(1)
        .returning(|| Ok(mock_stations()));

    let result = build_app_state(Arc::new(climate_data), CutoffPolicy::default()).await;

    let err = result.err().expect("startup should fail");
    assert!(err.to_string().contains("has 1 values but 4 columns"));
}

#[tokio::test]
async fn state_holds_joined_tables() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_measurement_table()
        .times(1)
        .returning(|| Ok(mock_measurements()));
    climate_data
        .expect_station_table()
        .times(1)
        .returning(|| Ok(mock_stations()));

    let state = build_app_state(Arc::new(climate_data), CutoffPolicy::default())
        .await
        .unwrap();

    assert_eq!(state.tables.measurements.len(), 8);
    assert_eq!(state.tables.stations.len(), 3);
    // the USC00511918 row has no station record
    assert_eq!(state.tables.joined.len(), 7);
    assert_eq!(state.tables.latest_date.as_deref(), Some("2017-08-23"));
}
