mod common;

use std::f64::consts::PI;

use station_flow_sim::SimError;
use station_flow_sim::features::{
    LAG_WINDOW, build_feature_row, chronological_split, parse_timestamp,
};
use station_flow_sim::sim::batch::BatchGenerator;
use station_flow_sim::sim::clock::StepInterval;

use common::{dispenser, start};

#[test]
fn history_must_hold_exactly_one_lag_window() {
    let ts = parse_timestamp("2025-03-10T14:30:00").unwrap();
    for len in [119, 121] {
        let history = vec![1.0; len];
        assert!(matches!(
            build_feature_row(ts, &history, false),
            Err(SimError::InvalidHistoryLength { .. })
        ));
    }
}

#[test]
fn monday_afternoon_feature_row() {
    let ts = parse_timestamp("2025-03-10T14:30:00").unwrap();
    let history: Vec<f64> = (1..=LAG_WINDOW).map(|i| i as f64).collect();
    let row = build_feature_row(ts, &history, false).unwrap();

    assert_eq!(row.get("hour"), Some(14.0));
    assert_eq!(row.get("day_of_week"), Some(0.0));
    assert_eq!(row.get("is_weekend"), Some(0.0));
    let angle = 2.0 * PI * 14.0 / 24.0;
    assert!((row.get("sin_hour").unwrap() - angle.sin()).abs() < 1e-12);
    assert!((row.get("cos_hour").unwrap() - angle.cos()).abs() < 1e-12);
    assert_eq!(row.get("flow_t-1"), Some(120.0));
    assert_eq!(row.get("flow_t-120"), Some(1.0));
    // position, not name, is the contract
    assert_eq!(row.values[5], 120.0);
}

#[test]
fn features_from_generated_history() {
    let records = BatchGenerator::new(start(), 1)
        .run(&mut dispenser("DBS_01", 8, StepInterval::FixedMinute));
    let window = &records[..=LAG_WINDOW];
    let (history, target) = window.split_at(LAG_WINDOW);
    let flows: Vec<f64> = history.iter().map(|r| r.flow_kg_min).collect();

    let row = build_feature_row(target[0].timestamp, &flows, true).unwrap();
    assert_eq!(row.get("flow_t-1"), Some(history[LAG_WINDOW - 1].flow_kg_min));
    assert_eq!(row.get("hour"), Some(f64::from(target[0].calendar.hour)));
    assert_eq!(row.get("minute"), Some(f64::from(target[0].calendar.minute)));
}

#[test]
fn split_never_leaks_future_rows() {
    let records = BatchGenerator::new(start(), 1)
        .run(&mut dispenser("DBS_01", 4, StepInterval::IRREGULAR_DEFAULT));
    let (train, test) = chronological_split(&records, 0.8);

    assert_eq!(train.len() + test.len(), records.len());
    assert_eq!(train.len(), (records.len() as f64 * 0.8).floor() as usize);
    let last_train = train.last().map(|r| r.timestamp).unwrap();
    assert!(test.iter().all(|r| r.timestamp > last_train));
}
