use std::io::Write;

use chrono::{Datelike, NaiveDate, TimeDelta};

use station_flow_sim::config::ScenarioConfig;
use station_flow_sim::io::sales::read_daily_totals;
use station_flow_sim::scenario::Scenario;
use station_flow_sim::station::DailyStats;

/// Four weeks of history: 3,000 kg on weekdays, 2,400 kg on weekends.
fn write_history(file: &mut impl Write) {
    writeln!(file, "Station 1000000471 daily totals,,").unwrap();
    writeln!(file, "ZDATE,ZTOTAL,CURRENCY").unwrap();
    let first = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    for offset in 0..28 {
        let day = first + TimeDelta::days(offset);
        let total = if day.weekday().number_from_monday() >= 6 {
            "\"2,400\""
        } else {
            "\"3,000\""
        };
        writeln!(file, "{},{total},NGN", day.format("%Y-%m-%d")).unwrap();
    }
}

#[test]
fn daily_stats_fitted_from_sales_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write_history(&mut file);

    let totals = read_daily_totals(file.path()).unwrap();
    assert_eq!(totals.len(), 28);

    let stats = DailyStats::from_daily_totals(&totals, 1.0).unwrap();
    let expected_mean = (20.0 * 3000.0 + 8.0 * 2400.0) / 28.0;
    assert!((stats.mean_daily - expected_mean).abs() < 1e-9);
    assert!((stats.weekend_multiplier - 0.8).abs() < 1e-12);
    assert!(stats.std_daily > 0.0);
}

#[test]
fn scenario_station_reads_sales_csv() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write_history(&mut file);

    let mut cfg = ScenarioConfig::fitted();
    cfg.simulation.days = 1;
    cfg.stations[0].daily_stats = None;
    cfg.stations[0].sales_csv = Some(file.path().to_path_buf());
    assert!(cfg.validate().is_empty());

    let Scenario {
        mut registry,
        batch,
    } = Scenario::build(&cfg).unwrap();
    let records = batch.run_all(&mut registry);
    assert_eq!(records.len(), 3 * 1440);
}
