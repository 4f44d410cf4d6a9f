//! CSV export for generated event and trip datasets.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::EventRecord;
use crate::transit::TripRecord;

/// Column header for station event export.
pub const EVENT_HEADER: &str = "timestamp,station_id,flow_kg_min,consumed_kg,stock_kg,\
                                is_refill,interval_sec,hour,minute,day_of_week,\
                                is_weekend,sin_hour,cos_hour";

/// Column header for transit trip export.
pub const TRIP_HEADER: &str = "trip_id,route_id,start_time,day_of_week,hour_of_day,\
                               is_weekend,is_peak_hour,is_holiday,construction_active,\
                               base_time_min,transit_time_min";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exports event records to a CSV file at the given path.
///
/// Rows keep the order of `records`. Boolean columns are written as `0`/`1`.
///
/// # Arguments
///
/// * `records` - Generated event records
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_events_csv(records: &[EventRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_events_csv(records, io::BufWriter::new(file))
}

/// Writes event records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_events_csv(records: &[EventRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(EVENT_HEADER.split(',').map(str::trim))?;

    for r in records {
        let cal = &r.calendar;
        wtr.write_record(&[
            r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            r.station_id.clone(),
            format!("{:.4}", r.flow_kg_min),
            format!("{:.4}", r.consumed_kg),
            format!("{:.4}", r.stock_kg),
            flag(r.is_refill),
            r.interval_secs.to_string(),
            cal.hour.to_string(),
            cal.minute.to_string(),
            cal.day_of_week.to_string(),
            flag(cal.is_weekend),
            format!("{:.6}", cal.sin_hour),
            format!("{:.6}", cal.cos_hour),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports transit trips to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_trips_csv(trips: &[TripRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_trips_csv(trips, io::BufWriter::new(file))
}

/// Writes transit trips as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_trips_csv(trips: &[TripRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(TRIP_HEADER.split(',').map(str::trim))?;

    for t in trips {
        wtr.write_record(&[
            t.trip_id.clone(),
            t.route_id.clone(),
            t.start_time.format(TIMESTAMP_FORMAT).to_string(),
            t.day_of_week.to_string(),
            t.hour_of_day.to_string(),
            flag(t.is_weekend),
            flag(t.is_peak_hour),
            flag(t.is_holiday),
            flag(t.construction_active),
            format!("{:.1}", t.base_time_min),
            format!("{:.1}", t.transit_time_min),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn flag(value: bool) -> String {
    u8::from(value).to_string()
}
