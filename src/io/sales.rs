//! Import of historical daily sales used to fit station demand.
//!
//! Exports carry one row per day with a `ZDATE` and a `ZTOTAL` column,
//! sometimes under a one-line title row. Totals may use `,` as a
//! thousands separator.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{Result, SimError};

const DATE_COLUMN: &str = "ZDATE";
const TOTAL_COLUMN: &str = "ZTOTAL";

/// Leading rows searched for the header.
const HEADER_SEARCH_ROWS: usize = 2;

// Slashed dates are month-first, matching the sales exports' locale.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"];

/// Reads dated daily totals from a sales CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or no header with both
/// `ZDATE` and `ZTOTAL` appears in the first rows.
pub fn read_daily_totals(path: &Path) -> Result<Vec<(NaiveDate, f64)>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let totals = collect_daily_totals(reader)?;
    debug!(path = %path.display(), days = totals.len(), "sales history loaded");
    Ok(totals)
}

/// Same as [`read_daily_totals`] for an in-memory or streamed source.
///
/// # Errors
///
/// Returns an error on malformed CSV or a missing header.
pub fn parse_daily_totals(source: impl Read) -> Result<Vec<(NaiveDate, f64)>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    collect_daily_totals(reader)
}

fn collect_daily_totals<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<(NaiveDate, f64)>> {
    let mut records = reader.records();

    let mut columns = None;
    for _ in 0..HEADER_SEARCH_ROWS {
        let Some(row) = records.next() else { break };
        let row = row?;
        let find = |name: &str| row.iter().position(|f| f.trim().eq_ignore_ascii_case(name));
        if let (Some(date), Some(total)) = (find(DATE_COLUMN), find(TOTAL_COLUMN)) {
            columns = Some((date, total));
            break;
        }
    }
    let (date_col, total_col) = columns.ok_or_else(|| {
        SimError::InvalidProfile(format!(
            "sales file has no {DATE_COLUMN}/{TOTAL_COLUMN} header"
        ))
    })?;

    let mut totals = Vec::new();
    let mut skipped = 0usize;
    for row in records {
        let row = row?;
        let parsed = row
            .get(date_col)
            .and_then(parse_date)
            .zip(row.get(total_col).and_then(parse_total));
        match parsed {
            Some(day) => totals.push(day),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "sales rows without a usable date or total were dropped");
    }
    Ok(totals)
}

/// Parses a date, ignoring any time-of-day suffix.
fn parse_date(field: &str) -> Option<NaiveDate> {
    let date = field.trim().split([' ', 'T']).next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
}

/// Parses a total, stripping thousands separators.
fn parse_total(field: &str) -> Option<f64> {
    let cleaned: String = field.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
