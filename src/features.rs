//! Model-input feature rows built from a lag window of recent flows.
//!
//! The scoring service indexes columns by position, so the order produced
//! here is fixed:
//!
//! ```text
//! hour, day_of_week, is_weekend, sin_hour, cos_hour, flow_t-1 … flow_t-120[, minute]
//! ```

use chrono::NaiveDateTime;

use crate::error::{Result, SimError};
use crate::sim::calendar::CalendarFeatures;
use crate::sim::types::EventRecord;

/// Number of past flow values in a lag window.
pub const LAG_WINDOW: usize = 120;

const CALENDAR_COLUMNS: [&str; 5] = ["hour", "day_of_week", "is_weekend", "sin_hour", "cos_hour"];

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// One model-input row with its column names.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureRow {
    /// Value for a named column.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}

/// Column names in model order.
pub fn feature_columns(include_minute: bool) -> Vec<String> {
    let mut columns: Vec<String> = CALENDAR_COLUMNS.iter().map(ToString::to_string).collect();
    columns.extend((1..=LAG_WINDOW).map(|lag| format!("flow_t-{lag}")));
    if include_minute {
        columns.push("minute".to_string());
    }
    columns
}

/// Builds one feature row.
///
/// # Arguments
///
/// * `timestamp` - Time the prediction is for
/// * `history` - Exactly [`LAG_WINDOW`] flows, oldest first; the last
///   element becomes `flow_t-1`
/// * `include_minute` - Append the `minute` column at the end
///
/// # Errors
///
/// Returns [`SimError::InvalidHistoryLength`] unless `history` holds exactly
/// [`LAG_WINDOW`] values.
pub fn build_feature_row(
    timestamp: NaiveDateTime,
    history: &[f64],
    include_minute: bool,
) -> Result<FeatureRow> {
    if history.len() != LAG_WINDOW {
        return Err(SimError::InvalidHistoryLength {
            expected: LAG_WINDOW,
            actual: history.len(),
        });
    }

    let cal = CalendarFeatures::from_timestamp(timestamp);
    let mut values = Vec::with_capacity(CALENDAR_COLUMNS.len() + LAG_WINDOW + 1);
    values.extend([
        f64::from(cal.hour),
        f64::from(cal.day_of_week),
        f64::from(u8::from(cal.is_weekend)),
        cal.sin_hour,
        cal.cos_hour,
    ]);
    values.extend(history.iter().rev());
    if include_minute {
        values.push(f64::from(cal.minute));
    }

    Ok(FeatureRow {
        columns: feature_columns(include_minute),
        values,
    })
}

/// Parses `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// Returns [`SimError::InvalidTimestamp`] if neither format matches.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| SimError::InvalidTimestamp(s.to_string()))
}

/// Splits chronologically ordered records into train and test sets.
///
/// The first `floor(len * train_fraction)` records train; nothing is
/// shuffled, so no test record precedes a training record.
pub fn chronological_split(
    records: &[EventRecord],
    train_fraction: f64,
) -> (&[EventRecord], &[EventRecord]) {
    let fraction = train_fraction.clamp(0.0, 1.0);
    let cut = ((records.len() as f64) * fraction).floor() as usize;
    records.split_at(cut.min(records.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn history() -> Vec<f64> {
        (0..LAG_WINDOW).map(|i| i as f64 * 0.5).collect()
    }

    #[test]
    fn wrong_history_length_is_rejected() {
        let ts = parse_timestamp("2025-03-10T14:30:00").unwrap();
        for len in [0, 119, 121] {
            let err = build_feature_row(ts, &vec![1.0; len], false).unwrap_err();
            assert!(
                matches!(err, SimError::InvalidHistoryLength { expected: 120, actual } if actual == len)
            );
        }
    }

    #[test]
    fn monday_afternoon_row() {
        let ts = parse_timestamp("2025-03-10T14:30:00").unwrap();
        let h = history();
        let row = build_feature_row(ts, &h, false).unwrap();

        assert_eq!(row.values.len(), 125);
        assert_eq!(row.get("hour"), Some(14.0));
        assert_eq!(row.get("day_of_week"), Some(0.0));
        assert_eq!(row.get("is_weekend"), Some(0.0));
        let sin = row.get("sin_hour").unwrap();
        let cos = row.get("cos_hour").unwrap();
        assert!((sin - (2.0 * PI * 14.0 / 24.0).sin()).abs() < 1e-12);
        assert!((cos - (2.0 * PI * 14.0 / 24.0).cos()).abs() < 1e-12);
        assert_eq!(row.get("flow_t-1"), h.last().copied());
        assert_eq!(row.get("flow_t-120"), h.first().copied());
        assert_eq!(row.get("minute"), None);
    }

    #[test]
    fn minute_is_last_column() {
        let ts = parse_timestamp("2025-03-15 07:45:00").unwrap();
        let row = build_feature_row(ts, &history(), true).unwrap();
        assert_eq!(row.columns.last().map(String::as_str), Some("minute"));
        assert_eq!(row.values.last().copied(), Some(45.0));
        assert_eq!(row.get("is_weekend"), Some(1.0));
    }

    #[test]
    fn column_order_is_fixed() {
        let cols = feature_columns(false);
        assert_eq!(cols.len(), 125);
        assert_eq!(
            &cols[..6],
            ["hour", "day_of_week", "is_weekend", "sin_hour", "cos_hour", "flow_t-1"]
        );
        assert_eq!(cols[124], "flow_t-120");
    }

    #[test]
    fn bad_timestamp() {
        assert!(matches!(
            parse_timestamp("10/03/2025 14:30"),
            Err(SimError::InvalidTimestamp(_))
        ));
    }
}
