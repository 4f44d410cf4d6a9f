//! Calendar features derived from an event timestamp.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::station::profile::{HOURS_PER_DAY, is_weekend_day};

/// Calendar fields attached to every emitted record and feature row.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use station_flow_sim::sim::calendar::CalendarFeatures;
///
/// // 2025-03-10 is a Monday
/// let ts = NaiveDate::from_ymd_opt(2025, 3, 10)
///     .unwrap()
///     .and_hms_opt(14, 30, 0)
///     .unwrap();
/// let cal = CalendarFeatures::from_timestamp(ts);
/// assert_eq!((cal.hour, cal.minute, cal.day_of_week), (14, 30, 0));
/// assert!(!cal.is_weekend);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarFeatures {
    pub hour: u32,
    pub minute: u32,
    /// Monday = 0 through Sunday = 6.
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub sin_hour: f64,
    pub cos_hour: f64,
}

impl CalendarFeatures {
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        let hour = timestamp.hour();
        let weekday = timestamp.weekday();
        let (sin_hour, cos_hour) = cyclic_hour(hour);
        Self {
            hour,
            minute: timestamp.minute(),
            day_of_week: weekday.num_days_from_monday(),
            is_weekend: is_weekend_day(weekday),
            sin_hour,
            cos_hour,
        }
    }
}

/// `(sin, cos)` of the hour's angle on a 24-hour circle.
pub fn cyclic_hour(hour: u32) -> (f64, f64) {
    let angle = 2.0 * PI * f64::from(hour) / HOURS_PER_DAY as f64;
    angle.sin_cos()
}
