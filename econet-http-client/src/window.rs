//! Calendar-relative time window computation
//!
//! The Econet24 history endpoint takes an explicit from/to timestamp pair.
//! Every function here derives such a pair from a caller-supplied "now", so
//! the arithmetic stays deterministic and testable; the client methods pass
//! the real wall clock.

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime, Weekday};

/// Timestamp format expected by the Econet24 service (local time, literal Z)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// An explicit start/end timestamp pair bounding a telemetry query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start of the window
    pub start: NaiveDateTime,
    /// Inclusive end of the window
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Create a window from an explicit timestamp pair
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Format the start timestamp as a `fromDate` query parameter
    pub fn from_date_param(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Format the end timestamp as a `toDate` query parameter
    pub fn to_date_param(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Last representable instant of a day at microsecond precision
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
        .expect("23:59:59.999999 is a valid time of day")
}

/// Midnight of `now`'s day through `now` itself
pub fn today(now: NaiveDateTime) -> TimeWindow {
    TimeWindow::new(now.date().and_time(NaiveTime::MIN), now)
}

/// The full previous calendar day
pub fn yesterday(now: NaiveDateTime) -> TimeWindow {
    let day = now.date() - Days::new(1);
    TimeWindow::new(day.and_time(NaiveTime::MIN), day.and_time(end_of_day()))
}

/// Monday of the current ISO week through `now`
pub fn this_week(now: NaiveDateTime) -> TimeWindow {
    let monday = now.date().week(Weekday::Mon).first_day();
    TimeWindow::new(monday.and_time(NaiveTime::MIN), now)
}

/// The full previous ISO week, Monday through Sunday
pub fn prev_week(now: NaiveDateTime) -> TimeWindow {
    let monday = now.date().week(Weekday::Mon).first_day() - Days::new(7);
    let sunday = monday + Days::new(6);
    TimeWindow::new(monday.and_time(NaiveTime::MIN), sunday.and_time(end_of_day()))
}

/// The 1st of the current month through `now`
pub fn this_month(now: NaiveDateTime) -> TimeWindow {
    let first = now
        .date()
        .with_day(1)
        .expect("the 1st exists in every month");
    TimeWindow::new(first.and_time(NaiveTime::MIN), now)
}

/// The full previous calendar month
pub fn prev_month(now: NaiveDateTime) -> TimeWindow {
    let last = now
        .date()
        .with_day(1)
        .expect("the 1st exists in every month")
        - Days::new(1);
    let first = last.with_day(1).expect("the 1st exists in every month");
    TimeWindow::new(first.and_time(NaiveTime::MIN), last.and_time(end_of_day()))
}
