//! Period windows derived from a reference instant.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

/// A closed time interval; both endpoints are part of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Window from the first day 00:00:00 of `now`'s month through `now`.
pub fn month_to_date(now: NaiveDateTime) -> Option<Window> {
    let start = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)?.and_hms_opt(0, 0, 0)?;
    Some(Window { start, end: now })
}

/// Window of `months` calendar months ending at `reference`.
///
/// Calendar subtraction clamps the day when the earlier month is shorter,
/// e.g. May 31 minus three months lands on February 28/29.
pub fn trailing_months(reference: NaiveDateTime, months: u32) -> Option<Window> {
    let start = reference.checked_sub_months(Months::new(months))?;
    Some(Window {
        start,
        end: reference,
    })
}

/// Whether `instant` falls inside the calendar month `(year, month)`.
pub fn in_month(instant: NaiveDateTime, year: i32, month: u32) -> bool {
    instant.year() == year && instant.month() == month
}

/// Grouping label for the calendar month of `instant`, e.g. `"2023-10"`.
pub fn month_label(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m").to_string()
}
