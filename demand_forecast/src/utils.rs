//! Utility functions for the demand_forecast crate

use chrono::{Days, NaiveDate};

/// Lenient calendar-date parsing for user-supplied date columns
pub mod date_parser {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    /// Date-only layouts, tried in order. Slash dates with the year last are
    /// read month first.
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

    /// Date-time layouts; only the calendar date is kept
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    /// Parse a single cell into a calendar date.
    ///
    /// Returns `None` for empty cells and for anything no known layout accepts.
    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Some(date);
            }
        }

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
                return Some(datetime.date());
            }
        }

        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|datetime| datetime.date_naive())
    }
}

/// Calendar dates of the `horizon` days following `last`
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as u64)
        .filter_map(|offset| last.checked_add_days(Days::new(offset)))
        .collect()
}

/// Number of calendar days from `start` to `end`, both included
pub fn inclusive_day_span(start: NaiveDate, end: NaiveDate) -> usize {
    let days = (end - start).num_days();
    if days < 0 {
        0
    } else {
        days as usize + 1
    }
}
