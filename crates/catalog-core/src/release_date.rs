use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::error::AppError;

/// Date-only formats accepted for `releaseDate`, tried in order.
///
/// ISO-8601 first; the month-first forms are what the catalog feeds
/// actually carry (`10-02-2007` is October 2nd).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%m/%d/%Y"];

/// Extract the calendar year from a catalog `releaseDate`.
///
/// Absent or blank dates yield `None`; a date in no supported format is a
/// [`AppError::MalformedRecord`]. Reduced-precision ISO-8601 (`2007`,
/// `2007-10`) is accepted.
pub fn release_year(raw: Option<&str>) -> Result<Option<i32>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Some(year) = reduced_precision_year(raw) {
        return Ok(Some(year));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.year()));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Some(ts.year()));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| Some(date.year()))
        .ok_or_else(|| AppError::MalformedRecord(format!("unparseable releaseDate '{raw}'")))
}

/// `YYYY` or `YYYY-MM`.
fn reduced_precision_year(raw: &str) -> Option<i32> {
    let is_year = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());

    match raw.split_once('-') {
        None if is_year(raw) => raw.parse().ok(),
        Some((year, month)) if is_year(year) && month.len() == 2 => {
            NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
                .ok()
                .map(|date| date.year())
        }
        _ => None,
    }
}
