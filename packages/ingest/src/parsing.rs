//! Field parsers shared by the CSV readers.

use chrono::NaiveDate;

/// Parses a report date in `YYYYMMDD` or `YYYY-MM-DD` form.
#[must_use]
pub fn parse_report_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Parses a victim age. Accepts integral floats such as `"34.0"`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_age(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(age) = s.parse::<u32>() {
        return Some(age);
    }

    let value = s.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        return Some(value as u32);
    }
    None
}
