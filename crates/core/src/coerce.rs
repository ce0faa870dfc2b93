//! Cell-level coercion.
//!
//! Every function here returns `None` instead of failing: a value that cannot
//! be converted becomes missing and the caller decides whether to count it.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use salesboard_sheet::datetime::excel_serial_to_datetime;
use salesboard_sheet::CellValue;

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// Month-first before day-first: "3/8/2019" is March 8th.
const DATE_FORMATS: [&str; 10] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%m-%d-%Y",
];

/// Coerce a cell to a timestamp.
///
/// Numbers are read as Excel serial dates; text goes through a list of
/// common layouts. Booleans never parse.
#[must_use]
pub fn parse_date(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Int(i) => excel_serial_to_datetime(*i as f64),
        CellValue::Float(f) => excel_serial_to_datetime(*f),
        CellValue::String(s) => parse_date_str(s),
        CellValue::Null | CellValue::Bool(_) => None,
    }
}

/// Parse free-form date text.
#[must_use]
pub fn parse_date_str(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    if let Some(date) = parse_short_year(text) {
        return date.and_hms_opt(0, 0, 0);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `m/d/yy`: two-digit years land in 1969..=2068.
fn parse_short_year(text: &str) -> Option<NaiveDate> {
    let (_, year) = text.rsplit_once('/')?;
    if year.len() != 2 {
        return None;
    }
    NaiveDate::parse_from_str(text, "%m/%d/%y").ok()
}

/// Coerce a cell to a number.
///
/// Booleans count as `1`/`0`; text is trimmed and parsed; `NaN` is missing.
#[must_use]
pub fn parse_number(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Null => return None,
        CellValue::Bool(b) => f64::from(u8::from(*b)),
        CellValue::Int(i) => *i as f64,
        CellValue::Float(f) => *f,
        CellValue::String(s) => s.trim().parse::<f64>().ok()?,
    };
    (!value.is_nan()).then_some(value)
}

/// Coerce a cell to a category label. Blank cells are missing.
#[must_use]
pub fn parse_label(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        None
    } else {
        Some(cell.text().into_owned())
    }
}

/// First day of the month containing `dt`.
#[must_use]
pub fn month_start(dt: NaiveDateTime) -> NaiveDate {
    let date = dt.date();
    date - Duration::days(i64::from(date.day0()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_and_us_dates() {
        let iso = parse_date(&CellValue::from("2024-01-05")).unwrap();
        assert_eq!(iso.date(), ymd(2024, 1, 5));

        let us = parse_date(&CellValue::from("3/8/2019")).unwrap();
        assert_eq!(us.date(), ymd(2019, 3, 8));

        // Not a valid month, falls back to day-first
        let eu = parse_date(&CellValue::from("25/12/2019")).unwrap();
        assert_eq!(eu.date(), ymd(2019, 12, 25));
    }

    #[test]
    fn test_dates_with_time() {
        let dt = parse_date(&CellValue::from("2019-02-14 13:08")).unwrap();
        assert_eq!(dt.to_string(), "2019-02-14 13:08:00");

        let rfc = parse_date(&CellValue::from("2019-02-14T13:08:00+07:00")).unwrap();
        assert_eq!(rfc.to_string(), "2019-02-14 13:08:00");
    }

    #[test]
    fn test_named_months_and_short_years() {
        assert_eq!(
            parse_date(&CellValue::from("Jan 27, 2019")).unwrap().date(),
            ymd(2019, 1, 27)
        );
        assert_eq!(
            parse_date(&CellValue::from("27 January 2019")).unwrap().date(),
            ymd(2019, 1, 27)
        );
        assert_eq!(
            parse_date(&CellValue::from("1/27/19")).unwrap().date(),
            ymd(2019, 1, 27)
        );
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(
            parse_date(&CellValue::Float(43466.0)).unwrap().date(),
            ymd(2019, 1, 1)
        );
        assert_eq!(
            parse_date(&CellValue::Int(43466)).unwrap().date(),
            ymd(2019, 1, 1)
        );
    }

    #[test]
    fn test_unparseable_dates_are_missing() {
        assert!(parse_date(&CellValue::from("not a date")).is_none());
        assert!(parse_date(&CellValue::from("2019-13-45")).is_none());
        assert!(parse_date(&CellValue::Bool(true)).is_none());
        assert!(parse_date(&CellValue::Null).is_none());
        assert!(parse_date(&CellValue::Float(-3.0)).is_none());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_number(&CellValue::Int(7)), Some(7.0));
        assert_eq!(parse_number(&CellValue::Float(548.9715)), Some(548.9715));
        assert_eq!(parse_number(&CellValue::from(" 80.22 ")), Some(80.22));
        assert_eq!(parse_number(&CellValue::Bool(true)), Some(1.0));
        assert_eq!(parse_number(&CellValue::from("1,000")), None);
        assert_eq!(parse_number(&CellValue::from("n/a")), None);
        assert_eq!(parse_number(&CellValue::from("NaN")), None);
        assert_eq!(parse_number(&CellValue::Float(f64::NAN)), None);
        assert_eq!(parse_number(&CellValue::Null), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            parse_label(&CellValue::from("Cash")),
            Some("Cash".to_string())
        );
        assert_eq!(parse_label(&CellValue::Int(3)), Some("3".to_string()));
        assert_eq!(parse_label(&CellValue::from("  ")), None);
        assert_eq!(parse_label(&CellValue::Null), None);
    }

    #[test]
    fn test_month_start() {
        let dt = parse_date_str("2024-02-29 18:30:00").unwrap();
        assert_eq!(month_start(dt), ymd(2024, 2, 1));

        let first = parse_date_str("2024-03-01").unwrap();
        assert_eq!(month_start(first), ymd(2024, 3, 1));
    }
}
