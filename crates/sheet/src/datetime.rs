//! Excel serial date conversion

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Largest serial Excel can display (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

fn excel_epoch() -> Option<NaiveDateTime> {
    // Day zero of the 1900 date system once the phantom 1900-02-29 is
    // accounted for; serials >= 61 line up with the real calendar.
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// Convert an Excel serial date (days since 1899-12-30, fraction = time of
/// day) into a wall-clock datetime.
#[must_use]
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let seconds = (serial * SECONDS_PER_DAY).round() as i64;
    excel_epoch()?.checked_add_signed(Duration::seconds(seconds))
}

/// Convert a wall-clock datetime into an Excel serial date
#[must_use]
pub fn datetime_to_excel_serial(dt: NaiveDateTime) -> Option<f64> {
    let delta = dt.signed_duration_since(excel_epoch()?);
    Some(delta.num_seconds() as f64 / SECONDS_PER_DAY)
}
