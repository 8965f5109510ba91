//! Expiry encoding.
//!
//! Expiries are stored as fractional Julian day numbers computed by SQLite's
//! `julianday()` from an ISO-8601 string. The string is always UTC with
//! millisecond precision, which is the finest resolution `julianday('now')`
//! offers, so stored expiries and the database clock compare consistently.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::error::{Result, StoreError};

/// `strftime` layout understood by SQLite date functions.
const JULIAN_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Renders `expiry` as the text argument for `julianday(?)`.
///
/// SQLite only handles years 0000 through 9999; anything else would make
/// `julianday()` return NULL, so it is rejected up front.
pub fn julian_input<Tz: TimeZone>(expiry: &DateTime<Tz>) -> Result<String> {
    let utc = expiry.with_timezone(&Utc);

    if !(0..=9999).contains(&utc.year()) {
        return Err(StoreError::InvalidExpiry(utc));
    }

    Ok(utc.format(JULIAN_INPUT_FORMAT).to_string())
}
