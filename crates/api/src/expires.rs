//! Parsing of the cookie-style expiry timestamps handed out by the service.
use chrono::{DateTime, NaiveDateTime, Utc};

/// Layout of expiry timestamps, e.g. `Tue, 21-Oct-2025 09:30:00 GMT`.
///
/// The zone abbreviation is skipped when parsing; the service always sends GMT.
pub const EXPIRES_FORMAT: &str = "%a, %d-%b-%Y %H:%M:%S %Z";

pub fn parse_expires(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), EXPIRES_FORMAT).map(|t| t.and_utc())
}

pub fn format_expires(t: &DateTime<Utc>) -> String {
    t.format("%a, %d-%b-%Y %H:%M:%S GMT").to_string()
}
