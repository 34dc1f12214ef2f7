//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use serde::Serializer;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Get today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a timestamp as ISO-8601 with microseconds and a numeric offset
///
/// e.g. `2024-05-01T13:37:39.000000+00:00`
pub fn to_iso(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Serde adapter writing a timestamp with [`to_iso`]
pub fn serialize_iso<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_iso(timestamp))
}
