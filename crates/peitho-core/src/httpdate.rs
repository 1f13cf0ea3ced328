//! HTTP-date parsing and formatting (RFC 7231 §7.1.1.1).
//!
//! Formatting always produces IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
//! Parsing accepts the three forms a server is obliged to recognize:
//! IMF-fixdate, the obsolete RFC 850 format, and ANSI C `asctime`.
//! HTTP dates carry one-second resolution; comparisons elsewhere in the
//! engine truncate to seconds accordingly.

use chrono::{DateTime, NaiveDateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Formats an instant as an IMF-fixdate string.
pub fn format(instant: DateTime<Utc>) -> String {
    instant.format(IMF_FIXDATE).to_string()
}

/// Parses an HTTP-date in any of the three recognized formats.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    for fmt in [IMF_FIXDATE, RFC_850, ASCTIME] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value.trim(), fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Truncates an instant to whole seconds, the granularity of an HTTP-date.
pub fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(instant.timestamp(), 0).unwrap_or(instant)
}
