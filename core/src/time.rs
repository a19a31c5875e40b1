//! Time related utils.
//!
//! SigV4 only ever needs two renderings of the signing instant: the full
//! ISO-8601 basic form used by `x-amz-date` and the string-to-sign, and the
//! date-only form used by the credential scope. Callers always supply the
//! instant; nothing here reads the system clock.

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;

use crate::Error;
use crate::Result;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO8601 basic form: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse an ISO8601 basic timestamp like `20220313T072004Z`.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    let t = NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ")?;
    Ok(t.and_utc())
}

/// Parse a date stamp like `20220313` into midnight UTC of that day.
pub fn parse_date(s: &str) -> Result<DateTime> {
    let d = NaiveDate::parse_from_str(s, "%Y%m%d")?;
    d.and_hms_opt(0, 0, 0)
        .map(|v| v.and_utc())
        .ok_or_else(|| Error::malformed_request(format!("date {s} is out of range")))
}
