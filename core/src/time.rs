//! Time related utils.

use crate::{Error, Result};
use chrono::format::StrftimeItems;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Date format: "20220313"
const DATE: &str = "%Y%m%d";

/// Time format for ISO 8601 basic form: "20220313T072004Z"
const ISO8601: &str = "%Y%m%dT%H%M%SZ";

/// Create a datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: "20220301"
pub fn format_date(t: DateTime) -> String {
    t.format_with_items(StrftimeItems::new(DATE)).to_string()
}

/// Format time into ISO8601 basic form: "20220313T072004Z"
pub fn format_iso8601(t: DateTime) -> String {
    t.format_with_items(StrftimeItems::new(ISO8601)).to_string()
}

/// Parse time from RFC3339: "2022-03-13T07:20:04Z"
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::config_invalid(format!("invalid timestamp {s:?}")).with_source(e))
}
