use chrono::{DateTime, Utc};

use study_core::model::parse_timestamp;

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// `Mon D, YYYY` for parseable backend timestamps, the raw text otherwise.
#[must_use]
pub fn format_session_date(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse_timestamp(raw).map_or_else(|| raw.trim().to_string(), format_date),
        None => "Unknown date".to_string(),
    }
}
