//! Database utility functions.

use chrono::{Duration, Utc};

use crate::db::EpochMillis;

/// Current time as epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    Utc::now().timestamp_millis()
}

/// Epoch milliseconds `days` days before `now`.
pub fn days_before(now: EpochMillis, days: u32) -> EpochMillis {
    now - Duration::days(i64::from(days)).num_milliseconds()
}

/// Render epoch milliseconds as `YYYY-MM-DD HH:MM` (UTC) for display.
///
/// Out-of-range values fall back to the raw number.
pub fn format_millis(ts: EpochMillis) -> String {
    chrono::DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
