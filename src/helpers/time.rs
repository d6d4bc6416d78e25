use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Current unix time in seconds, with sub-second precision.
pub fn now_f64() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

pub fn get_instant() -> Instant {
    Instant::now()
}

/// Renders a unix timestamp for log output; falls back to the raw number
/// when it is out of chrono's range.
pub fn format_unix_ts(ts: f64) -> String {
    DateTime::from_timestamp(ts.trunc() as i64, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}
