//! # Timestamp Canonicalization
//!
//! The audit ledger hashes a textual timestamp. For recomputed hashes to
//! match stored ones across storage round-trips, the rendering is frozen:
//!
//! - truncate to whole seconds (sub-second precision does not survive all
//!   storage backends),
//! - normalize to UTC,
//! - render as `%Y-%m-%dT%H:%M:%S+00:00`.
//!
//! This module is frozen for the same reason [`crate::canonical`] is:
//! changing it invalidates every existing chain.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

use crate::error::ValidationError;

/// Truncate a timestamp to whole-second precision.
pub fn truncate_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0)
        .expect("zero nanoseconds is always in range")
}

/// Current UTC time at whole-second precision.
pub fn utc_now_second() -> DateTime<Utc> {
    truncate_to_second(Utc::now())
}

/// Render a timestamp in the frozen canonical ledger form.
///
/// The offset is always written as `+00:00`, never `Z`.
pub fn canonical_ts(ts: DateTime<Utc>) -> String {
    truncate_to_second(ts)
        .format("%Y-%m-%dT%H:%M:%S+00:00")
        .to_string()
}

/// Parse a caller-supplied RFC 3339 timestamp, normalizing to UTC.
///
/// Accepts both `Z` and numeric offsets. Used to validate user input
/// (e.g. `collected_at`) before it enters the registry.
pub fn parse_ts(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidTimestamp(raw.to_string()))
}

/// Render a timestamp for display (RFC 3339, second precision, `Z` suffix).
pub fn display_ts(ts: DateTime<Utc>) -> String {
    truncate_to_second(ts).to_rfc3339_opts(SecondsFormat::Secs, true)
}
