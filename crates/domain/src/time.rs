//! Timestamps.

use chrono::{DateTime, Utc};

/// UTC timestamp attached to press events and cache entries.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
