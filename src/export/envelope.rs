//! Cache-stamped export envelope

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// `{ created, cache_until, data }` with epoch-millisecond stamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub created: i64,
    pub cache_until: i64,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap `data`, valid from `now` for `ttl`
    pub fn stamp(data: T, now: DateTime<Utc>, ttl: Duration) -> Self {
        let created = now.timestamp_millis();
        Self {
            created,
            cache_until: created + ttl.num_milliseconds(),
            data,
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.cache_until - self.created
    }
}
