//! Error types for the leaderboard snapshotter
//!
//! Domain failures are modelled with thiserror and carried across module
//! boundaries as anyhow errors.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Failures specific to fetching, reducing and persisting the leaderboard
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("Got {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("They are not okay with that: {error}")]
    ApiRejected { error: String },

    #[error("Request to leaderboard API failed: {message}")]
    RequestFailed { message: String },

    #[error("Cannot compute thresholds for an empty leaderboard")]
    EmptyLeaderboard,

    #[error("Tier '{tier}' resolves to index {index}, outside a leaderboard of {len} entries")]
    IndexOutOfRange { tier: String, index: i64, len: usize },

    #[error("Tier '{tier}' has no entry with rd <= {max_rd} at or above index {raw_index}")]
    NoSettledEntry {
        tier: String,
        raw_index: usize,
        max_rd: f64,
    },

    #[error("Malformed snapshot at line {line}: {reason}")]
    MalformedSnapshot { line: usize, reason: String },
}
