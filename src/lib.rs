//! Tier Cutoffs - league leaderboard snapshotter
//!
//! This crate sweeps a paginated league leaderboard, derives percentile
//! tier thresholds from the full population, and exports cache-stamped
//! JSON and CSV artifacts.

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod leaderboard;
pub mod service;
pub mod snapshot;
pub mod thresholds;
pub mod types;

// Re-export commonly used types and traits
pub use error::{LeaderboardError, Result};
pub use types::*;

// Re-export key components
pub use fetch::{Cursor, HttpPageSource, PageSource, Paginator};
pub use leaderboard::Leaderboard;
pub use service::Pipeline;
pub use thresholds::compute_thresholds;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
