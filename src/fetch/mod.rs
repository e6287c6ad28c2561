//! Leaderboard fetching
//!
//! Page sources and the sequential pagination loop that drives them.

pub mod client;
pub mod paginator;

pub use client::{Cursor, HttpPageSource, PageSource};
pub use paginator::Paginator;
