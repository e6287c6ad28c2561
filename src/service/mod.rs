//! Service orchestration
//!
//! The pipeline that turns a leaderboard sweep into exported artifacts.

pub mod pipeline;

pub use pipeline::{Pipeline, RunSummary};
