//! Configuration management for the snapshotter
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and the default tier table.

pub mod app;
pub mod tiers;

// Re-export commonly used types
pub use app::{validate_config, ApiSettings, AppConfig, OutputSettings, ServiceSettings};
pub use tiers::{TierCut, TierTable, WalkbackBound};
