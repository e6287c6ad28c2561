//! Main application configuration
//!
//! This module defines the configuration structures for the snapshotter,
//! including TOML and environment variable loading and validation.

use crate::config::tiers::TierTable;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub tiers: TierTable,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Leaderboard API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// League leaderboard endpoint
    pub endpoint: String,
    /// Entries requested per page
    pub page_limit: u32,
    /// Pause between consecutive page requests in milliseconds
    pub page_delay_ms: u64,
    /// Static X-Session-ID header
    pub session_id: String,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
}

/// Artifact destinations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub leaderboard_json: String,
    pub thresholds_json: String,
    pub leaderboard_csv: String,
    /// Cache horizon stamped into the JSON envelopes
    pub cache_ttl_ms: i64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://ch.tetr.io/api/users/by/league".to_string(),
            page_limit: 100,
            page_delay_ms: 1750,
            session_id: "Creamy Kagarin".to_string(),
            user_agent: "beanserver blaster but with usernames lmao".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            leaderboard_json: "leaderboard.json".to_string(),
            thresholds_json: "thresholds.json".to_string(),
            leaderboard_csv: "leaderboard.csv".to_string(),
            cache_ttl_ms: 3_600_000, // 1 hour
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        if let Ok(endpoint) = env::var("LEADERBOARD_ENDPOINT") {
            self.api.endpoint = endpoint;
        }
        if let Ok(limit) = env::var("LEADERBOARD_PAGE_LIMIT") {
            self.api.page_limit = limit
                .parse()
                .map_err(|_| anyhow!("Invalid LEADERBOARD_PAGE_LIMIT value: {}", limit))?;
        }
        if let Ok(delay) = env::var("LEADERBOARD_PAGE_DELAY_MS") {
            self.api.page_delay_ms = delay
                .parse()
                .map_err(|_| anyhow!("Invalid LEADERBOARD_PAGE_DELAY_MS value: {}", delay))?;
        }
        if let Ok(session_id) = env::var("LEADERBOARD_SESSION_ID") {
            self.api.session_id = session_id;
        }
        if let Ok(user_agent) = env::var("LEADERBOARD_USER_AGENT") {
            self.api.user_agent = user_agent;
        }
        if let Ok(timeout) = env::var("LEADERBOARD_REQUEST_TIMEOUT_SECONDS") {
            self.api.request_timeout_seconds = timeout.parse().map_err(|_| {
                anyhow!(
                    "Invalid LEADERBOARD_REQUEST_TIMEOUT_SECONDS value: {}",
                    timeout
                )
            })?;
        }

        if let Ok(dir) = env::var("OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        if let Ok(ttl) = env::var("CACHE_TTL_MS") {
            self.output.cache_ttl_ms = ttl
                .parse()
                .map_err(|_| anyhow!("Invalid CACHE_TTL_MS value: {}", ttl))?;
        }

        Ok(())
    }

    /// Get the inter-page delay as Duration
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.api.page_delay_ms)
    }

    /// Get the HTTP request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.api.endpoint.is_empty() {
        return Err(anyhow!("Leaderboard endpoint cannot be empty"));
    }
    if config.api.page_limit == 0 {
        return Err(anyhow!("Page limit must be greater than 0"));
    }
    if config.api.request_timeout_seconds == 0 {
        return Err(anyhow!("Request timeout must be greater than 0"));
    }

    if config.output.cache_ttl_ms <= 0 {
        return Err(anyhow!("Cache TTL must be positive"));
    }
    for name in [
        &config.output.leaderboard_json,
        &config.output.thresholds_json,
        &config.output.leaderboard_csv,
    ] {
        if name.is_empty() {
            return Err(anyhow!("Output file names cannot be empty"));
        }
    }

    let tiers = &config.tiers;
    if tiers.cuts.is_empty() {
        return Err(anyhow!("Tier table cannot be empty"));
    }
    if tiers.max_rd <= 0.0 {
        return Err(anyhow!("Max rd must be positive"));
    }
    let mut seen = HashSet::new();
    for cut in &tiers.cuts {
        if !(0.0..=1.0).contains(&cut.fraction) {
            return Err(anyhow!(
                "Tier '{}' fraction {} is outside [0, 1]",
                cut.name,
                cut.fraction
            ));
        }
        if !seen.insert(cut.name.as_str()) {
            return Err(anyhow!("Duplicate tier name: {}", cut.name));
        }
    }
    match tiers.fraction(&tiers.top_tier) {
        None => {
            return Err(anyhow!(
                "Top tier '{}' is not in the tier table",
                tiers.top_tier
            ))
        }
        Some(fraction) if fraction != 0.0 => {
            warn!(
                "Top tier '{}' has fraction {}, it is still read from index 0",
                tiers.top_tier, fraction
            );
        }
        Some(_) => {}
    }

    Ok(())
}
