//! Common types used throughout the snapshotter

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// One player's ranked record as returned by the league endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub username: String,
    pub league: LeagueRecord,
    /// Fields we do not read but still persist verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nested rating record of an entry
///
/// `tr`, `gxe` and the per-game metrics may be missing or `null`; both read
/// as `None` and are written back as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRecord {
    #[serde(default)]
    pub tr: Option<f64>,
    pub rank: String,
    pub glicko: f64,
    /// Rating deviation, lower is more settled
    pub rd: f64,
    #[serde(default)]
    pub gxe: Option<f64>,
    #[serde(default)]
    pub apm: Option<f64>,
    #[serde(default)]
    pub pps: Option<f64>,
    #[serde(default)]
    pub vs: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// Build an entry with no auxiliary fields
    pub fn new(username: impl Into<String>, league: LeagueRecord) -> Self {
        Self {
            username: username.into(),
            league,
            extra: Map::new(),
        }
    }
}

impl LeagueRecord {
    pub fn new(tr: f64, rank: impl Into<String>, glicko: f64, rd: f64) -> Self {
        Self {
            tr: Some(tr),
            rank: rank.into(),
            glicko,
            rd,
            gxe: None,
            apm: None,
            pps: None,
            vs: None,
            extra: Map::new(),
        }
    }
}

/// Body of a league page response
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<PageData>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    pub entries: Vec<Entry>,
}

/// Values published for a single tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRecord {
    pub tr: Option<f64>,
    pub glicko: f64,
    pub gxe: Option<f64>,
}

/// A computed tier with the indices it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct TierThreshold {
    pub tier: String,
    /// Exact percentile cut position, source of `tr`
    pub raw_index: usize,
    /// Position after the rd walk-back, source of `glicko` and `gxe`
    pub adjusted_index: usize,
    pub record: ThresholdRecord,
}

/// Thresholds for every tier, kept in tier-table order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdResult {
    tiers: Vec<TierThreshold>,
}

impl ThresholdResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tier: TierThreshold) {
        self.tiers.push(tier);
    }

    pub fn get(&self, tier: &str) -> Option<&TierThreshold> {
        self.tiers.iter().find(|t| t.tier == tier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TierThreshold> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl Serialize for ThresholdResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tiers.len()))?;
        for tier in &self.tiers {
            map.serialize_entry(&tier.tier, &tier.record)?;
        }
        map.end()
    }
}
