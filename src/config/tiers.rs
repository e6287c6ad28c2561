//! Tier threshold table configuration

use serde::{Deserialize, Serialize};

/// Named percentile cut point, 0 is the top of the population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCut {
    pub name: String,
    pub fraction: f64,
}

impl TierCut {
    pub fn new(name: impl Into<String>, fraction: f64) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }
}

/// What to do when a tier index would fall before the first entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkbackBound {
    /// Stop at index 0 and log a warning
    #[default]
    Clamp,
    /// Abort the reduction with an error
    Fail,
}

/// Tier cut points passed into the threshold reducer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    /// Tier always read from index 0, exempt from the rd walk-back
    pub top_tier: String,
    /// Entries with rd above this are skipped for glicko/gxe
    pub max_rd: f64,
    #[serde(default)]
    pub bound: WalkbackBound,
    pub cuts: Vec<TierCut>,
}

const DEFAULT_CUTS: &[(&str, f64)] = &[
    ("top1", 0.0),
    ("x+", 0.002),
    ("x", 0.01),
    ("u", 0.05),
    ("ss", 0.11),
    ("s+", 0.17),
    ("s", 0.23),
    ("s-", 0.3),
    ("a+", 0.38),
    ("a", 0.46),
    ("a-", 0.54),
    ("b+", 0.62),
    ("b", 0.7),
    ("b-", 0.78),
    ("c+", 0.84),
    ("c", 0.9),
    ("c-", 0.95),
    ("d+", 0.975),
    ("d", 1.0),
];

impl Default for TierTable {
    fn default() -> Self {
        Self {
            top_tier: "top1".to_string(),
            max_rd: 65.0,
            bound: WalkbackBound::Clamp,
            cuts: DEFAULT_CUTS
                .iter()
                .map(|(name, fraction)| TierCut::new(*name, *fraction))
                .collect(),
        }
    }
}

impl TierTable {
    /// Build a table from cut points with the default top tier and rd bound
    pub fn with_cuts(cuts: Vec<TierCut>) -> Self {
        Self {
            cuts,
            ..Self::default()
        }
    }

    pub fn is_top_tier(&self, name: &str) -> bool {
        self.top_tier == name
    }

    pub fn fraction(&self, name: &str) -> Option<f64> {
        self.cuts
            .iter()
            .find(|cut| cut.name == name)
            .map(|cut| cut.fraction)
    }
}
