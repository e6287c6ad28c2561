//! In-memory accumulation of the ranked population
//!
//! The leaderboard is rebuilt from scratch on every run and only ever grows
//! while pages arrive. Ordering is whatever the API returned (descending tr).

use crate::types::Entry;
use serde::{Deserialize, Serialize};

/// Append-only ordered sequence of fetched entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<Entry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fetched page as-is, without dedup or order checks
    pub fn append(&mut self, page: Vec<Entry>) {
        self.entries.extend(page);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Rating of the last accumulated entry, the next pagination cursor.
    /// `None` when the board is empty or that entry carries no `tr`.
    pub fn last_rating(&self) -> Option<f64> {
        self.entries.last().and_then(|entry| entry.league.tr)
    }
}

impl From<Vec<Entry>> for Leaderboard {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}
