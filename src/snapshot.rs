//! Reading previously exported leaderboards back
//!
//! Lets thresholds be recomputed offline from a `leaderboard.json` envelope
//! or a `leaderboard.csv` table without sweeping the API again.

use crate::error::{LeaderboardError, Result};
use crate::export::Envelope;
use crate::leaderboard::Leaderboard;
use crate::types::{Entry, LeagueRecord};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Load a snapshot, choosing the format from the file extension
pub async fn load(path: &Path) -> Result<Leaderboard> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

    let leaderboard = match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => parse_csv(&raw)?,
        _ => parse_json(&raw)?,
    };

    info!(
        "Loaded {} entries from {}",
        leaderboard.len(),
        path.display()
    );
    Ok(leaderboard)
}

/// Parse a `leaderboard.json` envelope
pub fn parse_json(raw: &str) -> Result<Leaderboard> {
    let envelope: Envelope<Leaderboard> =
        serde_json::from_str(raw).map_err(|e| LeaderboardError::MalformedSnapshot {
            line: e.line(),
            reason: e.to_string(),
        })?;
    Ok(envelope.data)
}

/// One row of the CSV rendering, columns matched by header name
#[derive(Debug, Deserialize)]
struct CsvRow {
    username: String,
    tr: Option<f64>,
    rank: String,
    glicko: f64,
    rd: f64,
    apm: Option<f64>,
    pps: Option<f64>,
    vs: Option<f64>,
}

impl From<CsvRow> for Entry {
    fn from(row: CsvRow) -> Self {
        let mut league = LeagueRecord::new(0.0, row.rank, row.glicko, row.rd);
        league.tr = row.tr;
        league.apm = row.apm;
        league.pps = row.pps;
        league.vs = row.vs;
        Entry::new(row.username, league)
    }
}

/// Parse the CSV rendering, skipping the header row
///
/// Quotes are not special, matching the renderer. A row whose field count
/// differs from the header is rejected.
pub fn parse_csv(raw: &str) -> Result<Leaderboard> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .escape(None)
        .comment(None)
        .from_reader(raw.as_bytes());

    let mut entries = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(malformed)?;
        entries.push(Entry::from(row));
    }

    Ok(Leaderboard::from(entries))
}

fn malformed(e: csv::Error) -> LeaderboardError {
    LeaderboardError::MalformedSnapshot {
        line: e.position().map(|pos| pos.line() as usize).unwrap_or(0),
        reason: e.to_string(),
    }
}
