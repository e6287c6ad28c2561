//! Flat CSV rendering of the leaderboard
//!
//! Fields are never quoted, so a comma inside a username shifts the row;
//! downstream readers accept that. Numbers keep their shortest display form
//! (`60`, not `60.0`), which is why rows go through `write_record` rather
//! than serde.

use crate::error::Result;
use crate::leaderboard::Leaderboard;
use crate::types::Entry;
use csv::{QuoteStyle, WriterBuilder};

pub const CSV_HEADER: &str = "username,tr,rank,glicko,rd,apm,pps,vs";

/// Header line plus one line per entry, newline separated, no trailing newline
pub fn render_csv(leaderboard: &Leaderboard) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER.split(','))?;
    for entry in leaderboard.entries() {
        writer.write_record(&row(entry))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut csv = String::from_utf8(bytes)?;
    if csv.ends_with('\n') {
        csv.pop();
    }
    Ok(csv)
}

fn row(entry: &Entry) -> [String; 8] {
    let league = &entry.league;
    [
        entry.username.clone(),
        optional(league.tr),
        league.rank.clone(),
        league.glicko.to_string(),
        league.rd.to_string(),
        optional(league.apm),
        optional(league.pps),
        optional(league.vs),
    ]
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
