//! Artifact writer
//!
//! Each artifact is written on its own. A failed write is logged and
//! reported, and never stops the other writes.

use crate::config::OutputSettings;
use crate::export::envelope::Envelope;
use crate::export::table::render_csv;
use crate::leaderboard::Leaderboard;
use crate::types::ThresholdResult;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome of one artifact write
#[derive(Debug)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub result: Result<(), String>,
}

impl WriteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-artifact outcomes of an export
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<WriteOutcome>,
}

impl ExportReport {
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.written()
    }
}

/// Writes the leaderboard and threshold artifacts into the output directory
#[derive(Debug, Clone)]
pub struct Exporter {
    settings: OutputSettings,
}

impl Exporter {
    pub fn new(settings: OutputSettings) -> Self {
        Self { settings }
    }

    pub fn leaderboard_json_path(&self) -> PathBuf {
        self.settings.dir.join(&self.settings.leaderboard_json)
    }

    pub fn thresholds_json_path(&self) -> PathBuf {
        self.settings.dir.join(&self.settings.thresholds_json)
    }

    pub fn leaderboard_csv_path(&self) -> PathBuf {
        self.settings.dir.join(&self.settings.leaderboard_csv)
    }

    fn ttl(&self) -> Duration {
        Duration::milliseconds(self.settings.cache_ttl_ms)
    }

    /// Write all three artifacts concurrently, stamped at `now`
    pub async fn export_all(
        &self,
        leaderboard: &Leaderboard,
        thresholds: &ThresholdResult,
        now: DateTime<Utc>,
    ) -> ExportReport {
        let leaderboard_path = self.leaderboard_json_path();
        let thresholds_path = self.thresholds_json_path();
        let csv_path = self.leaderboard_csv_path();

        let leaderboard_envelope = Envelope::stamp(leaderboard, now, self.ttl());
        let thresholds_envelope = Envelope::stamp(thresholds, now, self.ttl());

        let (leaderboard_json, thresholds_json, csv) = tokio::join!(
            write_json(&leaderboard_path, &leaderboard_envelope),
            write_json(&thresholds_path, &thresholds_envelope),
            write_csv(&csv_path, leaderboard),
        );

        let report = ExportReport {
            outcomes: vec![leaderboard_json, thresholds_json, csv],
        };
        info!(
            "Export finished: {} written, {} failed, cached for {}ms",
            report.written(),
            report.failed(),
            leaderboard_envelope.ttl_ms()
        );
        report
    }

    /// Write only the threshold artifact
    pub async fn export_thresholds(
        &self,
        thresholds: &ThresholdResult,
        now: DateTime<Utc>,
    ) -> ExportReport {
        let envelope = Envelope::stamp(thresholds, now, self.ttl());
        let outcome = write_json(&self.thresholds_json_path(), &envelope).await;
        info!(
            "Thresholds exported, cached until {} ({}ms)",
            envelope.cache_until,
            envelope.ttl_ms()
        );

        ExportReport {
            outcomes: vec![outcome],
        }
    }
}

async fn write_json<T: Serialize>(path: &Path, envelope: &Envelope<T>) -> WriteOutcome {
    match serde_json::to_string(envelope) {
        Ok(body) => write_text(path, body).await,
        Err(e) => {
            error!("Failed to serialize {}: {}", path.display(), e);
            WriteOutcome {
                path: path.to_path_buf(),
                result: Err(e.to_string()),
            }
        }
    }
}

async fn write_csv(path: &Path, leaderboard: &Leaderboard) -> WriteOutcome {
    match render_csv(leaderboard) {
        Ok(body) => write_text(path, body).await,
        Err(e) => {
            error!("Failed to render {}: {}", path.display(), e);
            WriteOutcome {
                path: path.to_path_buf(),
                result: Err(e.to_string()),
            }
        }
    }
}

async fn write_text(path: &Path, body: String) -> WriteOutcome {
    let result = match tokio::fs::write(path, body).await {
        Ok(()) => {
            info!("{} was updated", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            Err(e.to_string())
        }
    };

    WriteOutcome {
        path: path.to_path_buf(),
        result,
    }
}
