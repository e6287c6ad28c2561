//! Snapshot pipeline coordination
//!
//! Wires paginate, reduce and export into one sequential run. All run state
//! lives in locals threaded through these calls.

use crate::config::{AppConfig, TierTable};
use crate::error::Result;
use crate::export::{ExportReport, Exporter};
use crate::fetch::{HttpPageSource, PageSource, Paginator};
use crate::leaderboard::Leaderboard;
use crate::snapshot;
use crate::thresholds::compute_thresholds;
use crate::types::ThresholdResult;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Everything a completed run produced
#[derive(Debug)]
pub struct RunSummary {
    pub leaderboard: Leaderboard,
    pub thresholds: ThresholdResult,
    pub report: ExportReport,
}

pub struct Pipeline {
    paginator: Paginator,
    tiers: TierTable,
    exporter: Exporter,
}

impl Pipeline {
    /// Build a pipeline around an arbitrary page source
    pub fn new(source: Arc<dyn PageSource>, config: &AppConfig) -> Self {
        Self {
            paginator: Paginator::new(source, config.page_delay()),
            tiers: config.tiers.clone(),
            exporter: Exporter::new(config.output.clone()),
        }
    }

    /// Build a pipeline that fetches from the configured HTTP endpoint
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source = HttpPageSource::new(&config.api, config.request_timeout())?;
        Ok(Self::new(Arc::new(source), config))
    }

    /// Sweep the leaderboard, compute thresholds and write every artifact
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();

        let leaderboard = self.paginator.collect().await?;
        let thresholds = compute_thresholds(&leaderboard, &self.tiers)?;
        let report = self
            .exporter
            .export_all(&leaderboard, &thresholds, Utc::now())
            .await;

        info!(
            "Run complete - {} entries, {} tiers, {:.2}s",
            leaderboard.len(),
            thresholds.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(RunSummary {
            leaderboard,
            thresholds,
            report,
        })
    }

    /// Recompute thresholds from a saved snapshot and rewrite only that artifact
    pub async fn recompute(&self, snapshot_path: &Path) -> Result<RunSummary> {
        let leaderboard = snapshot::load(snapshot_path).await?;
        let thresholds = compute_thresholds(&leaderboard, &self.tiers)?;
        let report = self
            .exporter
            .export_thresholds(&thresholds, Utc::now())
            .await;

        Ok(RunSummary {
            leaderboard,
            thresholds,
            report,
        })
    }
}
