//! Cursor-driven pagination over a `PageSource`
//!
//! One request is in flight at a time. The loop stops on the first empty
//! page; any error from the source ends the sweep.

use crate::error::Result;
use crate::fetch::client::{Cursor, PageSource};
use crate::leaderboard::Leaderboard;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Sequential page sweep with a fixed courtesy delay
pub struct Paginator {
    source: Arc<dyn PageSource>,
    page_delay: Duration,
}

impl Paginator {
    pub fn new(source: Arc<dyn PageSource>, page_delay: Duration) -> Self {
        Self { source, page_delay }
    }

    /// Fetch every page and accumulate them into a fresh leaderboard
    pub async fn collect(&self) -> Result<Leaderboard> {
        let mut leaderboard = Leaderboard::new();

        let first = self.source.fetch_page(None).await?;
        if first.is_empty() {
            info!("First page was empty, leaderboard has no entries");
            return Ok(leaderboard);
        }
        leaderboard.append(first);
        let mut cursor = Cursor::new(leaderboard.last_rating().unwrap_or(0.0));
        info!("{}, {}", leaderboard.len(), cursor.rating);

        loop {
            sleep(self.page_delay).await;

            let page = self.source.fetch_page(Some(cursor)).await?;
            if page.is_empty() {
                debug!("Empty page after cursor {}, sweep complete", cursor);
                break;
            }

            leaderboard.append(page);
            cursor = Cursor::new(leaderboard.last_rating().unwrap_or(0.0));
            info!("{}, {}", leaderboard.len(), cursor.rating);
        }

        info!("Collected {} leaderboard entries", leaderboard.len());
        Ok(leaderboard)
    }
}
