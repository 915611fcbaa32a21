//! Execution engine module
//!
//! Drives a page source through a whole archive run and persists every
//! completed page.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ArchiveEngine` - runs one query for one server
//! - `SyncConfig` - starting window and bisection settings
//! - `SyncStats` - counters reported at the end of a run
//!
//! Bulk listing queries walk a [`WindowPaginator`] worklist; per-post
//! comments walk the [`PostIndex`] and skip posts whose file already exists.

mod types;

pub use types::{sentinel_window, SyncConfig, SyncStats};

use crate::error::{Error, Result};
use crate::fetch::PageSource;
use crate::output::PageStore;
use crate::pagination::{PageDecision, WindowPaginator};
use crate::state::PostIndex;
use crate::types::QueryName;
use std::time::Instant;
use tracing::{info, warn};

/// Archive engine for one server
pub struct ArchiveEngine<S> {
    /// Where pages come from
    source: S,
    /// Where pages go
    store: PageStore,
    /// Server short name, used as the top-level directory
    server: String,
    /// Run configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl<S: PageSource> ArchiveEngine<S> {
    /// Create a new engine
    pub fn new(source: S, store: PageStore, server: impl Into<String>) -> Self {
        Self {
            source,
            store,
            server: server.into(),
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set run configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the page store
    pub fn store(&self) -> &PageStore {
        &self.store
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Run one query to completion
    pub async fn run(&mut self, query: QueryName) -> Result<SyncStats> {
        let start = Instant::now();
        self.stats = SyncStats::new();
        self.store.ensure_query_dir(&self.server, query)?;

        info!(server = %self.server, query = %query, "Starting archive run");

        if query.is_bulk() {
            self.fetch_all(query).await?;
        } else {
            self.fetch_post_comments().await?;
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            server = %self.server,
            query = %query,
            requests = self.stats.requests,
            pages = self.stats.pages_written,
            records = self.stats.records_written,
            skipped = self.stats.skipped,
            splits = self.stats.splits,
            max_depth = self.stats.max_depth,
            duration_ms = self.stats.duration_ms,
            "Archive run complete"
        );

        Ok(self.stats.clone())
    }

    /// Fetch every record of a bulk listing query by bisecting time windows
    pub async fn fetch_all(&mut self, query: QueryName) -> Result<()> {
        if !query.is_bulk() {
            return Err(Error::config(format!(
                "query '{query}' is not paginated by time window"
            )));
        }

        let page_size = self.config.page_size();
        let mut paginator = WindowPaginator::new(self.config.window, self.config.bisect);

        while let Some(pending) = paginator.next_window() {
            info!("{}{}", "  ".repeat(pending.depth), pending.window);

            let records = self
                .source
                .fetch_page(query, &pending.window, page_size)
                .await?;
            self.stats.add_request();

            match paginator.process(&pending, records.len())? {
                PageDecision::Split => {
                    self.stats.add_split(pending.depth + 1);
                    continue;
                }
                PageDecision::SaveTruncated => {
                    warn!(
                        window = %pending.window,
                        records = records.len(),
                        "Window is full but too narrow to split, saving a possibly truncated page"
                    );
                    self.stats.add_truncated();
                }
                PageDecision::Save => {}
            }

            self.store
                .write_page(&self.server, query, &pending.window.file_stem(), &records)?;
            self.stats.add_page(records.len());
        }

        Ok(())
    }

    /// Fetch the comments of every indexed post that has no saved file yet
    pub async fn fetch_post_comments(&mut self) -> Result<()> {
        let query = QueryName::PostComments;
        let index = PostIndex::load(&self.store, &self.server)?;
        if index.is_empty() {
            warn!(
                server = %self.server,
                "No saved posts found; run the posts query first"
            );
        }

        let page_size = self.config.page_size();
        for (post_id, title) in index.iter() {
            if self.store.exists(&self.server, query, post_id) {
                self.stats.add_skipped();
                continue;
            }

            info!("{title} ({post_id})...");
            let records = self.source.fetch_post_comments(post_id).await?;
            self.stats.add_request();

            if records.len() >= page_size {
                warn!(
                    post_id,
                    records = records.len(),
                    "Post returned a full page of comments, result may be truncated"
                );
            }

            self.store.write_page(&self.server, query, post_id, &records)?;
            self.stats.add_page(records.len());
        }

        Ok(())
    }
}
