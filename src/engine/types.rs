//! Engine types
//!
//! Configuration and statistics for archive runs.

use crate::error::Result;
use crate::pagination::BisectConfig;
use crate::types::TimeWindow;
use chrono::{DateTime, TimeZone, Utc};

/// Configuration for an archive run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Window the bulk listing starts from
    pub window: TimeWindow,
    /// Page size and bisection limits
    pub bisect: BisectConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window: sentinel_window(),
            bisect: BisectConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting window
    pub fn with_bounds(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        self.window = TimeWindow::new(start, end)?;
        Ok(self)
    }

    /// Set the bisection settings
    #[must_use]
    pub fn with_bisect(mut self, bisect: BisectConfig) -> Self {
        self.bisect = bisect;
        self
    }

    /// Page size shortcut
    pub fn page_size(&self) -> usize {
        self.bisect.page_size
    }
}

/// 1900-01-01 to 2100-01-01, wide enough for any forum
pub fn sentinel_window() -> TimeWindow {
    let start = Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).single().expect("valid date");
    let end = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).single().expect("valid date");
    TimeWindow::new(start, end).expect("sentinel bounds are ordered")
}

/// Statistics from an archive run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Requests issued to the source
    pub requests: usize,
    /// Page files written
    pub pages_written: usize,
    /// Records written across all pages
    pub records_written: usize,
    /// Per-post checkpoints skipped
    pub skipped: usize,
    /// Windows split because their page was full
    pub splits: usize,
    /// Deepest split reached
    pub max_depth: usize,
    /// Full pages saved from windows too narrow to split
    pub truncated: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request
    pub fn add_request(&mut self) {
        self.requests += 1;
    }

    /// Count a written page
    pub fn add_page(&mut self, records: usize) {
        self.pages_written += 1;
        self.records_written += records;
    }

    /// Count a skipped checkpoint
    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Count a window split
    pub fn add_split(&mut self, depth: usize) {
        self.splits += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Count a truncated page
    pub fn add_truncated(&mut self) {
        self.truncated += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
