//! Bisecting window paginator

use crate::error::{Error, Result};
use crate::types::{TimeWindow, UnsplittablePolicy};
use chrono::TimeDelta;

/// Tunables for the bisecting paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BisectConfig {
    /// Records per request; a page with this many records is "full"
    pub page_size: usize,
    /// Narrowest window a split may produce
    pub min_window: TimeDelta,
    /// What to do with a full page that cannot be split
    pub on_unsplittable: UnsplittablePolicy,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            min_window: TimeDelta::milliseconds(1),
            on_unsplittable: UnsplittablePolicy::Fail,
        }
    }
}

impl BisectConfig {
    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the narrowest window
    #[must_use]
    pub fn with_min_window(mut self, min_window: TimeDelta) -> Self {
        self.min_window = min_window;
        self
    }

    /// Set the unsplittable-window policy
    #[must_use]
    pub fn with_policy(mut self, policy: UnsplittablePolicy) -> Self {
        self.on_unsplittable = policy;
        self
    }
}

/// A window waiting to be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWindow {
    /// The window itself
    pub window: TimeWindow,
    /// Number of splits between the initial window and this one
    pub depth: usize,
}

/// What the driver should do with a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDecision {
    /// The page is the complete content of its window
    Save,
    /// The page is full but the window cannot be narrowed; save it anyway
    SaveTruncated,
    /// The page is full; both halves were queued instead
    Split,
}

impl PageDecision {
    /// Whether the page should be persisted
    pub fn is_save(self) -> bool {
        matches!(self, Self::Save | Self::SaveTruncated)
    }
}

/// Depth-first worklist of time windows
#[derive(Debug, Clone)]
pub struct WindowPaginator {
    config: BisectConfig,
    stack: Vec<PendingWindow>,
    max_depth: usize,
}

impl WindowPaginator {
    /// Start from a single window
    pub fn new(initial: TimeWindow, config: BisectConfig) -> Self {
        Self {
            config,
            stack: vec![PendingWindow {
                window: initial,
                depth: 0,
            }],
            max_depth: 0,
        }
    }

    /// Paginator configuration
    pub fn config(&self) -> &BisectConfig {
        &self.config
    }

    /// Next window to fetch, if any remain
    pub fn next_window(&mut self) -> Option<PendingWindow> {
        self.stack.pop()
    }

    /// Windows still queued
    pub fn pending(&self) -> usize {
        self.stack.len()
    }

    /// Deepest split seen so far
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decide what to do with a page of `records` records fetched for `pending`
    ///
    /// On `Split` both halves are queued so that the earlier half comes out
    /// of [`next_window`](Self::next_window) first.
    pub fn process(&mut self, pending: &PendingWindow, records: usize) -> Result<PageDecision> {
        if records < self.config.page_size {
            return Ok(PageDecision::Save);
        }

        let window = pending.window;
        if !window.can_split(self.config.min_window) {
            return match self.config.on_unsplittable {
                UnsplittablePolicy::Fail => Err(Error::UnsplittableWindow {
                    after: window.after(),
                    before: window.before(),
                    records,
                }),
                UnsplittablePolicy::SaveTruncated => Ok(PageDecision::SaveTruncated),
            };
        }

        let (earlier, later) = window.split();
        let depth = pending.depth + 1;
        self.max_depth = self.max_depth.max(depth);
        self.stack.push(PendingWindow {
            window: later,
            depth,
        });
        self.stack.push(PendingWindow {
            window: earlier,
            depth,
        });
        Ok(PageDecision::Split)
    }
}
