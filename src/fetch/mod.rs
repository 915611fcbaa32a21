//! Fetcher module
//!
//! One network round-trip per call: render the query, POST it, decode the
//! result list.
//!
//! # Overview
//!
//! The driver only sees the [`PageSource`] trait, so pagination can be
//! exercised against a simulated source. [`GraphqlFetcher`] is the real
//! implementation, bound to one server's endpoint.

mod graphql;

pub use graphql::GraphqlFetcher;

use crate::error::Result;
use crate::types::{QueryName, Record, TimeWindow};
use async_trait::async_trait;

/// A source of result pages
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch at most `limit` records created inside `window`
    async fn fetch_page(
        &self,
        query: QueryName,
        window: &TimeWindow,
        limit: usize,
    ) -> Result<Vec<Record>>;

    /// Fetch every comment of one post in a single request
    async fn fetch_post_comments(&self, post_id: &str) -> Result<Vec<Record>>;
}
