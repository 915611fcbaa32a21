//! Post index built from saved post pages

use crate::error::Result;
use crate::output::PageStore;
use crate::types::{QueryName, Record};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Identifiers that are safe to embed in a query string and a file name
static SAFE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("id regex is valid"));

/// Check whether a post identifier can be used as a query term and file stem
pub fn is_safe_id(id: &str) -> bool {
    SAFE_ID_REGEX.is_match(id)
}

/// Mapping from post id to title, ordered by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostIndex {
    posts: BTreeMap<String, String>,
}

impl PostIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every saved `posts` page of a server
    ///
    /// Files are read in name order; a later duplicate id replaces the
    /// earlier title.
    pub fn load(store: &PageStore, server: &str) -> Result<Self> {
        let mut index = Self::new();
        let files = store.page_files(server, QueryName::Posts)?;
        for path in &files {
            let records = store.read_page(path)?;
            debug!(path = %path.display(), records = records.len(), "Indexing post page");
            index.extend(&records);
        }
        debug!(files = files.len(), posts = index.len(), "Post index built");
        Ok(index)
    }

    /// Add post records to the index
    ///
    /// Records without a usable `_id` are skipped with a warning; a missing
    /// title is stored as an empty string.
    pub fn extend(&mut self, records: &[Record]) {
        for record in records {
            let Some(id) = record.get("_id").and_then(Value::as_str) else {
                warn!("Skipping post record without an _id: {record}");
                continue;
            };
            if !is_safe_id(id) {
                warn!("Skipping post with unusable id {id:?}");
                continue;
            }
            let title = record
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default();
            self.insert(id, title);
        }
    }

    /// Insert or replace one entry
    pub fn insert(&mut self, id: impl Into<String>, title: impl Into<String>) {
        self.posts.insert(id.into(), title.into());
    }

    /// Iterate `(id, title)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.posts.iter().map(|(id, title)| (id.as_str(), title.as_str()))
    }

    /// Number of posts
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
