//! Output module
//!
//! Persists result pages as raw JSON files.
//!
//! # Overview
//!
//! Files live at `<root>/<server>/<query_name>/<stem>.json`, each holding
//! one JSON array of records exactly as the server returned them. A file
//! doubles as a checkpoint: per-post comment runs skip ids whose file
//! already exists.

mod store;

pub use store::PageStore;
