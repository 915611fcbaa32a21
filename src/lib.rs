// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # forum-archive
//!
//! Archives posts and comments from ForumMagnum GraphQL servers (the EA
//! Forum and LessWrong) as raw JSON page files.
//!
//! ## Features
//!
//! - **Time-window bisection**: bulk listings are fetched by halving any
//!   window whose page comes back full, until every page is complete
//! - **Resumable per-post comments**: one file per post, existing files
//!   are skipped on the next run
//! - **Plain output**: `<output_dir>/<server>/<query>/<stem>.json`, exactly
//!   what the server returned
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forum_archive::{ArchiveConfig, ArchiveEngine, GraphqlFetcher, HttpClient, PageStore};
//! use forum_archive::{QueryName, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ArchiveConfig::default();
//!     let client = HttpClient::with_config(config.http_client_config())?;
//!     let fetcher = GraphqlFetcher::new(client, config.endpoint("lw")?, config.catalog()?);
//!
//!     let mut engine = ArchiveEngine::new(fetcher, PageStore::new("archive"), "lw")
//!         .with_config(config.sync_config()?);
//!     let stats = engine.run(QueryName::Posts).await?;
//!     println!("{} pages written", stats.pages_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ArchiveEngine                         │
//! │   run(query) → fetch_all (bulk)  |  fetch_post_comments      │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┼──────────────┬────────────────┐
//! │ Pagination │     Fetch      │    Query     │  Output/State  │
//! ├────────────┼────────────────┼──────────────┼────────────────┤
//! │ Worklist   │ PageSource     │ Catalog      │ PageStore      │
//! │ Bisection  │ GraphQL POST   │ Templates    │ PostIndex      │
//! │            │ Decode results │              │                │
//! └────────────┴────────────────┴──────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the archiver
pub mod error;

/// Common types and type aliases
pub mod types;

/// Template interpolation
pub mod template;

/// GraphQL query catalog
pub mod query;

/// HTTP client with optional retry and rate limiting
pub mod http;

/// Response decoders
pub mod decode;

/// Page sources
pub mod fetch;

/// Page file storage
pub mod output;

/// Saved-post index
pub mod state;

/// Time-window bisection
pub mod pagination;

/// Main execution engine
pub mod engine;

/// Archive configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ArchiveConfig;
pub use engine::{ArchiveEngine, SyncConfig, SyncStats};
pub use fetch::{GraphqlFetcher, PageSource};
pub use http::HttpClient;
pub use output::PageStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
