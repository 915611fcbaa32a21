//! CLI runner - executes one archive run

use crate::cli::commands::Cli;
use crate::config::ArchiveConfig;
use crate::engine::{ArchiveEngine, SyncStats};
use crate::error::Result;
use crate::fetch::GraphqlFetcher;
use crate::http::HttpClient;
use crate::output::PageStore;
use crate::types::{parse_timestamp, QueryName};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the archive
    ///
    /// The query name, server name and configuration are all checked before
    /// any directory is created or any request is sent.
    pub async fn run(&self) -> Result<SyncStats> {
        let query: QueryName = self.cli.query.parse()?;
        let config = self.archive_config()?;
        let endpoint = config.endpoint(&self.cli.server)?;

        debug!(server = %self.cli.server, endpoint, query = %query, "Resolved run");

        let client = HttpClient::with_config(config.http_client_config())?;
        let fetcher = GraphqlFetcher::new(client, endpoint, config.catalog()?);
        let store = PageStore::new(&config.output_dir);

        let mut engine = ArchiveEngine::new(fetcher, store, self.cli.server.as_str())
            .with_config(config.sync_config()?);
        engine.run(query).await
    }

    /// Config file (or defaults) with command-line overrides applied
    pub fn archive_config(&self) -> Result<ArchiveConfig> {
        let mut config = match self.cli.config {
            Some(ref path) => ArchiveConfig::load(path)?,
            None => ArchiveConfig::default(),
        };

        if let Some(ref dir) = self.cli.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(page_size) = self.cli.page_size {
            config.page_size = page_size;
        }
        if let Some(ref start) = self.cli.start {
            config.start = parse_timestamp(start)?;
        }
        if let Some(ref end) = self.cli.end {
            config.end = parse_timestamp(end)?;
        }

        config.validate()?;
        Ok(config)
    }
}
