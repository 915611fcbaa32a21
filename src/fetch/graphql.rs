//! GraphQL fetcher bound to one forum endpoint

use super::PageSource;
use crate::decode::{GraphqlDecoder, RecordDecoder};
use crate::error::Result;
use crate::http::HttpClient;
use crate::query::{QueryCatalog, QueryRequest};
use crate::types::{QueryName, Record, TimeWindow};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// Fetches pages from a GraphQL forum endpoint
#[derive(Debug)]
pub struct GraphqlFetcher {
    client: HttpClient,
    endpoint: String,
    catalog: QueryCatalog,
}

impl GraphqlFetcher {
    /// Create a fetcher for one endpoint
    pub fn new(client: HttpClient, endpoint: impl Into<String>, catalog: QueryCatalog) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            catalog,
        }
    }

    /// Endpoint this fetcher talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Render, send and decode one query
    pub async fn execute(&self, query: QueryName, request: &QueryRequest) -> Result<Vec<Record>> {
        let document = self.catalog.render(query, request)?;
        debug!(query = %query, endpoint = %self.endpoint, "Sending GraphQL query");

        let body: Value = self
            .client
            .post_json(&self.endpoint, json!({ "query": document }))
            .await?;

        GraphqlDecoder::for_query(query).decode_value(&body)
    }
}

#[async_trait]
impl PageSource for GraphqlFetcher {
    async fn fetch_page(
        &self,
        query: QueryName,
        window: &TimeWindow,
        limit: usize,
    ) -> Result<Vec<Record>> {
        self.execute(query, &QueryRequest::window(limit, *window))
            .await
    }

    async fn fetch_post_comments(&self, post_id: &str) -> Result<Vec<Record>> {
        self.execute(QueryName::PostComments, &QueryRequest::post(post_id))
            .await
    }
}
