//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::query::QueryCatalog;
use crate::types::{QueryName, Record};
use serde_json::Value;
use tracing::warn;

// ============================================================================
// GraphQL Decoder
// ============================================================================

/// Extracts the result list from a GraphQL response envelope
#[derive(Debug, Clone)]
pub struct GraphqlDecoder {
    /// Dotted path to the result array, e.g. `data.posts.results`
    results_path: String,
}

impl GraphqlDecoder {
    /// Create a decoder for an explicit dotted path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            results_path: path.into(),
        }
    }

    /// Create the decoder matching a query's response shape
    pub fn for_query(query: QueryName) -> Self {
        Self::with_path(QueryCatalog::results_path(query))
    }

    /// Path this decoder reads
    pub fn results_path(&self) -> &str {
        &self.results_path
    }
}

impl RecordDecoder for GraphqlDecoder {
    fn decode_value(&self, body: &Value) -> Result<Vec<Record>> {
        let errors = graphql_errors(body);

        let mut current = body;
        for part in self.results_path.split('.') {
            match current.get(part) {
                Some(next) if !next.is_null() => current = next,
                _ if !errors.is_empty() => {
                    return Err(Error::GraphQl { messages: errors });
                }
                _ => {
                    return Err(Error::shape(
                        &self.results_path,
                        format!("missing '{part}'"),
                    ));
                }
            }
        }

        let Value::Array(records) = current else {
            return Err(Error::shape(
                &self.results_path,
                format!("expected an array, found {}", type_name(current)),
            ));
        };

        if !errors.is_empty() {
            warn!(
                "Partial GraphQL response at {}: {}",
                self.results_path,
                errors.join("; ")
            );
        }

        Ok(records.clone())
    }
}

/// Collect the `message` of every entry in a GraphQL `errors` array
fn graphql_errors(body: &Value) -> Vec<String> {
    body.get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| e.to_string(), String::from)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
