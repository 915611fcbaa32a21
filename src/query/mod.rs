//! Query catalog module
//!
//! Holds the GraphQL query templates and renders structured requests into
//! concrete query documents.
//!
//! # Overview
//!
//! Each [`QueryName`](crate::types::QueryName) maps to one template. Bulk
//! listing queries take a [`QueryRequest::Window`]; the per-post comment
//! query takes a [`QueryRequest::Post`]. Placeholders are named, so a
//! template can never receive its parameters in the wrong order.

mod catalog;

pub use catalog::{QueryCatalog, QueryRequest, RequestKind};
