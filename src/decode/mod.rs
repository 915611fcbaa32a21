//! Response decoder module
//!
//! # Overview
//!
//! Forum endpoints answer with a GraphQL envelope,
//! `{"data": {<field>: {"results": [...]}}}`. The decoder unwraps the
//! result list and turns everything else (an `errors` payload, a missing
//! key, a non-array) into a typed error.

mod decoders;
mod types;

pub use decoders::GraphqlDecoder;
pub use types::RecordDecoder;
