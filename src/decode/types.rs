//! Decoder traits

use crate::error::Result;
use crate::types::Record;
use serde_json::Value;

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode an already-parsed body into records
    fn decode_value(&self, body: &Value) -> Result<Vec<Record>>;

    /// Decode a raw body string into records
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let value: Value = serde_json::from_str(body)?;
        self.decode_value(&value)
    }
}
