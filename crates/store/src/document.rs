use crate::{Result, StoreError};
use serde_json::{Map, Value};

/// An attribute document: a JSON object with unique keys, insertion order kept.
pub type Document = Map<String, Value>;

/// Document carried by every filament type node.
pub const TYPE_DOCUMENT: &str = "filament.json";

/// Document carried by every variant node.
pub const VARIANT_DOCUMENT: &str = "variant.json";

/// Parse raw bytes into a [`Document`]. `origin` only labels errors.
pub fn decode_document(bytes: &[u8], origin: &str) -> Result<Document> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| StoreError::Document {
        path: origin.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject {
            path: origin.to_string(),
        }),
    }
}

/// Serialize with 2-space indentation and a trailing newline.
pub fn encode_document(doc: &Document) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Document {
        path: String::from("<encode>"),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}
