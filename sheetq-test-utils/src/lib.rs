//! sheetq Test Utilities
//!
//! This crate provides shared fixtures for sheetq tests and benchmarks: rows,
//! single-table documents, multi-sheet documents and gzip payloads.

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use std::io::Write;

/// Builder for creating test rows with common patterns
pub struct RowBuilder {
    fields: Map<String, Value>,
}

impl RowBuilder {
    /// Create a new row builder
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Add a field with a string value
    pub fn string(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a field with an integer value
    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), Value::from(value));
        self
    }

    /// Add a field with a boolean value
    pub fn bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Build the row
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Default for RowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `n` spreadsheet-like rows (`Source`, `Destination`, `Row`), all values as strings
pub fn rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            RowBuilder::new()
                .string("Source", &format!("/source/{i}"))
                .string("Destination", &format!("/destination/{i}"))
                .string("Row", &i.to_string())
                .build()
        })
        .collect()
}

/// Single-table document holding all of `data`
pub fn table_of(data: Vec<Value>) -> Value {
    let len = data.len();
    json!({
        "total": len,
        "offset": 0,
        "limit": len,
        "data": data,
    })
}

/// Multi-sheet document with the given sheets, in order
pub fn multi_sheet(sheets: &[(&str, Vec<Value>)]) -> Value {
    let mut doc = Map::new();
    let names: Vec<Value> = sheets.iter().map(|(name, _)| json!(name)).collect();
    doc.insert(":names".to_string(), Value::Array(names));
    for (name, data) in sheets {
        doc.insert(name.to_string(), table_of(data.clone()));
    }
    Value::Object(doc)
}

/// Serialize a document to bytes
pub fn to_bytes(doc: &Value) -> Vec<u8> {
    serde_json::to_vec(doc).unwrap_or_default()
}

/// Gzip-compress bytes
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    if encoder.write_all(data).is_err() {
        return Vec::new();
    }
    encoder.finish().unwrap_or_default()
}
