//! Single-sheet tables and positional windows

use crate::error::{Result, SheetError};
use serde_json::Value;

/// Positional slice requested over a table's rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    /// Maximum number of rows to return; `None` returns everything after `offset`
    pub limit: Option<usize>,
    /// Index of the first row to return
    pub offset: usize,
}

impl Window {
    /// Create a window from optional request values (`offset` defaults to 0)
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self {
            limit,
            offset: offset.unwrap_or(0),
        }
    }

    /// Row index range selected from a table of `len` rows, clipped to `[0, len]`
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = self.offset.min(len);
        let end = match self.limit {
            Some(limit) => self.offset.saturating_add(limit).min(len),
            None => len,
        };
        (start, end.max(start))
    }
}

/// One tabular dataset: ordered rows plus total/offset/limit metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Row count of the unfiltered source table, as stored
    pub total: Value,
    /// Offset of the first returned row
    pub offset: u64,
    /// Number of returned rows
    pub limit: u64,
    /// Rows
    pub data: Vec<Value>,
}

impl Table {
    /// Build a table holding all of `data`
    pub fn from_rows(data: Vec<Value>) -> Self {
        let len = data.len() as u64;
        Self {
            total: Value::from(len),
            offset: 0,
            limit: len,
            data,
        }
    }

    /// Interpret a JSON value as a table.
    ///
    /// The value must be an object with a `data` array. `total` is carried through unchanged and
    /// falls back to the number of rows when absent. The stored `offset` and `limit` are ignored.
    pub fn from_value(value: Value, context: &str) -> Result<Self> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(SheetError::InvalidDocument(format!(
                    "{context} is not a table: expected object, found {}",
                    type_name(&other)
                )))
            }
        };

        let data = match obj.remove("data") {
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(SheetError::InvalidDocument(format!(
                    "{context} is not a table: \"data\" is {}",
                    type_name(&other)
                )))
            }
            None => {
                return Err(SheetError::InvalidDocument(format!(
                    "{context} is not a table: missing \"data\" property"
                )))
            }
        };

        let len = data.len() as u64;
        let total = match obj.remove("total") {
            None | Some(Value::Null) => Value::from(len),
            Some(total) => total,
        };

        Ok(Self {
            total,
            offset: 0,
            limit: len,
            data,
        })
    }

    /// Number of rows held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Apply a window, consuming the table.
    ///
    /// `total` is kept, `offset` echoes the requested offset and `limit` is the number of rows
    /// actually returned.
    pub fn window(mut self, window: &Window) -> Table {
        let (start, end) = window.bounds(self.data.len());
        self.data.truncate(end);
        self.data.drain(..start);
        Table {
            total: self.total,
            offset: window.offset as u64,
            limit: self.data.len() as u64,
            data: self.data,
        }
    }

    /// Convert into a JSON object (`total`, `offset`, `limit`, `data` in that order)
    pub fn into_object(self) -> serde_json::Map<String, Value> {
        let mut obj = serde_json::Map::with_capacity(5);
        obj.insert("total".to_string(), self.total);
        obj.insert("offset".to_string(), Value::from(self.offset));
        obj.insert("limit".to_string(), Value::from(self.limit));
        obj.insert("data".to_string(), Value::Array(self.data));
        obj
    }
}

/// Human-readable JSON type name
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({ "id": i })).collect()
    }

    #[test]
    fn window_with_limit_and_offset() {
        let table = Table::from_rows(rows(50));
        let out = table.window(&Window::new(Some(10), Some(5)));
        assert_eq!(out.total, 50);
        assert_eq!(out.offset, 5);
        assert_eq!(out.limit, 10);
        assert_eq!(out.data, rows(50)[5..15].to_vec());
    }

    #[test]
    fn window_offset_only_runs_to_end() {
        let out = Table::from_rows(rows(20)).window(&Window::new(None, Some(5)));
        assert_eq!(out.limit, 15);
        assert_eq!(out.data.first(), Some(&json!({ "id": 5 })));
        assert_eq!(out.data.last(), Some(&json!({ "id": 19 })));
    }

    #[test]
    fn window_limit_only_starts_at_zero() {
        let out = Table::from_rows(rows(20)).window(&Window::new(Some(5), None));
        assert_eq!(out.offset, 0);
        assert_eq!(out.data, rows(20)[..5].to_vec());
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let out = Table::from_rows(rows(3)).window(&Window::new(Some(10), Some(7)));
        assert_eq!(out.total, 3);
        assert_eq!(out.offset, 7);
        assert_eq!(out.limit, 0);
        assert!(out.data.is_empty());
    }

    #[test]
    fn window_zero_limit_is_empty() {
        let out = Table::from_rows(rows(3)).window(&Window::new(Some(0), None));
        assert_eq!(out.limit, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn window_handles_huge_limit() {
        let out = Table::from_rows(rows(4)).window(&Window::new(Some(usize::MAX), Some(2)));
        assert_eq!(out.limit, 2);
    }

    #[test]
    fn from_value_reads_metadata() {
        let table = Table::from_value(
            json!({ "total": 100, "offset": 0, "limit": 2, "data": [{"a": 1}, {"a": 2}] }),
            "document",
        )
        .unwrap();
        assert_eq!(table.total, 100);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn from_value_defaults_total_to_row_count() {
        let table = Table::from_value(json!({ "data": [{"a": 1}] }), "document").unwrap();
        assert_eq!(table.total, 1);
        assert_eq!(table.limit, 1);
    }

    #[test]
    fn from_value_rejects_non_tables() {
        let err = Table::from_value(json!({ "data": {} }), "sheet \"a\"").unwrap_err();
        assert!(err.to_string().contains("sheet \"a\" is not a table"));
        assert!(Table::from_value(json!([1, 2]), "document").is_err());
    }

    #[test]
    fn from_value_ignores_stored_window_metadata() {
        let table = Table::from_value(
            json!({ "total": 2, "offset": -1, "limit": 2.5, "data": [{"a": 1}, {"a": 2}] }),
            "document",
        )
        .unwrap();
        assert_eq!(table.offset, 0);
        assert_eq!(table.limit, 2);

        let out = table.window(&Window::new(Some(1), None));
        assert_eq!(out.total, 2);
        assert_eq!(out.limit, 1);
    }

    #[test]
    fn from_value_passes_total_through() {
        for total in [json!(-1), json!(2.0), json!("2")] {
            let table =
                Table::from_value(json!({ "total": total.clone(), "data": [] }), "document")
                    .unwrap();
            assert_eq!(table.window(&Window::default()).total, total);
        }
    }

    #[test]
    fn into_object_keeps_key_order() {
        let obj = Table::from_rows(rows(1)).into_object();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["total", "offset", "limit", "data"]);
    }
}
