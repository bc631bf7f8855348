//! Fetched documents: single-table or named collection of tables

use crate::constants::NAMES_KEY;
use crate::error::{Result, SheetError};
use crate::table::{type_name, Table};
use serde_json::Value;
use std::collections::HashMap;

/// Message reported for a multi-table document without a name list
pub const MISSING_NAMES_MESSAGE: &str = "multisheet data invalid. missing \":names\" property.";

/// Named collection of tables in declared order
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSheet {
    names: Vec<String>,
    sheets: HashMap<String, Table>,
}

impl MultiSheet {
    /// Sheet names in document order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Look up a sheet by name
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.sheets.get(name)
    }

    /// Consume into `(name, table)` pairs in document order
    pub fn into_sheets(mut self) -> Vec<(String, Table)> {
        self.names
            .into_iter()
            .filter_map(|name| self.sheets.remove(&name).map(|table| (name, table)))
            .collect()
    }
}

/// A parsed document, classified once
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Top-level `data` array: the document itself is a table
    Single(Table),
    /// `:names` lists fields that each hold a table
    Multi(MultiSheet),
}

impl Document {
    /// Parse raw bytes as a document
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Classify a JSON value as a document
    pub fn from_value(value: Value) -> Result<Self> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(SheetError::InvalidDocument(format!(
                    "sheet data invalid. expected object, found {}.",
                    type_name(&other)
                )))
            }
        };

        if matches!(obj.get("data"), Some(Value::Array(_))) {
            return Table::from_value(Value::Object(obj), "document").map(Document::Single);
        }

        let names = match obj.remove(NAMES_KEY) {
            None => return Err(SheetError::InvalidDocument(MISSING_NAMES_MESSAGE.to_string())),
            Some(Value::Array(names)) => names,
            Some(other) => {
                return Err(SheetError::InvalidDocument(format!(
                    "multisheet data invalid. \":names\" is {}.",
                    type_name(&other)
                )))
            }
        };

        let mut ordered = Vec::with_capacity(names.len());
        let mut sheets = HashMap::with_capacity(names.len());
        for name in names {
            let name = match name {
                Value::String(name) => name,
                other => {
                    return Err(SheetError::InvalidDocument(format!(
                        "multisheet data invalid. \":names\" contains {}.",
                        type_name(&other)
                    )))
                }
            };
            // duplicate names refer to the same table
            if sheets.contains_key(&name) {
                continue;
            }
            let value = obj.remove(&name).ok_or_else(|| {
                SheetError::InvalidDocument(format!(
                    "multisheet data invalid. sheet \"{name}\" is not a table."
                ))
            })?;
            let table = Table::from_value(value, &format!("sheet \"{name}\""))
                .map_err(|_| {
                    SheetError::InvalidDocument(format!(
                        "multisheet data invalid. sheet \"{name}\" is not a table."
                    ))
                })?;
            sheets.insert(name.clone(), table);
            ordered.push(name);
        }

        Ok(Document::Multi(MultiSheet {
            names: ordered,
            sheets,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sheet(rows: usize) -> Value {
        let data: Vec<Value> = (0..rows).map(|i| json!({ "n": i })).collect();
        json!({ "total": rows, "offset": 0, "limit": rows, "data": data })
    }

    #[test]
    fn classifies_single_table() {
        let doc = Document::from_value(sheet(3)).unwrap();
        assert!(matches!(doc, Document::Single(ref t) if t.len() == 3));
    }

    #[test]
    fn classifies_multi_table_in_declared_order() {
        let doc = Document::from_value(json!({
            ":names": ["b", "a"],
            "a": sheet(1),
            "b": sheet(2),
        }))
        .unwrap();
        let Document::Multi(multi) = doc else {
            panic!("expected multi-sheet document");
        };
        assert_eq!(multi.names(), ["b".to_string(), "a".to_string()]);
        assert_eq!(multi.get("b").map(Table::len), Some(2));
        let order: Vec<String> = multi.into_sheets().into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn rejects_multi_table_without_names() {
        let err = Document::from_value(json!({ "a": sheet(1) })).unwrap_err();
        assert_eq!(err.to_string(), MISSING_NAMES_MESSAGE);
    }

    #[test]
    fn rejects_names_without_tables() {
        let err = Document::from_value(json!({ ":names": ["a", "b"], "a": sheet(1) })).unwrap_err();
        assert!(err.to_string().contains("sheet \"b\" is not a table"));

        let err = Document::from_value(json!({ ":names": ["a"], "a": { "rows": [] } })).unwrap_err();
        assert!(err.to_string().contains("sheet \"a\" is not a table"));
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(Document::from_value(json!([1, 2, 3])).is_err());
        assert!(Document::from_slice(b"not json").is_err());
    }

    #[test]
    fn duplicate_names_collapse() {
        let doc = Document::from_value(json!({ ":names": ["a", "a"], "a": sheet(1) })).unwrap();
        let Document::Multi(multi) = doc else {
            panic!("expected multi-sheet document");
        };
        assert_eq!(multi.names().len(), 1);
    }

    #[test]
    fn sheet_metadata_types_are_not_checked() {
        let doc = Document::from_value(json!({
            ":names": ["a"],
            "a": { "total": "2", "offset": -1, "limit": 0.5, "data": [{}, {}] },
        }))
        .unwrap();
        let Document::Multi(multi) = doc else {
            panic!("expected multi-sheet document");
        };
        let table = multi.get("a").unwrap();
        assert_eq!(table.total, "2");
        assert_eq!(table.len(), 2);
    }
}
