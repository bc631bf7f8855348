//! Filtered results and their serialized envelope

use serde_json::{Map, Value};
use sheetq_format::constants::{
    headers, CONTENT_TYPE_JSON, MULTI_SHEET_VERSION, NAMES_KEY, TYPE_KEY, TYPE_MULTI_SHEET,
    TYPE_SHEET, VERSION_KEY,
};
use sheetq_format::{MetadataMode, Response, Result, Table};

/// Result of filtering one document
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// One table; `name` is set when it was selected from a multi-table document
    Sheet {
        /// Sheet name, if selected by name
        name: Option<String>,
        /// Windowed table
        table: Table,
    },
    /// Two or more named tables in document order
    MultiSheet(Vec<(String, Table)>),
}

impl Envelope {
    /// `:type` value of this envelope
    pub fn sheet_type(&self) -> &'static str {
        match self {
            Envelope::Sheet { .. } => TYPE_SHEET,
            Envelope::MultiSheet(_) => TYPE_MULTI_SHEET,
        }
    }

    /// Names of the selected sheets (empty for a single-table document)
    pub fn names(&self) -> Vec<&str> {
        match self {
            Envelope::Sheet { name, .. } => name.iter().map(String::as_str).collect(),
            Envelope::MultiSheet(sheets) => sheets.iter().map(|(n, _)| n.as_str()).collect(),
        }
    }

    /// Build the JSON body, adding the inline metadata fields when `mode` asks for them
    pub fn into_body(self, mode: MetadataMode) -> Value {
        let sheet_type = self.sheet_type();
        let mut body = match self {
            Envelope::Sheet { table, .. } => table.into_object(),
            Envelope::MultiSheet(sheets) => {
                let mut body = Map::with_capacity(sheets.len() + 3);
                let mut names = Vec::with_capacity(sheets.len());
                for (name, table) in sheets {
                    names.push(Value::String(name.clone()));
                    body.insert(name, Value::Object(table.into_object()));
                }
                if mode.in_envelope() {
                    body.insert(VERSION_KEY.to_string(), Value::from(MULTI_SHEET_VERSION));
                    body.insert(NAMES_KEY.to_string(), Value::Array(names));
                }
                body
            }
        };
        if mode.in_envelope() {
            body.insert(TYPE_KEY.to_string(), Value::from(sheet_type));
        }
        Value::Object(body)
    }

    /// Serialize into a 200 response with metadata per `mode`
    pub fn into_response(self, mode: MetadataMode) -> Result<Response> {
        let sheet_type = self.sheet_type();
        let names = self.names().join(",");
        let body = serde_json::to_vec(&self.into_body(mode))?;

        let mut response = Response::ok(body).with_header(headers::CONTENT_TYPE, CONTENT_TYPE_JSON);
        if mode.in_headers() {
            response = response
                .with_header(headers::X_DATA_TYPE, sheet_type)
                .with_header(headers::X_DATA_VERSION, MULTI_SHEET_VERSION.to_string())
                .with_header(headers::X_SHEET_NAMES, names);
        }
        Ok(response)
    }
}
