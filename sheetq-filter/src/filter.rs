//! Table filter: classify, select, window, serialize

use crate::envelope::Envelope;
use sheetq_format::{Document, FilterParams, MetadataMode, Response, SheetError, Window};
use tracing::{debug, info};

/// Filter configured for one request.
///
/// Built once from the request parameters, then applied to the fetched response.
#[derive(Debug, Clone)]
pub struct TableFilter {
    window: Window,
    sheets: Vec<String>,
    mode: MetadataMode,
}

impl TableFilter {
    /// Create a filter reporting metadata in both envelope and headers
    pub fn new(params: FilterParams) -> Self {
        Self::with_mode(params, MetadataMode::default())
    }

    /// Create a filter with an explicit metadata convention
    pub fn with_mode(params: FilterParams, mode: MetadataMode) -> Self {
        Self {
            window: params.window(),
            sheets: params.sheets,
            mode,
        }
    }

    /// Window applied to every returned table
    pub fn window(&self) -> Window {
        self.window
    }

    /// Requested sheet names
    pub fn sheets(&self) -> &[String] {
        &self.sheets
    }

    /// Select and window the tables of a parsed document.
    ///
    /// Single-table documents ignore the sheet selection. For multi-table documents the
    /// selection keeps document order; an empty selection fails with
    /// [`SheetError::SheetNotFound`].
    pub fn filter_document(&self, document: Document) -> Result<Envelope, SheetError> {
        match document {
            Document::Single(table) => Ok(Envelope::Sheet {
                name: None,
                table: table.window(&self.window),
            }),
            Document::Multi(multi) => {
                let mut selected: Vec<_> = multi
                    .into_sheets()
                    .into_iter()
                    .filter(|(name, _)| self.sheets.is_empty() || self.sheets.contains(name))
                    .map(|(name, table)| (name, table.window(&self.window)))
                    .collect();

                match selected.len() {
                    0 => Err(SheetError::SheetNotFound {
                        requested: self.sheets.clone(),
                    }),
                    1 => {
                        let (name, table) = selected.remove(0);
                        Ok(Envelope::Sheet {
                            name: Some(name),
                            table,
                        })
                    }
                    _ => Ok(Envelope::MultiSheet(selected)),
                }
            }
        }
    }

    /// Filter raw document bytes into a response
    pub fn filter_bytes(&self, body: &[u8]) -> Response {
        let result = Document::from_slice(body)
            .and_then(|document| self.filter_document(document))
            .and_then(|envelope| {
                let sheet_type = envelope.sheet_type();
                envelope
                    .into_response(self.mode)
                    .map(|response| (sheet_type, response))
            });

        match result {
            Ok((sheet_type, response)) => {
                debug!(sheet_type, bytes = response.body.len(), "filtered sheet data");
                response
            }
            Err(err) => {
                info!(status = err.status(), "{}", err);
                Response::error(err.status(), &err.to_string())
            }
        }
    }

    /// Apply the filter to a fetched response.
    ///
    /// Non-200 responses are returned unchanged.
    pub fn apply(&self, fetched: Response) -> Response {
        if fetched.status != 200 {
            return fetched;
        }
        self.filter_bytes(&fetched.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_value(json!({
            ":names": ["a", "b", "c"],
            "a": { "total": 3, "data": [{"v": 1}, {"v": 2}, {"v": 3}] },
            "b": { "total": 1, "data": [{"v": 4}] },
            "c": { "total": 0, "data": [] },
        }))
        .unwrap()
    }

    fn params(sheets: &[&str]) -> FilterParams {
        FilterParams {
            sheets: sheets.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn selection_follows_document_order() {
        let envelope = TableFilter::new(params(&["c", "a"]))
            .filter_document(doc())
            .unwrap();
        assert_eq!(envelope.names(), ["a", "c"]);
        assert_eq!(envelope.sheet_type(), "multi-sheet");
    }

    #[test]
    fn single_selection_is_a_sheet() {
        let envelope = TableFilter::new(params(&["b"])).filter_document(doc()).unwrap();
        assert_eq!(envelope.sheet_type(), "sheet");
        let body = envelope.into_body(MetadataMode::Both);
        assert_eq!(body, json!({ "total": 1, "offset": 0, "limit": 1, "data": [{"v": 4}], ":type": "sheet" }));
    }

    #[test]
    fn unknown_sheet_is_not_found_even_with_valid_ones() {
        let err = TableFilter::new(params(&["zz"])).filter_document(doc()).unwrap_err();
        assert!(matches!(err, SheetError::SheetNotFound { ref requested } if requested == &["zz"]));
    }

    #[test]
    fn single_table_ignores_sheet_selection() {
        let single = Document::from_value(json!({ "data": [{"v": 1}] })).unwrap();
        let envelope = TableFilter::new(params(&["missing"]))
            .filter_document(single)
            .unwrap();
        assert_eq!(envelope.sheet_type(), "sheet");
        assert!(envelope.names().is_empty());
    }

    #[test]
    fn non_200_passes_through() {
        let fetched = Response::error(502, "error while fetching: 500");
        let out = TableFilter::new(FilterParams::default()).apply(fetched.clone());
        assert_eq!(out, fetched);
    }

    #[test]
    fn invalid_json_is_502() {
        let out = TableFilter::new(FilterParams::default()).filter_bytes(b"<html>");
        assert_eq!(out.status, 502);
        assert!(out.body.is_empty());
        assert!(out.header("x-error").unwrap().starts_with("invalid json"));
    }

    #[test]
    fn not_found_response_has_error_header() {
        let body = serde_json::to_vec(&json!({ ":names": ["a"], "a": { "data": [] } })).unwrap();
        let out = TableFilter::new(params(&["foo"])).filter_bytes(&body);
        assert_eq!(out.status, 404);
        assert_eq!(
            out.header("x-error"),
            Some("filtered result does not contain selected sheet(s): foo")
        );
    }

    #[test]
    fn envelope_mode_bytes_carry_type_in_body_only() {
        let body = serde_json::to_vec(&json!({ "data": [{"v": 1}, {"v": 2}] })).unwrap();
        let filter = TableFilter::with_mode(params(&[]), MetadataMode::Envelope);
        let out = filter.filter_bytes(&body);
        assert_eq!(out.status, 200);
        assert!(out.header("x-helix-data-type").is_none());
        let value: serde_json::Value = out.json().unwrap();
        assert_eq!(value[":type"], "sheet");
    }
}
