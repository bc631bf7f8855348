//! Property-based tests for the filter

use proptest::prelude::*;
use serde_json::Value;
use sheetq_filter::{FilterParams, Response, TableFilter};
use sheetq_test_utils::{multi_sheet, rows, to_bytes};

fn sheet_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 0..4)
        .prop_map(|names| names.into_iter().map(String::from).collect())
}

proptest! {
    #[test]
    fn filtering_is_idempotent(
        limit in prop::option::of(0usize..20),
        offset in prop::option::of(0usize..20),
        sheets in sheet_names(),
    ) {
        let doc = to_bytes(&multi_sheet(&[("a", rows(7)), ("b", rows(12)), ("c", rows(0))]));
        let filter = TableFilter::new(FilterParams { limit, offset, sheets });
        let first = filter.apply(Response::ok(doc.clone()));
        let second = filter.apply(Response::ok(doc));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn returned_limit_is_row_count(
        limit in prop::option::of(0usize..20),
        offset in prop::option::of(0usize..20),
    ) {
        let doc = to_bytes(&multi_sheet(&[("a", rows(7)), ("b", rows(12))]));
        let resp = TableFilter::new(FilterParams { limit, offset, sheets: Vec::new() })
            .apply(Response::ok(doc));
        prop_assert_eq!(resp.status, 200);
        let body: Value = resp.json().unwrap();
        for name in ["a", "b"] {
            let sheet = &body[name];
            prop_assert_eq!(
                sheet["limit"].as_u64().unwrap() as usize,
                sheet["data"].as_array().unwrap().len()
            );
            prop_assert_eq!(sheet["offset"].as_u64().unwrap() as usize, offset.unwrap_or(0));
        }
    }

    #[test]
    fn selection_status_depends_only_on_known_names(sheets in sheet_names()) {
        let doc = to_bytes(&multi_sheet(&[("a", rows(1)), ("b", rows(1))]));
        let resp = TableFilter::new(FilterParams { sheets: sheets.clone(), ..Default::default() })
            .apply(Response::ok(doc));
        let any_known = sheets.is_empty() || sheets.iter().any(|s| s == "a" || s == "b");
        prop_assert_eq!(resp.status, if any_known { 200 } else { 404 });
    }
}
