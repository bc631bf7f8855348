//! sheetq Filter - Windowing and sheet selection engine
//!
//! This crate turns a fetched sheet document into a filtered response:
//!
//! - Document classification (single-table vs. multi-table)
//! - Sheet selection in document order
//! - Positional windows (`limit`/`offset`)
//! - Envelope and metadata header generation

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod filter;

pub use envelope::Envelope;
pub use filter::TableFilter;
pub use sheetq_format::{Document, FilterParams, MetadataMode, Response, SheetError, Table, Window};

/// Build a filter for `params` and return it as a closure over fetched responses
pub fn make_filter(params: FilterParams, mode: MetadataMode) -> impl Fn(Response) -> Response {
    let filter = TableFilter::with_mode(params, mode);
    move |fetched| filter.apply(fetched)
}
