//! sheetq I/O - Object store access and the request pipeline
//!
//! This crate provides the I/O layer for sheetq:
//!
//! - The object store seam with filesystem and in-memory stores
//! - The store fetcher (gzip decoding, storage error translation, timeouts)
//! - Service configuration
//! - The request handler wiring fetcher and filter together

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod fetch;
pub mod handler;
pub mod store;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use fetch::{FetchOptions, StoreFetcher};
pub use handler::{RequestHandler, RequestParams};
pub use sheetq_filter::{make_filter, Envelope, TableFilter};
pub use sheetq_format::{FilterParams, MetadataMode, Response, Result, SheetError};
pub use store::{FsObjectStore, MemoryObjectStore, ObjectStore, StoreError, StoredObject};

use std::sync::Arc;

/// Fetch `key` from `container` and filter it with `params`.
///
/// Non-200 fetch results are returned without invoking the filter.
pub fn fetch_and_filter(
    store: Arc<dyn ObjectStore>,
    container: &str,
    key: &str,
    params: FilterParams,
    mode: MetadataMode,
) -> Result<Response> {
    let filter = TableFilter::with_mode(params, mode);
    let fetched = StoreFetcher::new(store).fetch(container, key)?;
    Ok(filter.apply(fetched))
}
