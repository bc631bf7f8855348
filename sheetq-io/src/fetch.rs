//! Store fetcher: one get-object call mapped onto a uniform response

use crate::store::{ObjectStore, StoreError, StoredObject};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use sheetq_format::constants::headers;
use sheetq_format::{Response, Result, SheetError};
use std::io::Read;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info};

/// Fetch options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Give up waiting for the store after this long; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

/// Fetches objects and translates store outcomes into responses.
///
/// Every call performs exactly one `get_object` and never retries.
#[derive(Clone)]
pub struct StoreFetcher {
    store: Arc<dyn ObjectStore>,
    options: FetchOptions,
}

impl std::fmt::Debug for StoreFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreFetcher")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl StoreFetcher {
    /// Create a fetcher without a timeout
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_options(store, FetchOptions::default())
    }

    /// Create a fetcher with explicit options
    pub fn with_options(store: Arc<dyn ObjectStore>, options: FetchOptions) -> Self {
        Self { store, options }
    }

    /// Fetch options in effect
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch `key` from `container`.
    ///
    /// Returns `Err` only for empty arguments, before any store call. Store outcomes map to:
    /// - success: 200 with the (decompressed) body, `last-modified` and `content-type` when known
    /// - absent or access denied: 404 with an empty body
    /// - anything else: 502 with an `x-error` header naming the store's cause
    pub fn fetch(&self, container: &str, key: &str) -> Result<Response> {
        if container.is_empty() {
            return Err(SheetError::MissingArgument("bucketId"));
        }
        if key.is_empty() {
            return Err(SheetError::MissingArgument("key"));
        }

        let response = match self.get_object(container, key) {
            Ok(object) => match into_response(object) {
                Ok(response) => {
                    debug!(container, key, bytes = response.body.len(), "fetched object");
                    response
                }
                Err(err) => {
                    error!(container, key, "Error while decoding file from {container}/{key}: {err}");
                    Response::error(502, &format!("error while fetching: {err}"))
                }
            },
            Err(err) if err.is_not_found() => {
                info!(container, key, code = %err.cause(), "Could not find file at {container}/{key}: {}", err.cause());
                Response::empty(404)
            }
            Err(err) => {
                error!(container, key, code = %err.cause(), "Error while fetching file from {container}/{key}: {}", err.cause());
                Response::error(502, &format!("error while fetching: {}", err.cause()))
            }
        };
        Ok(response)
    }

    fn get_object(&self, container: &str, key: &str) -> std::result::Result<StoredObject, StoreError> {
        let Some(timeout) = self.options.timeout else {
            return self.store.get_object(container, key);
        };

        // the worker is abandoned on timeout; the store call itself cannot be cancelled
        let (tx, rx) = mpsc::channel();
        let store = Arc::clone(&self.store);
        let (worker_container, worker_key) = (container.to_string(), key.to_string());
        thread::Builder::new()
            .name("sheetq-fetch".to_string())
            .spawn(move || {
                let _ = tx.send(store.get_object(&worker_container, &worker_key));
            })
            .map_err(|e| StoreError::other(format!("failed to spawn fetch worker: {e}")))?;

        match rx.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(StoreError::other(format!(
                "timeout after {}ms",
                timeout.as_millis()
            ))),
            Err(RecvTimeoutError::Disconnected) => {
                Err(StoreError::other("fetch worker terminated"))
            }
        }
    }
}

fn into_response(object: StoredObject) -> Result<Response> {
    let gzipped = object
        .content_encoding
        .as_deref()
        .map(|enc| enc.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false);
    let body = if gzipped {
        gunzip(&object.body)?
    } else {
        object.body
    };

    let mut response = Response::ok(body);
    if let Some(at) = object.last_modified {
        response = response.with_header(headers::LAST_MODIFIED, http_date(at));
    }
    if let Some(content_type) = object.content_type {
        response = response.with_header(headers::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

/// Decompress a gzip body
pub fn gunzip(data: &[u8]) -> Result<Bytes> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4));
    decoder
        .read_to_end(&mut out)
        .map_err(|e| SheetError::Decompress(e.to_string()))?;
    Ok(Bytes::from(out))
}

/// Format a time as an HTTP date (`Mon, 12 Oct 2009 17:50:00 GMT`)
pub fn http_date(at: SystemTime) -> String {
    DateTime::<Utc>::from(at)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
