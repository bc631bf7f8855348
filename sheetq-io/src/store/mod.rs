//! Object store seam
//!
//! The fetcher only needs a single get-object operation. Transport, authentication and retry
//! policy belong to the [`ObjectStore`] implementation.

pub mod fs;
pub mod memory;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

use bytes::Bytes;
use thiserror::Error;
use std::time::SystemTime;

/// Error codes treated as "object absent"
pub const NOT_FOUND_CODES: &[&str] = &["NoSuchKey", "NotFound", "AccessDenied"];

/// An object as returned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw (possibly compressed) body
    pub body: Bytes,
    /// Content encoding declared by the store (e.g. `gzip`)
    pub content_encoding: Option<String>,
    /// Content type declared by the store
    pub content_type: Option<String>,
    /// Last modification time
    pub last_modified: Option<SystemTime>,
}

impl StoredObject {
    /// Object with the given body and no metadata
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            content_encoding: None,
            content_type: None,
            last_modified: None,
        }
    }

    /// Set the content encoding
    pub fn with_content_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.content_encoding = Some(encoding.into());
        self
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the modification time
    pub fn with_last_modified(mut self, at: SystemTime) -> Self {
        self.last_modified = Some(at);
        self
    }
}

/// Failure reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.code, .http_status, .message))]
pub struct StoreError {
    /// Store error code (e.g. `NoSuchKey`, `AccessDenied`)
    pub code: Option<String>,
    /// HTTP status reported by the store
    pub http_status: Option<u16>,
    /// Free-form description
    pub message: String,
}

impl StoreError {
    /// Error with a code and status
    pub fn new(code: Option<&str>, http_status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            http_status,
            message: message.into(),
        }
    }

    /// Object does not exist
    pub fn no_such_key(key: &str) -> Self {
        Self::new(Some("NoSuchKey"), Some(404), format!("no such key: {key}"))
    }

    /// Caller may not read the object
    pub fn access_denied(key: &str) -> Self {
        Self::new(Some("AccessDenied"), Some(403), format!("access denied: {key}"))
    }

    /// Store answered with a bare HTTP status
    pub fn status(http_status: u16) -> Self {
        Self::new(None, Some(http_status), format!("status {http_status}"))
    }

    /// Failure without code or status
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(None, None, message)
    }

    /// The code if present, else the HTTP status, else the message
    pub fn cause(&self) -> String {
        describe(&self.code, &self.http_status, &self.message)
    }

    /// True when the failure means the object is absent or not readable
    pub fn is_not_found(&self) -> bool {
        match &self.code {
            Some(code) => NOT_FOUND_CODES.contains(&code.as_str()),
            None => self.http_status == Some(404),
        }
    }
}

fn describe(code: &Option<String>, http_status: &Option<u16>, message: &str) -> String {
    match (code, http_status) {
        (Some(code), _) => code.clone(),
        (None, Some(status)) => status.to_string(),
        (None, None) => message.to_string(),
    }
}

/// Read access to an object store
pub trait ObjectStore: Send + Sync {
    /// Fetch `key` from `container`
    fn get_object(&self, container: &str, key: &str) -> Result<StoredObject, StoreError>;
}
