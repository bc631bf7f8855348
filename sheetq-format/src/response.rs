//! Transport-neutral responses produced by the fetcher, the filter and the handler

use crate::constants::{headers, MAX_HEADER_VALUE_LEN};
use bytes::Bytes;
use std::collections::BTreeMap;

/// Status, headers and body of a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Lower-case header names mapped to values
    pub headers: BTreeMap<String, String>,
    /// Body bytes
    pub body: Bytes,
}

impl Response {
    /// 200 response with the given body
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Empty-bodied response with no headers
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Bytes::new(),
        }
    }

    /// Empty-bodied response carrying a sanitized `x-error` header
    pub fn error(status: u16, message: &str) -> Self {
        Self::empty(status).with_header(headers::X_ERROR, clean_header_value(message))
    }

    /// Set a header, returning the response
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Header value by (case-insensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Make an arbitrary message safe to use as a header value.
///
/// Characters outside tab, `0x20..=0x7E` and `0x80..=0xFF` become spaces; the result is cut to
/// [`MAX_HEADER_VALUE_LEN`] characters.
pub fn clean_header_value(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\t' | '\u{20}'..='\u{7e}' | '\u{80}'..='\u{ff}' => c,
            _ => ' ',
        })
        .take(MAX_HEADER_VALUE_LEN)
        .collect()
}
