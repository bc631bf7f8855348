//! Reserved keys, header names and fixed values

/// Envelope key carrying the response type (`sheet` or `multi-sheet`)
pub const TYPE_KEY: &str = ":type";

/// Envelope key carrying the multi-sheet format version
pub const VERSION_KEY: &str = ":version";

/// Document/envelope key listing the sheet names in declared order
pub const NAMES_KEY: &str = ":names";

/// Multi-sheet envelope version
pub const MULTI_SHEET_VERSION: u64 = 3;

/// `:type` value for a single table
pub const TYPE_SHEET: &str = "sheet";

/// `:type` value for two or more tables
pub const TYPE_MULTI_SHEET: &str = "multi-sheet";

/// Content type set on every filtered response
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Header names
pub mod headers {
    /// Response content type
    pub const CONTENT_TYPE: &str = "content-type";
    /// Last modification date of the stored object (IMF-fixdate)
    pub const LAST_MODIFIED: &str = "last-modified";
    /// Sanitized failure description on non-2xx responses
    pub const X_ERROR: &str = "x-error";
    /// Header counterpart of `:type`
    pub const X_DATA_TYPE: &str = "x-helix-data-type";
    /// Header counterpart of `:version`
    pub const X_DATA_VERSION: &str = "x-helix-data-version";
    /// Header counterpart of `:names`, comma-joined
    pub const X_SHEET_NAMES: &str = "x-helix-sheet-names";
}

/// Maximum length of a sanitized header value (characters)
pub const MAX_HEADER_VALUE_LEN: usize = 1024;
