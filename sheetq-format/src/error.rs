//! Error types for sheetq

use thiserror::Error;

/// sheetq error types
#[derive(Debug, Error)]
pub enum SheetError {
    /// A required argument was empty (programming or configuration error).
    #[error("Unknown {0}, cannot fetch content")]
    MissingArgument(&'static str),
    /// The fetched document does not have a recognizable table shape.
    #[error("{0}")]
    InvalidDocument(String),
    /// None of the requested sheets exist in the document.
    #[error("filtered result does not contain selected sheet(s): {}", .requested.join(","))]
    SheetNotFound {
        /// Sheet names as requested by the caller
        requested: Vec<String>,
    },
    /// A request parameter could not be interpreted.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Raw parameter value
        value: String,
    },
    /// Stored body could not be decompressed.
    #[error("Decompression error: {0}")]
    Decompress(String),
    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
    /// JSON parsing or serialization failed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetError {
    /// HTTP status reported for this error when it ends a request.
    pub fn status(&self) -> u16 {
        match self {
            SheetError::SheetNotFound { .. } => 404,
            SheetError::InvalidParameter { .. } => 400,
            SheetError::InvalidDocument(_)
            | SheetError::Json(_)
            | SheetError::Decompress(_) => 502,
            SheetError::MissingArgument(_) | SheetError::Config(_) => 500,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SheetError>;
