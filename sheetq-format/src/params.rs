//! Caller-supplied filter parameters and metadata conventions

use crate::table::Window;
use serde::Deserialize;

/// Filter parameters for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    /// Maximum rows per returned table
    pub limit: Option<usize>,
    /// First row per returned table (default 0)
    pub offset: Option<usize>,
    /// Sheets to select; empty selects every sheet
    pub sheets: Vec<String>,
}

impl FilterParams {
    /// Window described by `limit`/`offset`
    pub fn window(&self) -> Window {
        Window::new(self.limit, self.offset)
    }

    /// True when no parameter was given
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none() && self.sheets.is_empty()
    }
}

/// Where response metadata (`type`, `version`, sheet names) is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataMode {
    /// Inline `:type`/`:version`/`:names` envelope fields only
    Envelope,
    /// `x-helix-data-*` headers only
    Headers,
    /// Envelope fields and headers
    #[default]
    Both,
}

impl MetadataMode {
    /// Envelope fields are written into the body
    pub fn in_envelope(self) -> bool {
        matches!(self, MetadataMode::Envelope | MetadataMode::Both)
    }

    /// Metadata headers are set on the response
    pub fn in_headers(self) -> bool {
        matches!(self, MetadataMode::Headers | MetadataMode::Both)
    }
}

impl std::str::FromStr for MetadataMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "envelope" => Ok(MetadataMode::Envelope),
            "headers" => Ok(MetadataMode::Headers),
            "both" => Ok(MetadataMode::Both),
            other => Err(format!(
                "unknown metadata mode '{other}' (expected envelope, headers or both)"
            )),
        }
    }
}
