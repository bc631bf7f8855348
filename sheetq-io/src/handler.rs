//! Request handler: query parameters in, filtered response out

use crate::config::ServiceConfig;
use crate::fetch::StoreFetcher;
use crate::store::ObjectStore;
use sheetq_filter::TableFilter;
use sheetq_format::{FilterParams, Response, SheetError};
use std::sync::Arc;
use tracing::error;
use url::{form_urlencoded, Url};

/// Raw query parameters of a filter request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// `contentBusId`
    pub content_bus_id: Option<String>,
    /// `contentBusPartition`
    pub partition: Option<String>,
    /// `limit`, unparsed
    pub limit: Option<String>,
    /// `offset`, unparsed
    pub offset: Option<String>,
    /// Every `sheet` value, in request order
    pub sheets: Vec<String>,
}

impl RequestParams {
    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// Repeated single-valued parameters keep the last value; `sheet` keeps every value.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (name, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let value = value.into_owned();
            match name.as_ref() {
                "contentBusId" => params.content_bus_id = Some(value),
                "contentBusPartition" => params.partition = Some(value),
                "limit" => params.limit = Some(value),
                "offset" => params.offset = Some(value),
                "sheet" => params.sheets.push(value),
                _ => {}
            }
        }
        params
    }

    /// True when at least one of `limit`, `offset` or `sheet` was given
    pub fn has_filter(&self) -> bool {
        self.limit.is_some() || self.offset.is_some() || !self.sheets.is_empty()
    }

    /// Convert into filter parameters, parsing the numeric values
    pub fn filter_params(&self) -> Result<FilterParams, SheetError> {
        Ok(FilterParams {
            limit: parse_count("limit", self.limit.as_deref())?,
            offset: parse_count("offset", self.offset.as_deref())?,
            sheets: self.sheets.clone(),
        })
    }
}

fn parse_count(name: &'static str, value: Option<&str>) -> Result<Option<usize>, SheetError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| SheetError::InvalidParameter {
                name,
                value: raw.to_string(),
            }),
    }
}

/// Runs the validate → fetch → filter pipeline for one request at a time.
///
/// Holds no per-request state; concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    fetcher: StoreFetcher,
    config: ServiceConfig,
}

impl RequestHandler {
    /// Create a handler over `store`
    pub fn new(store: Arc<dyn ObjectStore>, config: ServiceConfig) -> Self {
        let fetcher = StoreFetcher::with_options(store, config.fetch_options());
        Self { fetcher, config }
    }

    /// Configuration in effect
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Storage key for a request: `{contentBusId}/{partition}{suffix}`
    pub fn storage_key(&self, content_bus_id: &str, partition: Option<&str>, suffix: &str) -> String {
        let partition = partition
            .filter(|p| !p.is_empty())
            .unwrap_or(self.config.default_partition.as_str());
        format!("{content_bus_id}/{partition}{suffix}")
    }

    /// Handle a request target such as `/data/index.json?contentBusId=abc&limit=10`
    pub fn handle_target(&self, target: &str) -> Response {
        let parsed = Url::parse("http://localhost/").and_then(|base| base.join(target));
        match parsed {
            Ok(url) => self.handle(url.path(), url.query().unwrap_or_default()),
            Err(e) => reject(400, &format!("invalid request target: {e}")),
        }
    }

    /// Handle a request for resource `suffix` with the raw `query` string
    pub fn handle(&self, suffix: &str, query: &str) -> Response {
        let params = RequestParams::parse(query);

        let content_bus_id = match params.content_bus_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => return reject(400, "missing contentBusId"),
        };
        if !suffix.ends_with(".json") {
            return reject(400, "only json resources supported.");
        }
        if !params.has_filter() {
            return reject(400, "no filter params specified. use direct access.");
        }
        let filter = match params.filter_params() {
            Ok(filter_params) => TableFilter::with_mode(filter_params, self.config.metadata),
            Err(err) => return reject(err.status(), &err.to_string()),
        };

        let key = self.storage_key(content_bus_id, params.partition.as_deref(), suffix);
        let fetched = match self.fetcher.fetch(&self.config.bucket, &key) {
            Ok(response) => response,
            Err(err) => return reject(err.status(), &err.to_string()),
        };
        if fetched.status != 200 {
            return fetched;
        }
        filter.apply(fetched)
    }
}

fn reject(status: u16, message: &str) -> Response {
    error!(status, "{message}");
    Response::error(status, message)
}
