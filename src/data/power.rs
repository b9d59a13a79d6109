//! NASA POWER daily-point API integration.

use reqwest::blocking::{Client, Request};

use crate::config::SiteConfig;
use crate::data::cache::{CacheKey, FetchCache};
use crate::data::parse::{ClimateTable, parse_power_csv};
use crate::domain::{API_DATE_FORMAT, DateRange};
use crate::error::AppError;

/// Anything that can return the raw CSV body for a query.
///
/// `PowerClient` is the production implementation; tests plug in canned text.
pub trait ClimateSource {
    fn fetch_csv(&self, parameters: &str, range: DateRange) -> Result<String, AppError>;
}

pub struct PowerClient {
    client: Client,
    config: SiteConfig,
}

impl PowerClient {
    pub fn new(config: SiteConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Build (but do not send) the GET request for a query.
    pub fn build_request(&self, parameters: &str, range: DateRange) -> Result<Request, AppError> {
        let start = range.start().format(API_DATE_FORMAT).to_string();
        let end = range.end().format(API_DATE_FORMAT).to_string();
        let longitude = self.config.longitude.to_string();
        let latitude = self.config.latitude.to_string();
        self.client
            .get(&self.config.base_url)
            .query(&[
                ("parameters", parameters),
                ("community", self.config.community.as_str()),
                ("longitude", longitude.as_str()),
                ("latitude", latitude.as_str()),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("format", "CSV"),
            ])
            .build()
            .map_err(|e| AppError::Fetch(format!("invalid request: {e}")))
    }
}

impl ClimateSource for PowerClient {
    fn fetch_csv(&self, parameters: &str, range: DateRange) -> Result<String, AppError> {
        let request = self.build_request(parameters, range)?;
        log::info!("GET {}", request.url());

        let resp = self
            .client
            .execute(request)
            .map_err(|e| AppError::Fetch(format!("POWER request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Fetch(format!(
                "POWER request failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::Fetch(format!("failed to read POWER response: {e}")))?;
        log::debug!("received {} bytes", body.len());
        Ok(body)
    }
}

/// Fetch and parse a table, going through `cache` first.
pub fn load_table<S: ClimateSource + ?Sized>(
    source: &S,
    cache: &mut FetchCache,
    parameters: &str,
    range: DateRange,
) -> Result<ClimateTable, AppError> {
    let key = CacheKey::new(parameters, range);
    if let Some(table) = cache.get(&key) {
        log::debug!("cache hit for {} {}..{}", key.parameters, key.start, key.end);
        return Ok(table.clone());
    }

    let body = source.fetch_csv(parameters, range)?;
    let table = parse_power_csv(&body)?;
    log::info!(
        "parsed {} rows, columns {:?}",
        table.row_count(),
        table.columns()
    );
    cache.insert(key, table.clone());
    Ok(table)
}
