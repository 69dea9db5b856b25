//! Feed providers.
//!
//! The dataset build consumes raw feed contents through the
//! `DataProvider` seam; everything about where bytes come from (live
//! HTTP, bundled snapshots, test fixtures) stays on this side of it.

use std::time::Duration;

use tracing::info;

use crate::error::{CountryError, CurrencyError};

/// Bundled snapshot of the primary (codes) feed.
const WORLDBANK_SNAPSHOT: &str = include_str!("../data/worldbank.json");
/// Bundled snapshot of the secondary (M49 classification) page.
const M49_SNAPSHOT: &str = include_str!("../data/un-m49.html");
/// Bundled snapshot of the currency rates feed.
const RATES_SNAPSHOT: &str = include_str!("../data/rates.json");

/// Supplies raw feed contents to the dataset build. `use_live` selects
/// between a live fetch and the provider's offline fallback; the
/// shipped implementation falls back to bundled snapshots.
pub trait DataProvider: Send + Sync {
    fn fetch_primary(&self, url: &str, use_live: bool) -> Result<String, CountryError>;
    fn fetch_secondary(&self, url: &str, use_live: bool) -> Result<String, CountryError>;
}

/// Supplies raw currency-rates feed contents.
pub trait RatesSource: Send + Sync {
    fn fetch_rates(&self, url: &str, use_live: bool) -> Result<String, CurrencyError>;
}

/// The shipped provider: blocking HTTP for live fetches, bundled
/// snapshots otherwise. The snapshots are stored in exactly the live
/// formats, so one parsing path serves both.
pub struct FeedClient {
    client: reqwest::blocking::Client,
}

impl FeedClient {
    /// 30 second timeout, explicit user agent.
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("countrymatch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build reqwest client");
        FeedClient { client }
    }

    /// Fetch a URL, failing on non-success status.
    fn fetch_text(&self, url: &str) -> Result<String, String> {
        info!("Fetching feed: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| format!("failed to fetch '{}': {}", url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "HTTP error fetching '{}': {} {}",
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ));
        }
        response
            .text()
            .map_err(|e| format!("failed to read response body from '{}': {}", url, e))
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        FeedClient::new()
    }
}

impl DataProvider for FeedClient {
    fn fetch_primary(&self, url: &str, use_live: bool) -> Result<String, CountryError> {
        if !use_live {
            return Ok(WORLDBANK_SNAPSHOT.to_string());
        }
        self.fetch_text(url).map_err(CountryError::Fetch)
    }

    fn fetch_secondary(&self, url: &str, use_live: bool) -> Result<String, CountryError> {
        if !use_live {
            return Ok(M49_SNAPSHOT.to_string());
        }
        self.fetch_text(url).map_err(CountryError::Fetch)
    }
}

impl RatesSource for FeedClient {
    fn fetch_rates(&self, url: &str, use_live: bool) -> Result<String, CurrencyError> {
        if !use_live {
            return Ok(RATES_SNAPSHOT.to_string());
        }
        self.fetch_text(url).map_err(CurrencyError::Fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_fetches_return_snapshots() {
        let client = FeedClient::new();
        let primary = client.fetch_primary("http://ignored.invalid/", false).unwrap();
        assert!(primary.trim_start().starts_with('['), "snapshot is a JSON array");
        let secondary = client.fetch_secondary("http://ignored.invalid/", false).unwrap();
        assert!(secondary.contains("downloadTableEN"));
        let rates = client.fetch_rates("http://ignored.invalid/", false).unwrap();
        assert!(rates.contains("\"rates\""));
    }

    #[test]
    fn test_live_fetch_failure_is_fetch_error() {
        let client = FeedClient::new();
        let err = client
            .fetch_primary("http://127.0.0.1:9/unreachable", true)
            .unwrap_err();
        assert!(matches!(err, CountryError::Fetch(_)));
    }
}
