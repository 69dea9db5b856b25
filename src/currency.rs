//! Currency conversion against a USD-based rates feed.
//!
//! Rates are fetched lazily on first use and cached until
//! [`CurrencyConverter::invalidate`], mirroring the country dataset's
//! handle semantics. The feed is a JSON document with a `rates` table of
//! per-currency rates quoted against USD; a caller-supplied fallback URL
//! is consulted when the primary fetch fails.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::CurrencyError;
use crate::provider::{FeedClient, RatesSource};

/// Default rates feed location.
pub const RATES_URL: &str = "https://api.exchangerate.host/latest?base=usd";

#[derive(Debug, Deserialize)]
struct RatesDocument {
    rates: HashMap<String, f64>,
}

/// Converts amounts in other currencies to USD using lazily loaded
/// rates.
pub struct CurrencyConverter {
    source: Box<dyn RatesSource>,
    rates_url: Mutex<String>,
    fallback_url: Mutex<Option<String>>,
    use_live: Mutex<bool>,
    cell: Mutex<Option<Arc<HashMap<String, f64>>>>,
}

impl CurrencyConverter {
    /// Converter using the shipped feed client (bundled snapshot until
    /// live fetching is enabled).
    pub fn new() -> Self {
        CurrencyConverter::with_source(Box::new(FeedClient::new()))
    }

    /// Converter backed by a custom rates source.
    pub fn with_source(source: Box<dyn RatesSource>) -> Self {
        CurrencyConverter {
            source,
            rates_url: Mutex::new(RATES_URL.to_string()),
            fallback_url: Mutex::new(None),
            use_live: Mutex::new(false),
            cell: Mutex::new(None),
        }
    }

    /// Replace the rates feed URL (`None` restores the default). Takes
    /// effect on the next rates load.
    pub fn set_rates_url(&self, url: Option<&str>) {
        *self.rates_url.lock().expect("rates url lock poisoned") =
            url.unwrap_or(RATES_URL).to_string();
    }

    /// Set a fallback rates URL tried when the primary fetch fails.
    pub fn set_fallback_url(&self, url: Option<&str>) {
        *self.fallback_url.lock().expect("fallback url lock poisoned") =
            url.map(str::to_string);
    }

    /// Switch between the live feed and the bundled snapshot. Takes
    /// effect on the next rates load.
    pub fn set_use_live(&self, use_live: bool) {
        *self.use_live.lock().expect("use_live lock poisoned") = use_live;
    }

    /// Drop the cached rates; the next conversion reloads them.
    pub fn invalidate(&self) {
        *self.cell.lock().expect("rates lock poisoned") = None;
    }

    /// Current USD value of `value` in `currency` (case-insensitive).
    pub fn value_in_usd(&self, value: f64, currency: &str) -> Result<f64, CurrencyError> {
        let currency = currency.trim().to_uppercase();
        if currency == "USD" {
            return Ok(value);
        }
        let rates = self.rates()?;
        match rates.get(&currency) {
            Some(rate) => Ok(value / rate),
            None => Err(CurrencyError::InvalidCurrency(currency)),
        }
    }

    fn rates(&self) -> Result<Arc<HashMap<String, f64>>, CurrencyError> {
        let mut cell = self.cell.lock().expect("rates lock poisoned");
        if let Some(rates) = cell.as_ref() {
            return Ok(Arc::clone(rates));
        }
        let url = self.rates_url.lock().expect("rates url lock poisoned").clone();
        let use_live = *self.use_live.lock().expect("use_live lock poisoned");
        let body = match self.source.fetch_rates(&url, use_live) {
            Ok(body) => body,
            Err(primary_err) => {
                let fallback =
                    self.fallback_url.lock().expect("fallback url lock poisoned").clone();
                match fallback {
                    Some(fallback_url) => {
                        warn!(
                            "Primary rates fetch failed ({}), trying fallback {}",
                            primary_err, fallback_url
                        );
                        self.source.fetch_rates(&fallback_url, use_live)?
                    }
                    None => return Err(primary_err),
                }
            }
        };
        let document: RatesDocument = serde_json::from_str(&body)
            .map_err(|e| CurrencyError::Data(format!("rates feed is not valid JSON: {}", e)))?;
        info!("Loaded {} currency rates", document.rates.len());
        let rates = Arc::new(
            document
                .rates
                .into_iter()
                .map(|(currency, rate)| (currency.to_uppercase(), rate))
                .collect::<HashMap<_, _>>(),
        );
        *cell = Some(Arc::clone(&rates));
        Ok(rates)
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        CurrencyConverter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rates source that fails on one URL and serves fixed JSON on the
    /// other.
    struct StubSource {
        fail_url: &'static str,
        body: &'static str,
    }

    impl RatesSource for StubSource {
        fn fetch_rates(&self, url: &str, _use_live: bool) -> Result<String, CurrencyError> {
            if url == self.fail_url {
                Err(CurrencyError::Fetch(format!("unreachable: {}", url)))
            } else {
                Ok(self.body.to_string())
            }
        }
    }

    #[test]
    fn test_usd_is_identity_without_any_fetch() {
        let converter = CurrencyConverter::with_source(Box::new(StubSource {
            fail_url: RATES_URL,
            body: "{}",
        }));
        assert_eq!(converter.value_in_usd(10.0, "usd").unwrap(), 10.0);
    }

    #[test]
    fn test_conversion_divides_by_rate() {
        let converter = CurrencyConverter::with_source(Box::new(StubSource {
            fail_url: "none",
            body: r#"{"base": "USD", "rates": {"gbp": 0.5}}"#,
        }));
        assert_eq!(converter.value_in_usd(4.0, "GBP").unwrap(), 8.0);
        // round trip through the same rate
        let usd_of_one = converter.value_in_usd(1.0, "gbp").unwrap();
        assert_ne!(usd_of_one, 1.0);
        assert_eq!(converter.value_in_usd(10.0 / usd_of_one, "GBP").unwrap(), 10.0);
    }

    #[test]
    fn test_unknown_currency_is_invalid() {
        let converter = CurrencyConverter::with_source(Box::new(StubSource {
            fail_url: "none",
            body: r#"{"rates": {"GBP": 0.8}}"#,
        }));
        assert!(matches!(
            converter.value_in_usd(10.0, "XYZ"),
            Err(CurrencyError::InvalidCurrency(c)) if c == "XYZ"
        ));
    }

    #[test]
    fn test_fallback_url_used_when_primary_fails() {
        let converter = CurrencyConverter::with_source(Box::new(StubSource {
            fail_url: "http://fail.invalid/",
            body: r#"{"rates": {"GBP": 0.5}}"#,
        }));
        converter.set_rates_url(Some("http://fail.invalid/"));

        // without a fallback the failure propagates
        assert!(matches!(
            converter.value_in_usd(1.0, "gbp"),
            Err(CurrencyError::Fetch(_))
        ));

        converter.set_fallback_url(Some("http://fallback.invalid/"));
        assert_eq!(converter.value_in_usd(1.0, "gbp").unwrap(), 2.0);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let converter = CurrencyConverter::with_source(Box::new(StubSource {
            fail_url: "none",
            body: r#"{"rates": {"GBP": 0.5}}"#,
        }));
        assert_eq!(converter.value_in_usd(1.0, "gbp").unwrap(), 2.0);

        converter.set_rates_url(Some("none"));
        converter.invalidate();
        assert!(matches!(
            converter.value_in_usd(1.0, "gbp"),
            Err(CurrencyError::Fetch(_))
        ));
    }

    #[test]
    fn test_malformed_rates_is_data_error() {
        let converter = CurrencyConverter::with_source(Box::new(StubSource {
            fail_url: "none",
            body: "not json",
        }));
        assert!(matches!(
            converter.value_in_usd(1.0, "gbp"),
            Err(CurrencyError::Data(_))
        ));
    }
}
