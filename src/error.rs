use thiserror::Error;

/// Errors surfaced by country dataset construction and lookups.
#[derive(Debug, Error)]
pub enum CountryError {
    /// A feed could not be fetched (network failure, HTTP error status).
    #[error("Feed fetch failed: {0}")]
    Fetch(String),

    /// A feed was fetched but its contents could not be turned into a
    /// dataset (missing/empty classification table, malformed JSON).
    #[error("Country data error: {0}")]
    Data(String),

    /// A `require_*` lookup found no match for the given query.
    #[error("No country match for '{0}'")]
    NotFound(String),
}

/// Errors surfaced by currency rate loading and conversion.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// The rates feed (and fallback, if configured) could not be fetched.
    #[error("Rates fetch failed: {0}")]
    Fetch(String),

    /// The rates feed did not contain a usable rates table.
    #[error("Rates data error: {0}")]
    Data(String),

    /// The requested currency has no rate in the loaded table.
    #[error("Currency '{0}' is invalid")]
    InvalidCurrency(String),
}
