//! Country name and ISO code resolution against the UN M49
//! classification.
//!
//! Free-form country strings (abbreviated, misspelled, parenthetical,
//! dataset-mangled) are resolved to canonical ISO alpha-3 codes with an
//! explicit confidence flag, and region/sub-region keys map to their
//! member countries. Reference data merges a codes feed with the UN M49
//! classification table; bundled snapshots serve as the offline system
//! of record, with live fetching available per handle.
//!
//! # Architecture
//!
//! - **matcher**: abbreviation expansion, name simplification,
//!   qualifier scoring (pure string work, no dataset access)
//! - **dataset**: feed parsing, merged records, indexes, and the
//!   lazily-rebuilt [`DatasetHandle`]
//! - **resolver**: the exact-then-fuzzy cascade behind
//!   [`CountryResolver`]
//! - **provider**: the [`DataProvider`] seam between the dataset build
//!   and feed I/O
//! - **currency**: USD conversion from a rates feed
//!
//! # Example
//!
//! ```
//! use countrymatch::CountryResolver;
//!
//! let resolver = CountryResolver::new();
//!
//! assert_eq!(resolver.code_from_name("jpn").unwrap().as_deref(), Some("JPN"));
//!
//! let guess = resolver.fuzzy_code_from_name("United Kingdom").unwrap().unwrap();
//! assert_eq!(guess.iso3, "GBR");
//! assert!(!guess.exact);
//!
//! let channel_islands = resolver.countries_in_region("Channel Islands").unwrap();
//! assert_eq!(channel_islands, ["GGY", "JEY"]);
//! ```

pub mod currency;
pub mod dataset;
mod error;
pub mod matcher;
pub mod provider;
mod resolver;

pub use currency::CurrencyConverter;
pub use dataset::{CountryRecord, Dataset, DatasetHandle, FeedConfig, RegionIndex};
pub use error::{CountryError, CurrencyError};
pub use matcher::{expand_abbreviations, simplify_name, SimplifiedName};
pub use provider::{DataProvider, FeedClient, RatesSource};
pub use resolver::{CountryResolver, FuzzyMatch};
