//! Reference dataset: feed parsing, merged records, lookup indexes, and
//! the lazily-rebuilt process-wide handle.
//!
//! # Architecture
//!
//! - **Feeds**: a primary JSON feed supplies codes (iso3/iso2) and
//!   names; a secondary HTML feed supplies the M49 classification table
//!   and the official names. Manual iso3 -> iso2 overrides merge last.
//! - **Dataset**: immutable once built. Records live in a `BTreeMap`
//!   keyed by iso3, which fixes the dataset iteration order (ascending
//!   iso3) used by every index.
//! - **Handle**: `DatasetHandle` builds on first use, swaps the whole
//!   dataset atomically, and rebuilds after `invalidate()`. Source
//!   configuration only takes effect on the next build.

mod aliases;
mod primary;
mod record;
mod region;
mod secondary;

pub use record::CountryRecord;
pub use region::RegionIndex;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::error::CountryError;
use crate::matcher::simplify_name;
use crate::provider::{DataProvider, FeedClient};

use aliases::COMMON_ALIASES;
use primary::parse_primary;
use secondary::parse_secondary;

/// Default primary feed location (country codes and names).
pub const PRIMARY_URL: &str = "https://api.worldbank.org/v2/country?format=json&per_page=10000";
/// Default secondary feed location (UN M49 overview page).
pub const SECONDARY_URL: &str = "https://unstats.un.org/unsd/methodology/m49/overview/";
/// Default element id of the classification table within the secondary page.
pub const TABLE_NAME: &str = "downloadTableEN";

/// Source configuration captured at build time. Changing it never
/// touches an already-built dataset; it applies on the next build.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub primary_url: String,
    pub secondary_url: String,
    pub table_name: String,
    /// Fetch live feeds instead of the bundled snapshots.
    pub use_live: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            primary_url: PRIMARY_URL.to_string(),
            secondary_url: SECONDARY_URL.to_string(),
            table_name: TABLE_NAME.to_string(),
            use_live: false,
        }
    }
}

/// Precomputed fuzzy-matching view of one record name.
#[derive(Debug)]
pub(crate) struct NameEntry {
    pub iso3: String,
    /// Uppercased official name, used for the shortest-name tie-break.
    pub name: String,
    pub core_tokens: Vec<String>,
    pub core_nospace: String,
    pub qualifiers: Vec<String>,
}

/// Immutable reference dataset. All lookups are read-only; a rebuild
/// produces a fresh `Dataset` and swaps it in at the handle.
#[derive(Debug)]
pub struct Dataset {
    by_iso3: BTreeMap<String, CountryRecord>,
    iso2_to_iso3: HashMap<String, String>,
    names: HashMap<String, String>,
    name_entries: Vec<NameEntry>,
    aliases: HashMap<String, String>,
    regions: RegionIndex,
}

impl Dataset {
    /// Build a dataset from raw feed contents. Pure: no I/O, no shared
    /// state; a failure leaves nothing behind.
    pub(crate) fn build(
        primary_json: &str,
        secondary_html: &str,
        table_name: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<Dataset, CountryError> {
        let primary_entries = parse_primary(primary_json)?;
        let classification = parse_secondary(secondary_html, table_name)?;

        let mut iso2_by_iso3: HashMap<String, String> = HashMap::new();
        for entry in &primary_entries {
            iso2_by_iso3.insert(entry.iso3.clone(), entry.iso2.clone());
        }

        let mut by_iso3: BTreeMap<String, CountryRecord> = BTreeMap::new();
        for row in classification {
            let iso2 = iso2_by_iso3.get(&row.iso3).cloned().unwrap_or_default();
            by_iso3.insert(
                row.iso3.clone(),
                CountryRecord {
                    iso3: row.iso3,
                    iso2,
                    name: row.name,
                    m49: row.m49,
                    global_code: row.global_code,
                    global_name: row.global_name,
                    region_code: row.region_code,
                    region_name: row.region_name,
                    subregion_code: row.subregion_code,
                    subregion_name: row.subregion_name,
                    intermediate_region_code: row.intermediate_region_code,
                    intermediate_region_name: row.intermediate_region_name,
                    ldc: row.ldc,
                    lldc: row.lldc,
                    sids: row.sids,
                    developed: row.developed,
                },
            );
        }

        // Primary-only rows become records with empty classification.
        for entry in primary_entries {
            by_iso3.entry(entry.iso3.clone()).or_insert_with(|| CountryRecord {
                iso3: entry.iso3,
                iso2: entry.iso2,
                name: entry.name,
                ..Default::default()
            });
        }

        // Manual corrections win over both feeds.
        for (iso3, iso2) in overrides {
            let iso3 = iso3.trim().to_uppercase();
            match by_iso3.get_mut(&iso3) {
                Some(record) => record.iso2 = iso2.trim().to_uppercase(),
                None => warn!("Ignoring iso2 override for unknown iso3 '{}'", iso3),
            }
        }

        let mut iso2_to_iso3 = HashMap::new();
        let mut names = HashMap::new();
        let mut name_entries = Vec::with_capacity(by_iso3.len());
        let mut regions = RegionIndex::default();
        for record in by_iso3.values() {
            if !record.iso2.is_empty() {
                if let Some(existing) =
                    iso2_to_iso3.insert(record.iso2.clone(), record.iso3.clone())
                {
                    warn!(
                        "iso2 '{}' is claimed by both {} and {}",
                        record.iso2, existing, record.iso3
                    );
                }
            }
            let upper_name = record.name.to_uppercase();
            if let Some(existing) = names.insert(upper_name.clone(), record.iso3.clone()) {
                warn!("Name '{}' is claimed by both {} and {}", record.name, existing, record.iso3);
            }
            let simplified = simplify_name(&record.name);
            name_entries.push(NameEntry {
                iso3: record.iso3.clone(),
                name: upper_name,
                core_nospace: simplified.core_nospace(),
                core_tokens: simplified.core_tokens,
                qualifiers: simplified.qualifiers,
            });
            regions.insert(record);
        }

        let aliases = COMMON_ALIASES
            .iter()
            .filter(|(_, iso3)| by_iso3.contains_key(*iso3))
            .map(|(alias, iso3)| (alias.to_string(), iso3.to_string()))
            .collect();

        Ok(Dataset {
            by_iso3,
            iso2_to_iso3,
            names,
            name_entries,
            aliases,
            regions,
        })
    }

    pub fn len(&self) -> usize {
        self.by_iso3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_iso3.is_empty()
    }

    /// Record by uppercased iso3 code.
    pub fn record(&self, iso3: &str) -> Option<&CountryRecord> {
        self.by_iso3.get(iso3)
    }

    /// All records in dataset iteration order (ascending iso3).
    pub fn records(&self) -> impl Iterator<Item = &CountryRecord> {
        self.by_iso3.values()
    }

    pub fn regions(&self) -> &RegionIndex {
        &self.regions
    }

    pub(crate) fn iso3_for_iso2(&self, iso2: &str) -> Option<&str> {
        self.iso2_to_iso3.get(iso2).map(String::as_str)
    }

    pub(crate) fn iso3_for_name(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub(crate) fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub(crate) fn name_entries(&self) -> &[NameEntry] {
        &self.name_entries
    }
}

/// Shared owner of the dataset with lazy build and explicit
/// invalidation.
///
/// The dataset is absent until the first lookup (or after
/// `invalidate()`); the first access builds it from the configured
/// sources. The build-if-absent check-and-set runs under one mutex so
/// concurrent first use cannot trigger overlapping builds; readers get
/// `Arc` snapshots and are never exposed to a partially built dataset.
pub struct DatasetHandle {
    provider: Box<dyn DataProvider>,
    config: Mutex<FeedConfig>,
    overrides: Mutex<HashMap<String, String>>,
    cell: Mutex<Option<Arc<Dataset>>>,
}

impl DatasetHandle {
    /// Handle using the shipped feed client (bundled snapshots unless
    /// live fetching is enabled).
    pub fn new() -> Self {
        DatasetHandle::with_provider(Box::new(FeedClient::new()))
    }

    /// Handle backed by a custom provider (test doubles, other feeds).
    pub fn with_provider(provider: Box<dyn DataProvider>) -> Self {
        DatasetHandle {
            provider,
            config: Mutex::new(FeedConfig::default()),
            overrides: Mutex::new(HashMap::new()),
            cell: Mutex::new(None),
        }
    }

    /// The dataset, building it first if absent. Build failures leave
    /// the handle unbuilt; the next access retries.
    pub fn get(&self) -> Result<Arc<Dataset>, CountryError> {
        let mut cell = self.cell.lock().expect("dataset lock poisoned");
        if let Some(dataset) = cell.as_ref() {
            return Ok(Arc::clone(dataset));
        }
        let config = self.config.lock().expect("config lock poisoned").clone();
        let overrides = self.overrides.lock().expect("overrides lock poisoned").clone();
        info!(
            "Building country dataset (live: {}, table: {})",
            config.use_live, config.table_name
        );
        let primary = self
            .provider
            .fetch_primary(&config.primary_url, config.use_live)?;
        let secondary = self
            .provider
            .fetch_secondary(&config.secondary_url, config.use_live)?;
        let dataset = Arc::new(Dataset::build(
            &primary,
            &secondary,
            &config.table_name,
            &overrides,
        )?);
        info!("Built country dataset with {} records", dataset.len());
        *cell = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the built dataset; the next lookup rebuilds from the
    /// then-current configuration.
    pub fn invalidate(&self) {
        *self.cell.lock().expect("dataset lock poisoned") = None;
    }

    /// Replace the primary feed URL (`None` restores the default).
    /// Takes effect on the next build.
    pub fn set_primary_url(&self, url: Option<&str>) {
        let mut config = self.config.lock().expect("config lock poisoned");
        config.primary_url = url.unwrap_or(PRIMARY_URL).to_string();
    }

    /// Replace the secondary feed URL (`None` restores the default).
    /// Takes effect on the next build.
    pub fn set_secondary_url(&self, url: Option<&str>) {
        let mut config = self.config.lock().expect("config lock poisoned");
        config.secondary_url = url.unwrap_or(SECONDARY_URL).to_string();
    }

    /// Replace the classification table id (`None` restores the
    /// default). Takes effect on the next build.
    pub fn set_table_name(&self, table_name: Option<&str>) {
        let mut config = self.config.lock().expect("config lock poisoned");
        config.table_name = table_name.unwrap_or(TABLE_NAME).to_string();
    }

    /// Switch between live feeds and the bundled snapshots. Takes
    /// effect on the next build.
    pub fn set_use_live(&self, use_live: bool) {
        self.config.lock().expect("config lock poisoned").use_live = use_live;
    }

    /// Replace the manual iso3 -> iso2 corrections. Takes effect on the
    /// next build.
    pub fn set_overrides(&self, overrides: HashMap<String, String>) {
        *self.overrides.lock().expect("overrides lock poisoned") = overrides;
    }

    /// Build directly from caller-supplied feed contents and publish the
    /// result, bypassing the provider. On failure the previously built
    /// dataset (if any) stays in place.
    pub fn set_data(
        &self,
        primary_json: &str,
        secondary_html: &str,
        overrides: HashMap<String, String>,
    ) -> Result<(), CountryError> {
        let table_name = self.config.lock().expect("config lock poisoned").table_name.clone();
        let dataset = Dataset::build(primary_json, secondary_html, &table_name, &overrides)?;
        info!("Injected country dataset with {} records", dataset.len());
        *self.overrides.lock().expect("overrides lock poisoned") = overrides;
        *self.cell.lock().expect("dataset lock poisoned") = Some(Arc::new(dataset));
        Ok(())
    }
}

impl Default for DatasetHandle {
    fn default() -> Self {
        DatasetHandle::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: &str = r#"[
        {"page": 1},
        [
            {"id": "JPN", "iso2Code": "JP", "name": "Japan"},
            {"id": "GGY", "iso2Code": "GG", "name": "Guernsey"},
            {"id": "SSD", "iso2Code": "SS", "name": "South Sudan"}
        ]
    ]"#;

    fn secondary(rows: &str) -> String {
        format!(
            "<table id=\"downloadTableEN\"><tr>\
             <th>Region Code</th><th>Region Name</th><th>Sub-region Code</th>\
             <th>Sub-region Name</th><th>Intermediate Region Code</th>\
             <th>Intermediate Region Name</th><th>Country or Area</th>\
             <th>M49 Code</th><th>ISO-alpha3 Code</th></tr>{}</table>",
            rows
        )
    }

    fn sample_secondary() -> String {
        secondary(
            "<tr><td>142</td><td>Asia</td><td>030</td><td>Eastern Asia</td><td></td><td></td>\
             <td>Japan</td><td>392</td><td>JPN</td></tr>\
             <tr><td>150</td><td>Europe</td><td>154</td><td>Northern Europe</td><td>830</td>\
             <td>Channel Islands</td><td>Guernsey</td><td>831</td><td>GGY</td></tr>",
        )
    }

    #[test]
    fn test_build_merges_iso2_from_primary() {
        let dataset =
            Dataset::build(PRIMARY, &sample_secondary(), "downloadTableEN", &HashMap::new())
                .expect("build should succeed");
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.record("JPN").unwrap().iso2, "JP");
        assert_eq!(dataset.record("JPN").unwrap().subregion_name, "Eastern Asia");
        assert_eq!(dataset.iso3_for_iso2("GG"), Some("GGY"));
    }

    #[test]
    fn test_primary_only_rows_keep_empty_classification() {
        let dataset =
            Dataset::build(PRIMARY, &sample_secondary(), "downloadTableEN", &HashMap::new())
                .unwrap();
        let ssd = dataset.record("SSD").expect("primary-only record kept");
        assert_eq!(ssd.name, "South Sudan");
        assert_eq!(ssd.region_name, "");
        // and its name is findable
        assert_eq!(dataset.iso3_for_name("SOUTH SUDAN"), Some("SSD"));
    }

    #[test]
    fn test_overrides_merge_last() {
        let overrides = HashMap::from([("jpn".to_string(), "xj".to_string())]);
        let dataset =
            Dataset::build(PRIMARY, &sample_secondary(), "downloadTableEN", &overrides).unwrap();
        assert_eq!(dataset.record("JPN").unwrap().iso2, "XJ");
        assert_eq!(dataset.iso3_for_iso2("XJ"), Some("JPN"));
        assert_eq!(dataset.iso3_for_iso2("JP"), None);
    }

    #[test]
    fn test_records_iterate_in_iso3_order() {
        let dataset =
            Dataset::build(PRIMARY, &sample_secondary(), "downloadTableEN", &HashMap::new())
                .unwrap();
        let codes: Vec<&str> = dataset.records().map(|r| r.iso3.as_str()).collect();
        assert_eq!(codes, ["GGY", "JPN", "SSD"]);
    }

    #[test]
    fn test_missing_table_fails_build() {
        let err =
            Dataset::build(PRIMARY, "<html></html>", "downloadTableEN", &HashMap::new())
                .unwrap_err();
        assert!(matches!(err, CountryError::Data(_)));
    }

    #[test]
    fn test_set_data_failure_keeps_previous_dataset() {
        let handle = DatasetHandle::new();
        handle
            .set_data(PRIMARY, &sample_secondary(), HashMap::new())
            .expect("initial injection should work");
        let before = handle.get().unwrap().len();

        let err = handle.set_data(PRIMARY, &secondary(""), HashMap::new());
        assert!(matches!(err, Err(CountryError::Data(_))));
        assert_eq!(handle.get().unwrap().len(), before, "old dataset must survive");

        handle.invalidate();
        // after invalidation the default snapshots are used again
        assert!(handle.get().unwrap().len() > 200);
    }

    #[test]
    fn test_configuration_applies_on_next_build_only() {
        let handle = DatasetHandle::new();
        let built = handle.get().expect("bundled snapshots should build");
        assert!(built.len() > 200);

        // a bogus table name does not disturb the built dataset...
        handle.set_table_name(Some("NOTEXIST"));
        assert!(handle.get().is_ok());

        // ...until invalidation forces a rebuild
        handle.invalidate();
        let err = handle.get().unwrap_err();
        assert!(matches!(err, CountryError::Data(_)));

        handle.set_table_name(None);
        assert!(handle.get().is_ok(), "default table name restored");
    }
}
