use serde::{Deserialize, Serialize};

/// One recognized country or territory, merged from the code feed and
/// the M49 classification table.
///
/// `iso3` is the primary key and always present; every other field may
/// be an empty string when the source row did not carry it (territories
/// without an assigned iso2, rows absent from the classification table,
/// Antarctica's empty hierarchy).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-3 code, unique.
    pub iso3: String,
    /// ISO 3166-1 alpha-2 code, unique when present.
    pub iso2: String,
    /// Official display name, mixed case, may contain parentheses/commas.
    pub name: String,
    /// UN M49 numeric code as it appears in the table (zero-padded).
    pub m49: String,
    pub global_code: String,
    pub global_name: String,
    pub region_code: String,
    pub region_name: String,
    pub subregion_code: String,
    pub subregion_name: String,
    pub intermediate_region_code: String,
    pub intermediate_region_name: String,
    /// Least Developed Countries marker ("x" or empty).
    pub ldc: String,
    /// Land Locked Developing Countries marker ("x" or empty).
    pub lldc: String,
    /// Small Island Developing States marker ("x" or empty).
    pub sids: String,
    /// "Developed" / "Developing" / empty.
    pub developed: String,
}
