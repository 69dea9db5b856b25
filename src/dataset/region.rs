//! Region membership index.
//!
//! Maps region identifiers to member iso3 codes. Numeric codes of all
//! three hierarchy levels share one index (so "013", a sub-region code,
//! resolves); names are indexed per level and consulted in precedence
//! order region, sub-region, intermediate region. Member lists follow
//! dataset iteration order (ascending iso3) and are deduplicated.

use std::collections::HashMap;

use super::record::CountryRecord;

#[derive(Debug, Default)]
pub struct RegionIndex {
    codes: HashMap<String, Vec<String>>,
    region_names: HashMap<String, Vec<String>>,
    subregion_names: HashMap<String, Vec<String>>,
    intermediate_names: HashMap<String, Vec<String>>,
}

impl RegionIndex {
    /// Register one record under every region key it belongs to.
    /// Records must be inserted in dataset iteration order.
    pub(crate) fn insert(&mut self, record: &CountryRecord) {
        let iso3 = &record.iso3;
        push_member(&mut self.codes, &record.region_code, iso3);
        push_member(&mut self.codes, &record.subregion_code, iso3);
        push_member(&mut self.codes, &record.intermediate_region_code, iso3);
        push_member(&mut self.region_names, &record.region_name.to_uppercase(), iso3);
        push_member(
            &mut self.subregion_names,
            &record.subregion_name.to_uppercase(),
            iso3,
        );
        push_member(
            &mut self.intermediate_names,
            &record.intermediate_region_name.to_uppercase(),
            iso3,
        );
    }

    /// Look up members by region code or region/sub-region/intermediate
    /// region name (case-insensitive), first matching level winning.
    pub fn members(&self, key: &str) -> Option<&[String]> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        if let Some(found) = self.codes.get(key) {
            return Some(found);
        }
        let upper = key.to_uppercase();
        self.region_names
            .get(&upper)
            .or_else(|| self.subregion_names.get(&upper))
            .or_else(|| self.intermediate_names.get(&upper))
            .map(|v| v.as_slice())
    }
}

fn push_member(index: &mut HashMap<String, Vec<String>>, key: &str, iso3: &str) {
    let key = key.trim();
    if key.is_empty() {
        return;
    }
    let members = index.entry(key.to_string()).or_default();
    if members.last().map(String::as_str) != Some(iso3) {
        members.push(iso3.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iso3: &str, fields: [&str; 6]) -> CountryRecord {
        CountryRecord {
            iso3: iso3.to_string(),
            region_code: fields[0].to_string(),
            region_name: fields[1].to_string(),
            subregion_code: fields[2].to_string(),
            subregion_name: fields[3].to_string(),
            intermediate_region_code: fields[4].to_string(),
            intermediate_region_name: fields[5].to_string(),
            ..Default::default()
        }
    }

    fn sample_index() -> RegionIndex {
        let mut index = RegionIndex::default();
        index.insert(&record("GGY", ["150", "Europe", "154", "Northern Europe", "830", "Channel Islands"]));
        index.insert(&record("JEY", ["150", "Europe", "154", "Northern Europe", "830", "Channel Islands"]));
        index.insert(&record("JPN", ["142", "Asia", "030", "Eastern Asia", "", ""]));
        index
    }

    #[test]
    fn test_lookup_by_name_case_insensitive() {
        let index = sample_index();
        assert_eq!(index.members("channel islands").unwrap(), ["GGY", "JEY"]);
        assert_eq!(index.members("EUROPE").unwrap(), ["GGY", "JEY"]);
    }

    #[test]
    fn test_lookup_by_code_at_any_level() {
        let index = sample_index();
        assert_eq!(index.members("830").unwrap(), ["GGY", "JEY"]);
        assert_eq!(index.members("030").unwrap(), ["JPN"]);
        assert_eq!(index.members("142").unwrap(), ["JPN"]);
    }

    #[test]
    fn test_unknown_key_is_none() {
        let index = sample_index();
        assert!(index.members("NOTEXIST").is_none());
        assert!(index.members("").is_none());
    }

    #[test]
    fn test_empty_hierarchy_levels_not_indexed() {
        let mut index = RegionIndex::default();
        index.insert(&record("ATA", ["", "", "", "", "", ""]));
        assert!(index.members("").is_none());
    }
}
