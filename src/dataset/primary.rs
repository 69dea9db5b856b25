//! Parser for the primary (code) feed: a World-Bank-style JSON document
//! shaped as `[metadata, [entry, ...]]`, where each entry carries the
//! alpha-3 id, the alpha-2 code and a display name. Aggregate rows
//! (regional groupings the feed interleaves with countries) are skipped.

use serde::Deserialize;
use tracing::warn;

use crate::error::CountryError;

#[derive(Debug, Deserialize)]
struct FeedEntry {
    id: String,
    #[serde(rename = "iso2Code", default)]
    iso2_code: String,
    name: String,
    #[serde(default)]
    region: Option<FeedRegion>,
}

#[derive(Debug, Deserialize)]
struct FeedRegion {
    #[serde(default)]
    value: String,
}

/// One usable row of the primary feed.
#[derive(Debug, Clone)]
pub(crate) struct PrimaryEntry {
    pub iso3: String,
    pub iso2: String,
    pub name: String,
}

/// Parse the primary feed, keeping country rows only.
pub(crate) fn parse_primary(json: &str) -> Result<Vec<PrimaryEntry>, CountryError> {
    let document: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| CountryError::Data(format!("primary feed is not valid JSON: {}", e)))?;

    let rows = document
        .as_array()
        .and_then(|arr| arr.get(1))
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            CountryError::Data("primary feed is not a [metadata, entries] document".to_string())
        })?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let entry: FeedEntry = match serde_json::from_value(row.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping malformed primary feed row: {}", e);
                continue;
            }
        };
        if entry.region.as_ref().is_some_and(|r| r.value == "Aggregates") {
            continue;
        }
        let iso3 = entry.id.trim().to_uppercase();
        if iso3.chars().count() != 3 {
            warn!("Skipping primary feed row with bad id '{}'", entry.id);
            continue;
        }
        entries.push(PrimaryEntry {
            iso3,
            iso2: entry.iso2_code.trim().to_uppercase(),
            name: entry.name.trim().to_string(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        {"page": 1, "pages": 1, "per_page": "10000", "total": 3},
        [
            {"id": "WLD", "iso2Code": "1W", "name": "World",
             "region": {"id": "NA", "iso2code": "NA", "value": "Aggregates"}},
            {"id": "JPN", "iso2Code": "JP", "name": "Japan",
             "region": {"id": "142", "iso2code": "JP", "value": "Asia"}},
            {"id": "ggy", "iso2Code": "gg", "name": "Guernsey"}
        ]
    ]"#;

    #[test]
    fn test_parses_and_skips_aggregates() {
        let entries = parse_primary(FEED).expect("feed should parse");
        assert_eq!(entries.len(), 2, "aggregate row should be skipped");
        assert_eq!(entries[0].iso3, "JPN");
        assert_eq!(entries[0].iso2, "JP");
        assert_eq!(entries[0].name, "Japan");
    }

    #[test]
    fn test_codes_are_uppercased() {
        let entries = parse_primary(FEED).unwrap();
        assert_eq!(entries[1].iso3, "GGY");
        assert_eq!(entries[1].iso2, "GG");
    }

    #[test]
    fn test_not_json_is_data_error() {
        let err = parse_primary("<html>nope</html>").unwrap_err();
        assert!(matches!(err, CountryError::Data(_)));
    }

    #[test]
    fn test_wrong_shape_is_data_error() {
        let err = parse_primary(r#"{"rates": {}}"#).unwrap_err();
        assert!(matches!(err, CountryError::Data(_)));
    }

    #[test]
    fn test_bad_id_rows_skipped() {
        let feed = r#"[{}, [{"id": "ZZZZ", "iso2Code": "ZZ", "name": "Nowhere"}]]"#;
        let entries = parse_primary(feed).unwrap();
        assert!(entries.is_empty());
    }
}
