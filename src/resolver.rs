//! The resolver: exact-then-fuzzy resolution of free-form country
//! strings, plus code/name/metadata and region-membership lookups.
//!
//! # Matching cascade
//!
//! 1. iso3 (3-char input), iso2 (2-char input), then exact official
//!    name, including every abbreviation expansion of the input. Hits
//!    here are *exact*: the input (or a lossless expansion of it)
//!    equals a canonical identifier or official name verbatim.
//! 2. Curated alias table, checked against each expansion candidate.
//! 3. Simplified-core token matching with qualifier-overlap scoring.
//! 4. Whitespace-insensitive core containment as a last resort.
//!
//! Everything past step 1 is reported as non-exact; callers should
//! treat those results as best guesses.

use std::sync::Arc;

use crate::dataset::{CountryRecord, Dataset, DatasetHandle};
use crate::error::CountryError;
use crate::matcher::{
    qualifier_overlap_score, simplify_name, Expansions, QualifierScorer, SimplifiedName,
};

/// A fuzzy-resolution result: the resolved code and whether the match
/// was verbatim (exact) or a best guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub iso3: String,
    pub exact: bool,
}

/// Resolves country strings against a lazily built [`Dataset`].
///
/// Every lookup may trigger a dataset build (first use or after
/// invalidation) and therefore returns `Result`; "no match" is `None`
/// from the plain lookups and [`CountryError::NotFound`] from the
/// `require_*` flavors.
pub struct CountryResolver {
    handle: DatasetHandle,
    scorer: QualifierScorer,
}

impl CountryResolver {
    /// Resolver over the default handle (bundled snapshots until live
    /// fetching is enabled on [`handle`](Self::handle)).
    pub fn new() -> Self {
        CountryResolver::with_handle(DatasetHandle::new())
    }

    /// Resolver over an explicitly configured handle. Separate handles
    /// give tests fully isolated datasets.
    pub fn with_handle(handle: DatasetHandle) -> Self {
        CountryResolver {
            handle,
            scorer: qualifier_overlap_score,
        }
    }

    /// Swap the fuzzy tie-break scoring strategy.
    pub fn with_scorer(mut self, scorer: QualifierScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// The underlying dataset handle (configuration, invalidation).
    pub fn handle(&self) -> &DatasetHandle {
        &self.handle
    }

    /// The dataset itself, building it if needed.
    pub fn dataset(&self) -> Result<Arc<Dataset>, CountryError> {
        self.handle.get()
    }

    // ------------------------------------------------------------------
    // code from name
    // ------------------------------------------------------------------

    /// Resolve to an iso3 code by exact identifier/name match only.
    pub fn code_from_name(&self, name: &str) -> Result<Option<String>, CountryError> {
        let dataset = self.handle.get()?;
        Ok(resolve_exact(&dataset, name))
    }

    /// Like [`code_from_name`](Self::code_from_name) but failing with
    /// [`CountryError::NotFound`] instead of returning `None`.
    pub fn require_code_from_name(&self, name: &str) -> Result<String, CountryError> {
        self.code_from_name(name)?
            .ok_or_else(|| CountryError::NotFound(name.trim().to_string()))
    }

    /// Resolve to an iso3 code, falling back to fuzzy matching. The
    /// returned flag distinguishes verbatim matches from best guesses.
    pub fn fuzzy_code_from_name(&self, name: &str) -> Result<Option<FuzzyMatch>, CountryError> {
        let dataset = self.handle.get()?;
        Ok(self.resolve_fuzzy(&dataset, name))
    }

    /// Fuzzy resolution that fails with [`CountryError::NotFound`] when
    /// nothing matches.
    pub fn require_fuzzy_code_from_name(&self, name: &str) -> Result<FuzzyMatch, CountryError> {
        self.fuzzy_code_from_name(name)?
            .ok_or_else(|| CountryError::NotFound(name.trim().to_string()))
    }

    // ------------------------------------------------------------------
    // lookups by code
    // ------------------------------------------------------------------

    /// Official name for an iso3 code (case-insensitive).
    pub fn name_from_iso3(&self, iso3: &str) -> Result<Option<String>, CountryError> {
        Ok(self.info_from_iso3(iso3)?.map(|r| r.name))
    }

    pub fn require_name_from_iso3(&self, iso3: &str) -> Result<String, CountryError> {
        self.name_from_iso3(iso3)?
            .ok_or_else(|| CountryError::NotFound(iso3.trim().to_string()))
    }

    /// Official name for an iso2 code. Never falls through to iso3.
    pub fn name_from_iso2(&self, iso2: &str) -> Result<Option<String>, CountryError> {
        Ok(self.info_from_iso2(iso2)?.map(|r| r.name))
    }

    pub fn require_name_from_iso2(&self, iso2: &str) -> Result<String, CountryError> {
        self.name_from_iso2(iso2)?
            .ok_or_else(|| CountryError::NotFound(iso2.trim().to_string()))
    }

    /// Full record for an iso3 code.
    pub fn info_from_iso3(&self, iso3: &str) -> Result<Option<CountryRecord>, CountryError> {
        let dataset = self.handle.get()?;
        Ok(dataset.record(&iso3.trim().to_uppercase()).cloned())
    }

    pub fn require_info_from_iso3(&self, iso3: &str) -> Result<CountryRecord, CountryError> {
        self.info_from_iso3(iso3)?
            .ok_or_else(|| CountryError::NotFound(iso3.trim().to_string()))
    }

    /// Full record for an iso2 code.
    pub fn info_from_iso2(&self, iso2: &str) -> Result<Option<CountryRecord>, CountryError> {
        let dataset = self.handle.get()?;
        let upper = iso2.trim().to_uppercase();
        Ok(dataset
            .iso3_for_iso2(&upper)
            .and_then(|iso3| dataset.record(iso3))
            .cloned())
    }

    pub fn require_info_from_iso2(&self, iso2: &str) -> Result<CountryRecord, CountryError> {
        self.info_from_iso2(iso2)?
            .ok_or_else(|| CountryError::NotFound(iso2.trim().to_string()))
    }

    /// Map an iso2 code to its iso3 code.
    pub fn iso3_from_iso2(&self, iso2: &str) -> Result<Option<String>, CountryError> {
        let dataset = self.handle.get()?;
        Ok(dataset
            .iso3_for_iso2(&iso2.trim().to_uppercase())
            .map(str::to_string))
    }

    pub fn require_iso3_from_iso2(&self, iso2: &str) -> Result<String, CountryError> {
        self.iso3_from_iso2(iso2)?
            .ok_or_else(|| CountryError::NotFound(iso2.trim().to_string()))
    }

    // ------------------------------------------------------------------
    // region membership
    // ------------------------------------------------------------------

    /// Member iso3 codes of a region, sub-region or intermediate region,
    /// looked up by code or name. Unknown keys yield an empty list.
    pub fn countries_in_region(&self, key: &str) -> Result<Vec<String>, CountryError> {
        let dataset = self.handle.get()?;
        Ok(dataset
            .regions()
            .members(key)
            .map(|members| members.to_vec())
            .unwrap_or_default())
    }

    /// Region membership that fails with [`CountryError::NotFound`] for
    /// unknown keys.
    pub fn require_countries_in_region(&self, key: &str) -> Result<Vec<String>, CountryError> {
        let members = self.countries_in_region(key)?;
        if members.is_empty() {
            return Err(CountryError::NotFound(key.trim().to_string()));
        }
        Ok(members)
    }

    // ------------------------------------------------------------------
    // cascade internals
    // ------------------------------------------------------------------

    fn resolve_fuzzy(&self, dataset: &Dataset, input: &str) -> Option<FuzzyMatch> {
        // A blank input would otherwise sail through the empty-core
        // match below and pick an arbitrary record.
        if input.trim().is_empty() {
            return None;
        }
        if let Some(iso3) = resolve_exact(dataset, input) {
            return Some(FuzzyMatch { iso3, exact: true });
        }

        let candidates: Vec<String> = Expansions::new(input).collect();

        for candidate in &candidates {
            if let Some(iso3) = dataset.alias(candidate) {
                return Some(FuzzyMatch {
                    iso3: iso3.to_string(),
                    exact: false,
                });
            }
        }

        let simplified: Vec<SimplifiedName> =
            candidates.iter().map(|c| simplify_name(c)).collect();

        // Step 3: whole-token core matching, best qualifier score wins.
        let mut best: Option<(i32, usize, usize)> = None;
        for name in &simplified {
            for (index, entry) in dataset.name_entries().iter().enumerate() {
                if cores_match(&name.core_tokens, &entry.core_tokens) {
                    let score = (self.scorer)(&name.qualifiers, &entry.qualifiers);
                    offer(&mut best, (score, entry.name.len(), index));
                }
            }
        }

        // Step 4: whitespace-insensitive containment as a last resort.
        if best.is_none() {
            for name in &simplified {
                let needle = name.core_nospace();
                if needle.is_empty() {
                    continue;
                }
                for (index, entry) in dataset.name_entries().iter().enumerate() {
                    if entry.core_nospace.is_empty() {
                        continue;
                    }
                    if entry.core_nospace.contains(&needle)
                        || needle.contains(&entry.core_nospace)
                    {
                        let score = (self.scorer)(&name.qualifiers, &entry.qualifiers);
                        offer(&mut best, (score, entry.name.len(), index));
                    }
                }
            }
        }

        best.map(|(_, _, index)| FuzzyMatch {
            iso3: dataset.name_entries()[index].iso3.clone(),
            exact: false,
        })
    }
}

impl Default for CountryResolver {
    fn default() -> Self {
        CountryResolver::new()
    }
}

/// Steps 1-2 of the cascade: identifiers, then exact official names
/// over all abbreviation expansions.
fn resolve_exact(dataset: &Dataset, input: &str) -> Option<String> {
    let upper = input.trim().to_uppercase();
    match upper.chars().count() {
        3 => {
            if dataset.record(&upper).is_some() {
                return Some(upper);
            }
        }
        2 => {
            if let Some(iso3) = dataset.iso3_for_iso2(&upper) {
                return Some(iso3.to_string());
            }
        }
        _ => {}
    }
    for candidate in Expansions::new(&upper) {
        if let Some(iso3) = dataset.iso3_for_name(&candidate) {
            return Some(iso3.to_string());
        }
    }
    None
}

/// An empty input core matches everything (the qualifiers then carry
/// the decision); otherwise one token list must appear as a consecutive
/// run inside the other.
fn cores_match(input: &[String], entry: &[String]) -> bool {
    if input.is_empty() {
        return true;
    }
    contains_run(entry, input) || contains_run(input, entry)
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Keep the better of two ranked candidates: higher score, then shorter
/// official name, then earlier dataset order.
fn offer(best: &mut Option<(i32, usize, usize)>, candidate: (i32, usize, usize)) {
    fn rank((score, len, index): (i32, usize, usize)) -> (std::cmp::Reverse<i32>, usize, usize) {
        (std::cmp::Reverse(score), len, index)
    }
    let better = match *best {
        None => true,
        Some(current) => rank(candidate) < rank(current),
    };
    if better {
        *best = Some(candidate);
    }
}
