//! Abbreviation expansion for country name tokens.
//!
//! Names arriving from datasets frequently abbreviate common words
//! ("Dem. Rep. of the Congo", "Russian Fed."). Expansion rewrites those
//! tokens into candidate full names before any dataset lookup happens;
//! no fuzzy matching is involved at this stage.

/// One rewrite rule: a token and the full words it may stand for.
///
/// Rules with a single expansion are unambiguous and rewrite the name in
/// place. Rules with several expansions fan out into one candidate per
/// option, with the unexpanded token kept as the first option.
pub struct AbbrevRule {
    pub token: &'static str,
    pub expansions: &'static [&'static str],
}

/// Rewrite rules in declaration order. Compound tokens ("U.S.") come
/// before the single-letter tokens they contain.
pub const ABBREVIATIONS: &[AbbrevRule] = &[
    AbbrevRule { token: "U.S.", expansions: &["UNITED STATES"] },
    AbbrevRule { token: "U.K.", expansions: &["UNITED KINGDOM"] },
    AbbrevRule { token: "DEM.", expansions: &["DEMOCRATIC"] },
    AbbrevRule { token: "FMR.", expansions: &["FORMER"] },
    AbbrevRule { token: "PROV.", expansions: &["PROVINCE"] },
    AbbrevRule { token: "REP.", expansions: &["REPUBLIC"] },
    AbbrevRule { token: "ST.", expansions: &["SAINT"] },
    AbbrevRule { token: "UTD.", expansions: &["UNITED"] },
    AbbrevRule { token: "N.", expansions: &["NORTH"] },
    AbbrevRule { token: "E.", expansions: &["EAST"] },
    AbbrevRule { token: "W.", expansions: &["WEST"] },
    AbbrevRule { token: "K.", expansions: &["KINGDOM"] },
    AbbrevRule { token: "U.", expansions: &["UNITED"] },
    AbbrevRule { token: "FED.", expansions: &["FEDERATION", "FEDERAL", "FEDERATED"] },
    AbbrevRule { token: "ISL.", expansions: &["ISLAND", "ISLANDS"] },
    AbbrevRule { token: "S.", expansions: &["SOUTH", "SAINT"] },
    AbbrevRule { token: "TERR.", expansions: &["TERRITORY", "TERRITORIES"] },
];

/// Lazy cartesian product over the ambiguous-token options of one name.
///
/// The first yielded candidate always has every ambiguous token left
/// unexpanded (unambiguous tokens are already rewritten); later
/// candidates substitute options in declaration order, first rule
/// varying slowest.
pub struct Expansions {
    tokens: Vec<String>,
    /// (token index, options) per ambiguous token occurrence set.
    slots: Vec<(Vec<usize>, &'static [&'static str])>,
    counter: Vec<usize>,
    done: bool,
}

impl Expansions {
    pub fn new(name: &str) -> Self {
        let mut tokens: Vec<String> = name
            .trim()
            .to_uppercase()
            .split_whitespace()
            .map(|t| t.to_string())
            .collect();

        // Unambiguous rules rewrite in place.
        for rule in ABBREVIATIONS.iter().filter(|r| r.expansions.len() == 1) {
            for token in tokens.iter_mut() {
                if token == rule.token {
                    *token = rule.expansions[0].to_string();
                }
            }
        }

        // Ambiguous rules become product slots over their occurrences.
        let mut slots = Vec::new();
        for rule in ABBREVIATIONS.iter().filter(|r| r.expansions.len() > 1) {
            let positions: Vec<usize> = tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| t.as_str() == rule.token)
                .map(|(i, _)| i)
                .collect();
            if !positions.is_empty() {
                slots.push((positions, rule.expansions));
            }
        }

        let counter = vec![0; slots.len()];
        Expansions { tokens, slots, counter, done: false }
    }

    fn render(&self) -> String {
        let mut tokens = self.tokens.clone();
        for (slot, &option) in self.slots.iter().zip(self.counter.iter()) {
            if option > 0 {
                for &pos in &slot.0 {
                    tokens[pos] = slot.1[option - 1].to_string();
                }
            }
        }
        tokens.join(" ")
    }

    fn advance(&mut self) {
        // Odometer over (1 + expansions) options per slot, last slot fastest.
        for i in (0..self.counter.len()).rev() {
            self.counter[i] += 1;
            if self.counter[i] <= self.slots[i].1.len() {
                return;
            }
            self.counter[i] = 0;
        }
        self.done = true;
    }
}

impl Iterator for Expansions {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let candidate = self.render();
        if self.slots.is_empty() {
            self.done = true;
        } else {
            self.advance();
        }
        Some(candidate)
    }
}

/// Expand every recognized abbreviation in `name`, returning all
/// candidate full names in a deterministic order. A name with no
/// recognized abbreviation yields exactly its uppercased form.
pub fn expand_abbreviations(name: &str) -> Vec<String> {
    Expansions::new(name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_abbreviation_is_identity_uppercase() {
        assert_eq!(expand_abbreviations("jpn"), vec!["JPN"]);
        assert_eq!(expand_abbreviations("  poland "), vec!["POLAND"]);
    }

    #[test]
    fn test_single_expansion_rewrites_in_place() {
        assert_eq!(
            expand_abbreviations("Dem. Rep. of the Congo"),
            vec!["DEMOCRATIC REPUBLIC OF THE CONGO"]
        );
        assert_eq!(
            expand_abbreviations("St. Pierre and Miquelon"),
            vec!["SAINT PIERRE AND MIQUELON"]
        );
    }

    #[test]
    fn test_compound_tokens_before_single_letters() {
        assert_eq!(
            expand_abbreviations("U.S. Virgin Islands"),
            vec!["UNITED STATES VIRGIN ISLANDS"]
        );
        assert_eq!(
            expand_abbreviations("U.K. Virgin Islands"),
            vec!["UNITED KINGDOM VIRGIN ISLANDS"]
        );
    }

    #[test]
    fn test_ambiguous_token_fans_out_base_first() {
        assert_eq!(
            expand_abbreviations("Haha Dem. Fed. Republic"),
            vec![
                "HAHA DEMOCRATIC FED. REPUBLIC",
                "HAHA DEMOCRATIC FEDERATION REPUBLIC",
                "HAHA DEMOCRATIC FEDERAL REPUBLIC",
                "HAHA DEMOCRATIC FEDERATED REPUBLIC",
            ]
        );
    }

    #[test]
    fn test_island_options_in_declaration_order() {
        assert_eq!(
            expand_abbreviations("Cayman Isl."),
            vec!["CAYMAN ISL.", "CAYMAN ISLAND", "CAYMAN ISLANDS"]
        );
    }

    #[test]
    fn test_two_ambiguous_tokens_produce_product() {
        let candidates = expand_abbreviations("Fed. Terr. Haha");
        // (1 + 3) x (1 + 2) combinations
        assert_eq!(candidates.len(), 12);
        assert_eq!(candidates[0], "FED. TERR. HAHA");
        assert!(candidates.contains(&"FEDERATED TERRITORIES HAHA".to_string()));
        assert!(candidates.contains(&"FEDERATION TERR. HAHA".to_string()));
    }

    #[test]
    fn test_lazy_iteration_yields_without_collecting() {
        let mut it = Expansions::new("Russian Fed.");
        assert_eq!(it.next().as_deref(), Some("RUSSIAN FED."));
        assert_eq!(it.next().as_deref(), Some("RUSSIAN FEDERATION"));
    }
}
