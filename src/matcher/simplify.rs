//! Country name simplification.
//!
//! Official country names carry qualifier words that rarely appear in
//! free-form input ("Venezuela (Bolivarian Republic of)", "United
//! Republic of Tanzania"). Simplification peels those off, leaving a
//! core name to match on plus the stripped qualifier words, which the
//! resolver later uses for confidence scoring.
//!
//! Extraction order is fixed: the parenthetical suffix first, then the
//! comma suffix, then filler words from what remains. Periods are
//! stripped from every token, so "Rep." yields the qualifier "REP".

/// Filler words stripped from a name during simplification. The words
/// are compared after uppercasing and period removal.
pub const FILLER_WORDS: &[&str] = &[
    "THE",
    "OF",
    "UNITED",
    "DEM",
    "DEMOCRATIC",
    "REP",
    "REPUBLIC",
    "FED",
    "FEDERATED",
    "STATES",
    "ISLAMIC",
    "FORMER",
    "YUGOSLAV",
    "PEOPLE'S",
    "PLURINATIONAL",
    "BOLIVARIAN",
];

/// Result of simplifying one country name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifiedName {
    /// Remaining words joined with single spaces; may be empty when the
    /// whole name consisted of qualifiers.
    pub core: String,
    /// The words of `core`, in order.
    pub core_tokens: Vec<String>,
    /// Stripped words in the order they were encountered: parenthetical
    /// content, then comma-suffix content, then filler words.
    pub qualifiers: Vec<String>,
}

impl SimplifiedName {
    /// `core` with whitespace removed, for space-insensitive containment
    /// checks ("VIET NAM" vs "VIETNAM").
    pub fn core_nospace(&self) -> String {
        self.core_tokens.concat()
    }
}

/// Simplify `name` with the default filler-word set.
pub fn simplify_name(name: &str) -> SimplifiedName {
    simplify_name_with(name, FILLER_WORDS)
}

/// Simplify `name`, treating exactly the given words as fillers.
/// Deterministic: identical input always yields the identical result.
pub fn simplify_name_with(name: &str, fillers: &[&str]) -> SimplifiedName {
    let mut remainder = name.trim().to_uppercase();
    let mut qualifiers = Vec::new();

    // Parenthetical suffix: "Name (Qualifier Words)".
    if let Some(start) = remainder.find('(') {
        let inner = remainder[start + 1..]
            .trim_end()
            .trim_end_matches(')')
            .to_string();
        push_words(&mut qualifiers, &inner);
        remainder.truncate(start);
    }

    // Comma suffix: "Name, Qualifier Words".
    if let Some(start) = remainder.find(',') {
        let tail = remainder[start + 1..].to_string();
        push_words(&mut qualifiers, &tail);
        remainder.truncate(start);
    }

    // Filler words from whatever is left, in order of appearance.
    let mut core_tokens = Vec::new();
    for word in remainder.split_whitespace() {
        let word = clean_token(word);
        if word.is_empty() {
            continue;
        }
        if fillers.contains(&word.as_str()) {
            qualifiers.push(word);
        } else {
            core_tokens.push(word);
        }
    }

    SimplifiedName {
        core: core_tokens.join(" "),
        core_tokens,
        qualifiers,
    }
}

fn push_words(qualifiers: &mut Vec<String>, text: &str) {
    for word in text.split_whitespace() {
        let word = clean_token(word);
        if !word.is_empty() {
            qualifiers.push(word);
        }
    }
}

/// Drop periods and stray parentheses from a token.
fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '.' | '(' | ')'))
        .collect()
}
