//! Qualifier-overlap scoring for fuzzy candidates.
//!
//! When a simplified input core matches several records, the stripped
//! qualifier words decide between them. The scoring function is
//! pluggable on the resolver so alternative strategies can be swapped in
//! without touching the cascade control flow.

/// Scoring function: (input qualifiers, candidate record qualifiers) -> score.
/// Higher is better; candidates are compared by score, then shorter
/// official name, then dataset order.
pub type QualifierScorer = fn(&[String], &[String]) -> i32;

/// Qualifier words that denote a distinct polity rather than mere
/// decoration. A candidate carrying one of these that the input did not
/// supply is almost certainly the wrong country ("Congo" vs "Democratic
/// Republic of the Congo").
pub const DIFFERENTIATORS: &[&str] = &["DEMOCRATIC"];

/// Weight applied per unmatched differentiator word; chosen to outweigh
/// the overlap a long official name can accumulate from common fillers.
const DIFFERENTIATOR_PENALTY: i32 = 3;

/// Default scorer: +1 per distinct input qualifier present in the
/// candidate's qualifiers, minus a penalty per candidate differentiator
/// word absent from the input.
pub fn qualifier_overlap_score(input: &[String], candidate: &[String]) -> i32 {
    let mut score = 0;
    let mut seen: Vec<&str> = Vec::new();
    for word in input {
        if seen.contains(&word.as_str()) {
            continue;
        }
        seen.push(word);
        if candidate.iter().any(|c| c == word) {
            score += 1;
        }
    }
    for diff in DIFFERENTIATORS {
        if candidate.iter().any(|c| c == diff) && !input.iter().any(|w| w == diff) {
            score -= DIFFERENTIATOR_PENALTY;
        }
    }
    score
}
