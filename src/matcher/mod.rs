//! Name matching building blocks: abbreviation expansion, name
//! simplification, and qualifier scoring.
//!
//! # Architecture
//!
//! - **Expansion**: abbreviation tokens -> candidate full names
//!   (lexical only, no dataset access)
//! - **Simplification**: a name -> core words + stripped qualifiers
//! - **Scoring**: input qualifiers vs candidate qualifiers -> rank
//!
//! The resolver composes these into its exact-then-fuzzy cascade; each
//! piece is usable on its own.

mod abbrev;
mod score;
mod simplify;

pub use abbrev::{expand_abbreviations, AbbrevRule, Expansions, ABBREVIATIONS};
pub use score::{qualifier_overlap_score, QualifierScorer, DIFFERENTIATORS};
pub use simplify::{simplify_name, simplify_name_with, SimplifiedName, FILLER_WORDS};
