//! Signed literals and cut set helpers
//!
//! A literal is a nonzero `i32`. Its magnitude identifies a basic event or a
//! module, and a negative sign denotes the complement. Cut sets are ordered
//! sets of literals so that collections of them can be deduplicated with a
//! plain `BTreeSet<CutSet>`.

use std::collections::BTreeSet;

use crate::error::{AnalysisError, AnalysisResult};

/// Conjunction of signed literals
pub type CutSet = BTreeSet<i32>;

/// Cut set in named-literal form (`"id"` or `"not id"`)
pub type NamedCutSet = BTreeSet<String>;

/// Keyword marking a complemented literal in named form
pub const NEGATION: &str = "not";

/// Check whether a set holds some literal together with its complement
pub fn is_contradictory(cut_set: &CutSet) -> bool {
    cut_set
        .iter()
        .take_while(|&&lit| lit < 0)
        .any(|lit| cut_set.contains(&-lit))
}

/// Check whether adding `literals` to `cut_set` would form a contradiction
pub fn conflicts_with(cut_set: &CutSet, literals: &CutSet) -> bool {
    literals.iter().any(|lit| cut_set.contains(&-lit))
}

/// Number of basic event literals, module references at or above
/// `gate_index` excluded
pub fn basic_order(cut_set: &CutSet, gate_index: i32) -> usize {
    cut_set.iter().filter(|lit| lit.abs() < gate_index).count()
}

/// Largest literal of a cut set
///
/// Module indices are the largest positive indices in a tree, so a cut set
/// that still references a module always has one as its maximum.
pub fn max_literal(cut_set: &CutSet) -> Option<i32> {
    cut_set.last().copied()
}

/// Render one literal in named form
pub fn format_literal(id: &str, positive: bool) -> String {
    if positive {
        id.to_string()
    } else {
        format!("{} {}", NEGATION, id)
    }
}

/// Split a named literal into its event identifier and polarity
pub fn parse_literal(token: &str) -> AnalysisResult<(&str, bool)> {
    let parts: Vec<&str> = token.split_whitespace().collect();
    match parts.as_slice() {
        [id] => Ok((*id, true)),
        [NEGATION, id] => Ok((*id, false)),
        _ => Err(AnalysisError::MalformedLiteral(token.to_string())),
    }
}
