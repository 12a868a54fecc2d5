//! Truncated inclusion-exclusion expansion
//!
//! `P(A1 ∪ ... ∪ An) = P(A1) + P(A2 ∪ ... ∪ An) - P((A1∩A2) ∪ ... ∪ (A1∩An))`
//!
//! Applying the identity repeatedly yields signed conjunction terms. The
//! structure depends only on the cut sets, so it is built once and evaluated
//! against new probability values on every Monte Carlo trial. Each frame of
//! the work list carries its remaining sum budget; a budget of `n` keeps
//! intersections of up to `n` cut sets.

use std::collections::BTreeSet;

use crate::cut_set::{conflicts_with, CutSet};
use crate::indexing::EventIndex;

/// Signed conjunction terms of a union probability
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pos_terms: Vec<CutSet>,
    neg_terms: Vec<CutSet>,
}

impl Expansion {
    /// Expand the union of `cut_sets` keeping `nsums` levels of the series
    pub fn build(cut_sets: BTreeSet<CutSet>, nsums: usize) -> Self {
        let mut expansion = Self::default();
        // (remaining sets, positive sign, sum budget)
        let mut work: Vec<(BTreeSet<CutSet>, bool, usize)> = vec![(cut_sets, true, nsums)];

        while let Some((mut sets, positive, budget)) = work.pop() {
            if budget == 0 {
                continue;
            }
            let Some(element) = sets.pop_first() else {
                continue;
            };
            let combos = combine_el_and_set(&element, &sets);
            if positive {
                expansion.pos_terms.push(element);
            } else {
                expansion.neg_terms.push(element);
            }
            work.push((combos, !positive, budget - 1));
            work.push((sets, positive, budget));
        }
        log::trace!(
            "Expansion built: {} positive, {} negative terms",
            expansion.pos_terms.len(),
            expansion.neg_terms.len()
        );
        expansion
    }

    /// Terms added to the sum
    pub fn pos_terms(&self) -> &[CutSet] {
        &self.pos_terms
    }

    /// Terms subtracted from the sum
    pub fn neg_terms(&self) -> &[CutSet] {
        &self.neg_terms
    }

    /// Total number of terms
    pub fn len(&self) -> usize {
        self.pos_terms.len() + self.neg_terms.len()
    }

    /// Check whether the expansion has no terms
    pub fn is_empty(&self) -> bool {
        self.pos_terms.is_empty() && self.neg_terms.is_empty()
    }

    /// Evaluate the series with the current probabilities of `index`
    pub fn evaluate(&self, index: &EventIndex) -> f64 {
        let pos: f64 = self.pos_terms.iter().map(|t| index.prob_and(t)).sum();
        let neg: f64 = self.neg_terms.iter().map(|t| index.prob_and(t)).sum();
        pos - neg
    }
}

/// Intersect one cut set with each member of a collection
///
/// Contradictory intersections are null events and are dropped.
pub fn combine_el_and_set(element: &CutSet, sets: &BTreeSet<CutSet>) -> BTreeSet<CutSet> {
    sets.iter()
        .filter(|set| !conflicts_with(set, element))
        .map(|set| set.union(element).copied().collect())
        .collect()
}
