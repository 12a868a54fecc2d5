//! Point-estimate probability of the top event
//!
//! Cut sets are evaluated with the mean probability of every basic event.
//! The union is computed with the truncated inclusion-exclusion expansion
//! or one of the cheaper approximations selected in [`Settings`].

use std::collections::BTreeSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cut_set::{CutSet, NamedCutSet};
use crate::error::AnalysisResult;
use crate::event::BasicEvent;
use crate::expansion::Expansion;
use crate::indexing::EventIndex;
use crate::settings::{Approximation, Settings};

/// Probability of a single cut set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSetProbability {
    /// Literals of the cut set
    pub literals: Vec<String>,
    /// Probability of the conjunction
    pub probability: f64,
}

/// Results of a point-estimate analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResults {
    /// Total probability of the union of cut sets
    pub p_total: f64,
    /// Approximation used for the total
    pub approximation: Approximation,
    /// Probability of every supplied cut set, in input order
    pub cut_sets: Vec<CutSetProbability>,
    /// Number of cut sets above the cut-off
    pub num_quantified: usize,
}

/// Point-estimate probability analysis
#[derive(Debug, Clone)]
pub struct ProbabilityAnalysis {
    num_sums: usize,
    cut_off: f64,
    approximation: Approximation,
    index: EventIndex,
}

impl ProbabilityAnalysis {
    /// Create an analysis with validated settings
    pub fn new(settings: &Settings) -> AnalysisResult<Self> {
        settings.validate()?;
        Ok(Self {
            num_sums: settings.num_sums,
            cut_off: settings.cut_off,
            approximation: settings.approximation,
            index: EventIndex::default(),
        })
    }

    /// Replace the basic event table
    pub fn update_database(
        &mut self,
        events: impl IntoIterator<Item = BasicEvent>,
    ) -> AnalysisResult<()> {
        self.index = EventIndex::assign_indices(events)?;
        Ok(())
    }

    /// Event table in use
    pub fn event_index(&self) -> &EventIndex {
        &self.index
    }

    /// Quantify a collection of minimal cut sets
    pub fn analyze<'c>(
        &self,
        min_cut_sets: impl IntoIterator<Item = &'c NamedCutSet>,
    ) -> AnalysisResult<ProbabilityResults> {
        let start = Instant::now();
        let named: Vec<&NamedCutSet> = min_cut_sets.into_iter().collect();
        let indexed = self.index.index_mcs(named.iter().copied())?;

        let cut_sets: Vec<CutSetProbability> = named
            .iter()
            .zip(&indexed)
            .map(|(literals, cut_set)| CutSetProbability {
                literals: literals.iter().cloned().collect(),
                probability: self.index.prob_and(cut_set),
            })
            .collect();

        let survivors = prune_cut_sets(&self.index, indexed, self.cut_off);
        let num_quantified = survivors.len();

        let p_total = match self.approximation {
            Approximation::None => {
                let nsums = self.num_sums.min(survivors.len());
                Expansion::build(survivors, nsums).evaluate(&self.index)
            }
            Approximation::RareEvent => {
                let sum: f64 = survivors.iter().map(|c| self.index.prob_and(c)).sum();
                sum.min(1.0)
            }
            Approximation::Mcub => {
                1.0 - survivors
                    .iter()
                    .map(|c| 1.0 - self.index.prob_and(c))
                    .product::<f64>()
            }
        };

        log::debug!(
            "Probability of {} cut sets ({} above cut-off): {} in {:?}",
            cut_sets.len(),
            num_quantified,
            p_total,
            start.elapsed()
        );

        Ok(ProbabilityResults {
            p_total,
            approximation: self.approximation,
            cut_sets,
            num_quantified,
        })
    }
}

/// Drop cut sets whose point probability is at or below `cut_off`
pub(crate) fn prune_cut_sets(
    index: &EventIndex,
    cut_sets: Vec<CutSet>,
    cut_off: f64,
) -> BTreeSet<CutSet> {
    let total = cut_sets.len();
    let survivors: BTreeSet<CutSet> = cut_sets
        .into_iter()
        .filter(|cut_set| index.prob_and(cut_set) > cut_off)
        .collect();
    if survivors.len() < total {
        log::debug!(
            "Pruned {} of {} cut sets below cut-off {}",
            total - survivors.len(),
            total,
            cut_off
        );
    }
    survivors
}
