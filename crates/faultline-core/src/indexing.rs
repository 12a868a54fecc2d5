//! Integer indexing of basic events for quantification
//!
//! Index 0 is a sentinel with probability zero; real events get `1..=n` in
//! the order they were supplied. Cut sets in named-literal form are
//! translated into signed indices over this table.

use std::collections::HashMap;

use rand::Rng;

use crate::cut_set::{parse_literal, CutSet, NamedCutSet};
use crate::error::{AnalysisError, AnalysisResult};
use crate::event::BasicEvent;

/// Basic event table with current probability values
#[derive(Debug, Clone)]
pub struct EventIndex {
    /// Events; event `i` lives at position `i - 1`
    events: Vec<BasicEvent>,
    /// Identifier to index
    id_to_index: HashMap<String, i32>,
    /// Current probability by index, sentinel at 0
    probabilities: Vec<f64>,
}

impl Default for EventIndex {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            id_to_index: HashMap::new(),
            probabilities: vec![0.0],
        }
    }
}

impl EventIndex {
    /// Index validated basic events
    pub fn assign_indices(events: impl IntoIterator<Item = BasicEvent>) -> AnalysisResult<Self> {
        let mut index = Self::default();
        for event in events {
            event.validate()?;
            let next = index.probabilities.len() as i32;
            if index.id_to_index.insert(event.id().to_string(), next).is_some() {
                return Err(AnalysisError::InvalidArgument(format!(
                    "Duplicate basic event: {}",
                    event.id()
                )));
            }
            index.probabilities.push(event.p());
            index.events.push(event);
        }
        Ok(index)
    }

    /// Number of indexed events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check whether the table holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Index of an event identifier
    pub fn index_of(&self, id: &str) -> Option<i32> {
        self.id_to_index.get(id).copied()
    }

    /// Event stored at an index
    pub fn event(&self, index: i32) -> Option<&BasicEvent> {
        usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.events.get(i))
    }

    /// Current probability of an index (sentinel included)
    pub fn probability(&self, index: i32) -> f64 {
        self.probabilities[index.unsigned_abs() as usize]
    }

    /// Restore the point estimates of every event
    pub fn reset_probabilities(&mut self) {
        for (i, event) in self.events.iter().enumerate() {
            self.probabilities[i + 1] = event.p();
        }
    }

    /// Translate named cut sets into signed index sets
    pub fn index_mcs<'c>(
        &self,
        min_cut_sets: impl IntoIterator<Item = &'c NamedCutSet>,
    ) -> AnalysisResult<Vec<CutSet>> {
        min_cut_sets
            .into_iter()
            .map(|cut_set| {
                cut_set
                    .iter()
                    .map(|token| {
                        let (id, positive) = parse_literal(token)?;
                        let index = self
                            .index_of(id)
                            .ok_or_else(|| AnalysisError::UnknownEvent(id.to_string()))?;
                        Ok(if positive { index } else { -index })
                    })
                    .collect::<AnalysisResult<CutSet>>()
            })
            .collect()
    }

    /// Probability of the conjunction of a cut set's literals
    ///
    /// The empty conjunction is certain: the single empty cut set of a unity
    /// top event quantifies to 1, not 0.
    pub fn prob_and(&self, cut_set: &CutSet) -> f64 {
        cut_set
            .iter()
            .map(|&lit| {
                let p = self.probability(lit);
                if lit > 0 {
                    p
                } else {
                    1.0 - p
                }
            })
            .product()
    }

    /// Reset and resample every event for one Monte Carlo trial
    ///
    /// Returns `true` if any draw fell outside `[0, 1]` and was clamped.
    pub fn resample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        for event in &mut self.events {
            event.reset();
        }
        let mut clamped = false;
        for (i, event) in self.events.iter_mut().enumerate() {
            let prob = event.sample_probability(rng);
            if !(0.0..=1.0).contains(&prob) {
                clamped = true;
            }
            self.probabilities[i + 1] = prob.clamp(0.0, 1.0);
        }
        clamped
    }
}
