//! Indexed fault tree
//!
//! The normalized Boolean graph consumed by MOCUS. Every node is addressed by
//! a positive integer index:
//!
//! - `1 .. gate_index` are basic events
//! - `gate_index ..` are gates, some of which are flagged as modules
//!
//! Gate children are signed: a negative child is the complement of a basic
//! event. Gates themselves never appear complemented after normalization.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::cut_set::{format_literal, CutSet, NamedCutSet};
use crate::error::{AnalysisError, AnalysisResult};

/// Logical connective of a normalized gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// All children must occur
    And,
    /// Any child occurring is sufficient
    Or,
}

/// Constant state left over from normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateState {
    /// Regular gate driven by its children
    #[default]
    Normal,
    /// Constant false
    Null,
    /// Constant true
    Unity,
}

/// A gate record of the indexed tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedGate {
    /// Index of this gate
    pub index: i32,
    /// Connective
    pub kind: GateKind,
    /// Signed child indices
    pub children: BTreeSet<i32>,
    /// Constant state, if the gate collapsed
    pub state: GateState,
}

impl IndexedGate {
    /// Create a new gate in the normal state
    pub fn new(index: i32, kind: GateKind, children: impl IntoIterator<Item = i32>) -> Self {
        Self {
            index,
            kind,
            children: children.into_iter().collect(),
            state: GateState::Normal,
        }
    }
}

/// Indexed, normalized fault tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedFaultTree {
    /// Index of the top gate
    top_index: i32,
    /// First gate index; everything below is a basic event
    gate_index: i32,
    /// Gates by index
    gates: IndexMap<i32, IndexedGate>,
    /// Gate indices that are independent modules
    modules: BTreeSet<i32>,
    /// Optional basic event identifiers by index
    basic_event_names: HashMap<i32, String>,
}

impl IndexedFaultTree {
    /// Create an empty tree
    pub fn new(top_index: i32, gate_index: i32) -> Self {
        Self {
            top_index,
            gate_index,
            gates: IndexMap::new(),
            modules: BTreeSet::new(),
            basic_event_names: HashMap::new(),
        }
    }

    /// Add or replace a gate
    pub fn add_gate(
        &mut self,
        index: i32,
        kind: GateKind,
        children: impl IntoIterator<Item = i32>,
    ) -> &mut IndexedGate {
        let gate = IndexedGate::new(index, kind, children);
        self.gates.insert(index, gate);
        &mut self.gates[&index]
    }

    /// Set the constant state of a gate
    pub fn set_state(&mut self, index: i32, state: GateState) -> AnalysisResult<()> {
        let gate = self
            .gates
            .get_mut(&index)
            .ok_or_else(|| AnalysisError::InvalidTree(format!("No gate with index {}", index)))?;
        gate.state = state;
        Ok(())
    }

    /// Flag a gate as an independent module
    pub fn add_module(&mut self, index: i32) {
        self.modules.insert(index);
    }

    /// Attach an identifier to a basic event index
    pub fn set_basic_event_name(&mut self, index: i32, id: &str) {
        self.basic_event_names.insert(index, id.to_string());
    }

    /// Index of the top gate
    pub fn top_index(&self) -> i32 {
        self.top_index
    }

    /// First index used by gates
    pub fn gate_index(&self) -> i32 {
        self.gate_index
    }

    /// Get a gate by index
    pub fn gate(&self, index: i32) -> Option<&IndexedGate> {
        self.gates.get(&index)
    }

    /// All gates in insertion order
    pub fn gates(&self) -> impl Iterator<Item = &IndexedGate> {
        self.gates.values()
    }

    /// Module indices
    pub fn modules(&self) -> &BTreeSet<i32> {
        &self.modules
    }

    /// Check whether an index is flagged as a module
    pub fn is_module(&self, index: i32) -> bool {
        self.modules.contains(&index)
    }

    /// Check whether a (signed) index addresses a gate
    pub fn is_gate_index(&self, index: i32) -> bool {
        index.abs() >= self.gate_index
    }

    /// Identifier of a basic event, if one was attached
    pub fn basic_event_name(&self, index: i32) -> Option<&str> {
        self.basic_event_names.get(&index.abs()).map(String::as_str)
    }

    /// Convert an integer cut set into named literals
    pub fn literal_names(&self, cut_set: &CutSet) -> AnalysisResult<NamedCutSet> {
        cut_set
            .iter()
            .map(|&lit| {
                self.basic_event_name(lit)
                    .map(|id| format_literal(id, lit > 0))
                    .ok_or_else(|| AnalysisError::UnknownEvent(format!("index {}", lit)))
            })
            .collect()
    }

    /// Check every structural precondition of the cut set generator
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.gate_index < 1 {
            return Err(AnalysisError::InvalidTree(format!(
                "Gate index threshold must be positive, got {}",
                self.gate_index
            )));
        }
        if !self.gates.contains_key(&self.top_index) {
            return Err(AnalysisError::InvalidTree(format!(
                "Top gate {} is not defined",
                self.top_index
            )));
        }

        for gate in self.gates.values() {
            if gate.index < self.gate_index {
                return Err(AnalysisError::InvalidTree(format!(
                    "Gate {} is below the gate index threshold {}",
                    gate.index, self.gate_index
                )));
            }
            for &child in &gate.children {
                if child == 0 {
                    return Err(AnalysisError::InvalidTree(format!(
                        "Gate {} has a zero child index",
                        gate.index
                    )));
                }
                if self.is_gate_index(child) {
                    if child < 0 {
                        return Err(AnalysisError::InvalidTree(format!(
                            "Gate {} has a complemented gate child {}",
                            gate.index, child
                        )));
                    }
                    if !self.gates.contains_key(&child) {
                        return Err(AnalysisError::InvalidTree(format!(
                            "Gate {} refers to undefined gate {}",
                            gate.index, child
                        )));
                    }
                }
            }
        }

        for &module in &self.modules {
            if !self.gates.contains_key(&module) {
                return Err(AnalysisError::InvalidTree(format!(
                    "Module {} is not a gate",
                    module
                )));
            }
        }

        self.check_acyclic()
    }

    /// Cycle detection over gate-to-gate edges
    fn check_acyclic(&self) -> AnalysisResult<()> {
        let mut graph: DiGraphMap<i32, ()> = DiGraphMap::new();
        for gate in self.gates.values() {
            graph.add_node(gate.index);
            for &child in gate.children.iter().filter(|&&c| self.is_gate_index(c)) {
                graph.add_edge(gate.index, child, ());
            }
        }
        match toposort(&graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(AnalysisError::InvalidTree(format!(
                "Cycle detected through gate {}",
                cycle.node_id()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_train_tree() -> IndexedFaultTree {
        // TopEvent = TrainOne AND TrainTwo
        // TrainOne = PumpOne OR ValveOne, TrainTwo = PumpTwo OR ValveTwo
        let mut tree = IndexedFaultTree::new(5, 5);
        tree.add_gate(5, GateKind::And, [6, 7]);
        tree.add_gate(6, GateKind::Or, [1, 3]);
        tree.add_gate(7, GateKind::Or, [2, 4]);
        for (index, id) in [(1, "PumpOne"), (2, "PumpTwo"), (3, "ValveOne"), (4, "ValveTwo")] {
            tree.set_basic_event_name(index, id);
        }
        tree
    }

    #[test]
    fn test_valid_tree() {
        let tree = two_train_tree();
        assert!(tree.validate().is_ok());
        assert!(tree.is_gate_index(6));
        assert!(!tree.is_gate_index(4));
        assert_eq!(tree.gates().count(), 3);
    }

    #[test]
    fn test_missing_top() {
        let tree = IndexedFaultTree::new(9, 5);
        assert!(matches!(tree.validate(), Err(AnalysisError::InvalidTree(_))));
    }

    #[test]
    fn test_undefined_child_gate() {
        let mut tree = two_train_tree();
        tree.add_gate(7, GateKind::Or, [2, 8]);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_negative_gate_child() {
        let mut tree = two_train_tree();
        tree.add_gate(5, GateKind::And, [6, -7]);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_zero_child() {
        let mut tree = two_train_tree();
        tree.add_gate(6, GateKind::Or, [0, 3]);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_module_must_be_gate() {
        let mut tree = two_train_tree();
        tree.add_module(42);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_cycle_detection() {
        let mut tree = two_train_tree();
        tree.add_gate(7, GateKind::Or, [2, 5]);
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("Cycle"));
    }

    #[test]
    fn test_self_loop_detection() {
        let mut tree = two_train_tree();
        tree.add_gate(6, GateKind::And, [1, 6]);
        assert!(matches!(tree.validate(), Err(AnalysisError::InvalidTree(_))));
    }

    #[test]
    fn test_shared_gate_is_not_a_cycle() {
        let mut tree = two_train_tree();
        tree.add_gate(7, GateKind::Or, [2, 6]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_set_state() {
        let mut tree = two_train_tree();
        tree.set_state(6, GateState::Unity).unwrap();
        assert_eq!(tree.gate(6).unwrap().state, GateState::Unity);
        assert!(tree.set_state(99, GateState::Null).is_err());
    }

    #[test]
    fn test_literal_names() {
        let tree = two_train_tree();
        let cut_set: CutSet = [-2, 1].into_iter().collect();
        let names = tree.literal_names(&cut_set).unwrap();
        assert!(names.contains("PumpOne"));
        assert!(names.contains("not PumpTwo"));

        let unnamed: CutSet = [1, 9].into_iter().collect();
        assert!(matches!(
            tree.literal_names(&unnamed),
            Err(AnalysisError::UnknownEvent(_))
        ));
    }
}
