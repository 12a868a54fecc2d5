//! Simple AND/OR gates for cut set generation
//!
//! A [`SimpleGate`] is a flattened view of an indexed gate: its basic event
//! literals, the module indices it references, and its nested gates. Nested
//! gates live in a [`SimpleGateArena`] and are referenced by [`SimpleGateId`],
//! so shared sub-gates are converted once and never aliased.
//!
//! Generation pushes a partial cut set down the tree:
//!
//! - An AND gate adds all of its literals and modules, then lets each nested
//!   gate expand the resulting frontier in turn.
//! - An OR gate stops if the partial set already satisfies it (local
//!   minimality), otherwise it branches once per literal and module and asks
//!   its nested gates to extend the original partial set.
//!
//! Collections are `BTreeSet`s, which keeps every generated cut set unique.

use std::collections::BTreeSet;

use crate::cut_set::{basic_order, is_contradictory, CutSet};
use crate::indexed_tree::GateKind;

/// Unique cut sets produced by generation
pub type CutSetCollection = BTreeSet<CutSet>;

/// Handle of a gate inside a [`SimpleGateArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimpleGateId(usize);

/// AND/OR gate with flattened children
#[derive(Debug, Clone)]
pub struct SimpleGate {
    /// Connective
    pub kind: GateKind,
    /// Signed basic event literals
    pub basic_events: Vec<i32>,
    /// Module indices, resolved after generation
    pub modules: Vec<i32>,
    /// Nested gates
    pub gates: Vec<SimpleGateId>,
}

impl SimpleGate {
    /// Create a gate without children
    pub fn new(kind: GateKind) -> Self {
        Self {
            kind,
            basic_events: Vec::new(),
            modules: Vec::new(),
            gates: Vec::new(),
        }
    }

    /// Literals and modules owned directly by this gate
    fn own_literals(&self) -> impl Iterator<Item = &i32> {
        self.basic_events.iter().chain(&self.modules)
    }
}

/// Owner of all simple gates of one analysis run
#[derive(Debug, Clone, Default)]
pub struct SimpleGateArena {
    gates: Vec<SimpleGate>,
}

impl SimpleGateArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a gate and return its handle
    pub fn add(&mut self, kind: GateKind) -> SimpleGateId {
        let id = SimpleGateId(self.gates.len());
        self.gates.push(SimpleGate::new(kind));
        id
    }

    /// Get a gate by handle
    pub fn get(&self, id: SimpleGateId) -> &SimpleGate {
        &self.gates[id.0]
    }

    /// Add a basic event literal to a gate
    pub fn add_basic_event(&mut self, id: SimpleGateId, literal: i32) {
        self.gates[id.0].basic_events.push(literal);
    }

    /// Add a module reference to a gate
    pub fn add_module(&mut self, id: SimpleGateId, module: i32) {
        self.gates[id.0].modules.push(module);
    }

    /// Nest `child` under `parent`
    pub fn add_child_gate(&mut self, parent: SimpleGateId, child: SimpleGateId) {
        self.gates[parent.0].gates.push(child);
    }

    /// Number of allocated gates
    pub(crate) fn len(&self) -> usize {
        self.gates.len()
    }
}

/// Cut set generator bound to one arena and one limit order
///
/// Only basic event literals count toward the limit. Module references are
/// placeholders whose size is known once their cut sets are joined.
#[derive(Debug, Clone, Copy)]
pub struct CutSetGenerator<'a> {
    arena: &'a SimpleGateArena,
    limit_order: usize,
    gate_index: i32,
}

impl<'a> CutSetGenerator<'a> {
    /// Create a generator; literals at or above `gate_index` are modules
    pub fn new(arena: &'a SimpleGateArena, limit_order: usize, gate_index: i32) -> Self {
        Self {
            arena,
            limit_order,
            gate_index,
        }
    }

    /// Generate all cut sets obtained by satisfying `gate` on top of `cut_set`
    pub fn generate_cut_sets(
        &self,
        gate: SimpleGateId,
        cut_set: &CutSet,
        new_cut_sets: &mut CutSetCollection,
    ) {
        debug_assert!(basic_order(cut_set, self.gate_index) <= self.limit_order);
        let gate = self.arena.get(gate);
        match gate.kind {
            GateKind::And => self.and_gate_cut_sets(gate, cut_set, new_cut_sets),
            GateKind::Or => self.or_gate_cut_sets(gate, cut_set, new_cut_sets),
        }
    }

    fn and_gate_cut_sets(
        &self,
        gate: &SimpleGate,
        cut_set: &CutSet,
        new_cut_sets: &mut CutSetCollection,
    ) {
        let mut base = cut_set.clone();
        base.extend(gate.own_literals().copied());
        // Null: the conjunction contains a literal and its complement.
        if is_contradictory(&base) {
            return;
        }
        if basic_order(&base, self.gate_index) > self.limit_order {
            return;
        }

        let mut arguments = CutSetCollection::new();
        arguments.insert(base.clone());
        for &child in &gate.gates {
            let mut results = CutSetCollection::new();
            for set in &arguments {
                self.generate_cut_sets(child, set, &mut results);
            }
            arguments = results;
            if arguments.is_empty() {
                return;
            }
        }

        // Every argument is a superset of the base set; if the base itself
        // survived, the rest are non-minimal.
        if arguments.contains(&base) {
            new_cut_sets.insert(base);
        } else {
            new_cut_sets.extend(arguments);
        }
    }

    fn or_gate_cut_sets(
        &self,
        gate: &SimpleGate,
        cut_set: &CutSet,
        new_cut_sets: &mut CutSetCollection,
    ) {
        // Local minimality: the gate is already satisfied.
        if gate.own_literals().any(|lit| cut_set.contains(lit)) {
            new_cut_sets.insert(cut_set.clone());
            return;
        }

        let mut local_sets = CutSetCollection::new();
        // Every basic event branch grows the order by one.
        if basic_order(cut_set, self.gate_index) < self.limit_order {
            for &lit in &gate.basic_events {
                if !cut_set.contains(&-lit) {
                    let mut new_set = cut_set.clone();
                    new_set.insert(lit);
                    local_sets.insert(new_set);
                }
            }
        }
        // Modules are never complemented.
        for &module in &gate.modules {
            let mut new_set = cut_set.clone();
            new_set.insert(module);
            local_sets.insert(new_set);
        }

        for &child in &gate.gates {
            self.generate_cut_sets(child, cut_set, &mut local_sets);
            if local_sets.contains(cut_set) {
                new_cut_sets.insert(cut_set.clone());
                return;
            }
        }
        new_cut_sets.extend(local_sets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATE_INDEX: i32 = 10;

    fn set(literals: &[i32]) -> CutSet {
        literals.iter().copied().collect()
    }

    fn generator(arena: &SimpleGateArena, limit: usize) -> CutSetGenerator<'_> {
        CutSetGenerator::new(arena, limit, GATE_INDEX)
    }

    fn generate(arena: &SimpleGateArena, root: SimpleGateId, limit: usize) -> CutSetCollection {
        let mut out = CutSetCollection::new();
        generator(arena, limit).generate_cut_sets(root, &CutSet::new(), &mut out);
        out
    }

    #[test]
    fn test_or_gate_branches() {
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::Or);
        arena.add_basic_event(top, 1);
        arena.add_basic_event(top, 2);

        let out = generate(&arena, top, 20);
        assert_eq!(out.len(), 2);
        assert!(out.contains(&set(&[1])));
        assert!(out.contains(&set(&[2])));
    }

    #[test]
    fn test_and_gate_merges_literals() {
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::And);
        arena.add_basic_event(top, 1);
        arena.add_basic_event(top, 2);
        arena.add_module(top, 10);

        let out = generate(&arena, top, 20);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[1, 2, 10])));
    }

    #[test]
    fn test_and_gate_folds_or_children() {
        // 1 AND (2 OR 3) AND (4 OR 5)
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::And);
        let left = arena.add(GateKind::Or);
        let right = arena.add(GateKind::Or);
        arena.add_basic_event(top, 1);
        arena.add_basic_event(left, 2);
        arena.add_basic_event(left, 3);
        arena.add_basic_event(right, 4);
        arena.add_basic_event(right, 5);
        arena.add_child_gate(top, left);
        arena.add_child_gate(top, right);

        let out = generate(&arena, top, 20);
        assert_eq!(out.len(), 4);
        assert!(out.contains(&set(&[1, 2, 4])));
        assert!(out.contains(&set(&[1, 3, 5])));
    }

    #[test]
    fn test_and_gate_base_already_complete() {
        // 1 AND (1 OR 2): the OR child is satisfied by the base set.
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::And);
        let child = arena.add(GateKind::Or);
        arena.add_basic_event(top, 1);
        arena.add_basic_event(child, 1);
        arena.add_basic_event(child, 2);
        arena.add_child_gate(top, child);

        let out = generate(&arena, top, 20);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[1])));
    }

    #[test]
    fn test_and_gate_contradiction_is_null() {
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::And);
        arena.add_basic_event(top, -1);

        let mut out = CutSetCollection::new();
        generator(&arena, 20).generate_cut_sets(top, &set(&[1]), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_or_gate_skips_complement_branch() {
        // 1 AND (-1 OR 2)
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::And);
        let child = arena.add(GateKind::Or);
        arena.add_basic_event(top, 1);
        arena.add_basic_event(child, -1);
        arena.add_basic_event(child, 2);
        arena.add_child_gate(top, child);

        let out = generate(&arena, top, 20);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[1, 2])));
    }

    #[test]
    fn test_or_gate_local_minimality() {
        let mut arena = SimpleGateArena::new();
        let gate = arena.add(GateKind::Or);
        arena.add_basic_event(gate, 3);
        arena.add_basic_event(gate, 4);

        let mut out = CutSetCollection::new();
        generator(&arena, 20).generate_cut_sets(gate, &set(&[1, 3]), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[1, 3])));
    }

    #[test]
    fn test_or_gate_degenerate_and_child() {
        // (1 OR (2 AND 3)) evaluated on {2, 3}: the AND child adds nothing.
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::Or);
        let child = arena.add(GateKind::And);
        arena.add_basic_event(top, 1);
        arena.add_basic_event(child, 2);
        arena.add_basic_event(child, 3);
        arena.add_child_gate(top, child);

        let mut out = CutSetCollection::new();
        generator(&arena, 20).generate_cut_sets(top, &set(&[2, 3]), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[2, 3])));
    }

    #[test]
    fn test_limit_order_drops_large_sets() {
        // 1 OR (2 AND 3) with limit 1
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::Or);
        let child = arena.add(GateKind::And);
        arena.add_basic_event(top, 1);
        arena.add_basic_event(child, 2);
        arena.add_basic_event(child, 3);
        arena.add_child_gate(top, child);

        let out = generate(&arena, top, 1);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[1])));
        assert!(out.iter().all(|cs| cs.len() <= 1));
    }

    #[test]
    fn test_or_gate_at_limit_does_not_branch() {
        let mut arena = SimpleGateArena::new();
        let gate = arena.add(GateKind::Or);
        arena.add_basic_event(gate, 5);

        let mut out = CutSetCollection::new();
        generator(&arena, 2).generate_cut_sets(gate, &set(&[1, 2]), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_generated_sets_are_unique() {
        // (1 AND 2) OR (2 AND 1) produce the same set once.
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::Or);
        let a = arena.add(GateKind::And);
        let b = arena.add(GateKind::And);
        arena.add_basic_event(a, 1);
        arena.add_basic_event(a, 2);
        arena.add_basic_event(b, 2);
        arena.add_basic_event(b, 1);
        arena.add_child_gate(top, a);
        arena.add_child_gate(top, b);

        let out = generate(&arena, top, 20);
        assert_eq!(out.len(), 1);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_and_gate_with_own_complements_is_null() {
        // 3 OR (1 AND -1 AND 2)
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::Or);
        let child = arena.add(GateKind::And);
        arena.add_basic_event(top, 3);
        arena.add_basic_event(child, 1);
        arena.add_basic_event(child, -1);
        arena.add_basic_event(child, 2);
        arena.add_child_gate(top, child);

        let out = generate(&arena, top, 20);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[3])));
    }

    #[test]
    fn test_modules_do_not_count_toward_limit() {
        // 1 AND M10 with limit 1; the module's size is checked at the join.
        let mut arena = SimpleGateArena::new();
        let top = arena.add(GateKind::And);
        arena.add_basic_event(top, 1);
        arena.add_module(top, 10);

        let out = generate(&arena, top, 1);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[1, 10])));

        // 1 OR M11 on {2}: the module branch is kept at the limit.
        let gate = arena.add(GateKind::Or);
        arena.add_basic_event(gate, 1);
        arena.add_module(gate, 11);
        let mut out = CutSetCollection::new();
        generator(&arena, 1).generate_cut_sets(gate, &set(&[2]), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&set(&[2, 11])));
    }
}
