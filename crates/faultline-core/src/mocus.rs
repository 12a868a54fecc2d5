//! MOCUS minimal cut set generation
//!
//! The indexed tree is converted into simple gates first. Module gates are
//! kept as opaque literals in their parents and solved separately, so their
//! minimal cut sets can be joined into parent cut sets without another
//! minimality check.
//!
//! Phases:
//! 1. Constant top gate: unity gives one empty cut set, null gives none.
//! 2. Simple tree construction, memoized by gate index.
//! 3. Generation and minimization for the top gate.
//! 4. Work-list join of module cut sets, solving each module once.

use std::collections::HashMap;
use std::time::Instant;

use crate::cut_set::{basic_order, max_literal, CutSet};
use crate::error::{AnalysisError, AnalysisResult};
use crate::indexed_tree::{GateKind, GateState, IndexedFaultTree};
use crate::simple_gate::{CutSetCollection, CutSetGenerator, SimpleGateArena, SimpleGateId};

/// Minimal cut set finder for one indexed fault tree
pub struct Mocus<'a> {
    /// Validated input tree
    fault_tree: &'a IndexedFaultTree,
    /// Maximum cut set size
    limit_order: usize,
    /// Minimal cut sets of the last run
    imcs: Vec<CutSet>,
}

impl<'a> Mocus<'a> {
    /// Create a finder after validating the tree
    pub fn new(fault_tree: &'a IndexedFaultTree, limit_order: usize) -> AnalysisResult<Self> {
        if limit_order < 1 {
            return Err(AnalysisError::InvalidArgument(
                "The limit on the order of minimal cut sets cannot be less than one".to_string(),
            ));
        }
        fault_tree.validate()?;
        Ok(Self {
            fault_tree,
            limit_order,
            imcs: Vec::new(),
        })
    }

    /// Minimal cut sets found by the last call to [`Mocus::find_mcs`]
    pub fn mcs(&self) -> &[CutSet] {
        &self.imcs
    }

    /// Take ownership of the minimal cut sets
    pub fn into_mcs(self) -> Vec<CutSet> {
        self.imcs
    }

    /// Find minimal cut sets of the top gate
    ///
    /// The result holds basic event literals only, ordered by size. A single
    /// empty cut set means the top event is certain.
    pub fn find_mcs(&mut self) -> AnalysisResult<()> {
        let start = Instant::now();
        log::debug!("Start minimal cut set generation");
        self.imcs.clear();

        let tree = self.fault_tree;
        let top_index = tree.top_index();
        let top = tree.gate(top_index).ok_or_else(|| {
            AnalysisError::InvalidTree(format!("Top gate {} is not defined", top_index))
        })?;

        if top.children.is_empty() || top.state != GateState::Normal {
            match top.state {
                GateState::Unity => self.imcs.push(CutSet::new()),
                GateState::Null => {}
                GateState::Normal => {
                    return Err(AnalysisError::InvalidTree(format!(
                        "Top gate {} has no children and no constant state",
                        top_index
                    )))
                }
            }
            log::debug!("Top gate {} is constant: {:?}", top_index, top.state);
            return Ok(());
        }

        let mut arena = SimpleGateArena::new();
        let mut simple_gates: HashMap<i32, SimpleGateId> = HashMap::new();
        let top_gate = self.create_simple_tree(top_index, &mut arena, &mut simple_gates)?;
        log::trace!("Created {} simple gates", arena.len());

        let generator = CutSetGenerator::new(&arena, self.limit_order, tree.gate_index());
        log::trace!("Finding MCS from top module: {}", top_index);
        let mut mcs = find_mcs_from_simple_gate(&generator, top_gate);
        log::trace!("Top gate cut sets are generated");

        log::trace!("Joining modules");
        let gate_index = tree.gate_index();
        let mut module_mcs: HashMap<i32, Vec<CutSet>> = HashMap::new();
        let mut unity_module = false;
        while let Some(mut member) = mcs.pop() {
            let module = match max_literal(&member) {
                Some(lit) if lit >= gate_index => lit,
                _ => {
                    self.imcs.push(member);
                    continue;
                }
            };
            member.remove(&module);

            if !module_mcs.contains_key(&module) {
                let gate = *simple_gates.get(&module).ok_or_else(|| {
                    AnalysisError::InvalidTree(format!("Module {} has no gate", module))
                })?;
                log::trace!("Finding MCS from module index: {}", module);
                let sub_mcs = find_mcs_from_simple_gate(&generator, gate);
                if sub_mcs.iter().any(CutSet::is_empty) {
                    log::warn!("Module {} is unity; joined cut sets will be re-minimized", module);
                    unity_module = true;
                }
                module_mcs.insert(module, sub_mcs);
            }

            let member_order = basic_order(&member, gate_index);
            for sub in &module_mcs[&module] {
                if basic_order(sub, gate_index) + member_order <= self.limit_order {
                    let mut joined = sub.clone();
                    joined.extend(member.iter().copied());
                    mcs.push(joined);
                }
            }
        }

        if unity_module {
            let joined: CutSetCollection = self.imcs.drain(..).collect();
            self.imcs = minimize_collection(&joined);
        }
        if self.imcs.iter().any(CutSet::is_empty) {
            log::warn!("Top gate {} reduces to unity", top_index);
            self.imcs = vec![CutSet::new()];
        }
        self.imcs
            .sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        log::debug!("The number of MCS found: {}", self.imcs.len());
        log::debug!("Minimal cut set finding time: {:?}", start.elapsed());
        Ok(())
    }

    /// Convert an indexed gate and its descendants into simple gates
    ///
    /// Module children are recorded as literals in the parent but still get
    /// their own simple gate for later solving.
    fn create_simple_tree(
        &self,
        gate_index: i32,
        arena: &mut SimpleGateArena,
        processed_gates: &mut HashMap<i32, SimpleGateId>,
    ) -> AnalysisResult<SimpleGateId> {
        if let Some(&id) = processed_gates.get(&gate_index) {
            return Ok(id);
        }
        let tree = self.fault_tree;
        let gate = tree.gate(gate_index).ok_or_else(|| {
            AnalysisError::InvalidTree(format!("No gate with index {}", gate_index))
        })?;

        // Constant gates keep no children: an empty OR is null, an empty AND
        // passes its input through.
        let kind = match gate.state {
            GateState::Normal => gate.kind,
            GateState::Null => GateKind::Or,
            GateState::Unity => GateKind::And,
        };
        let id = arena.add(kind);
        processed_gates.insert(gate_index, id);
        if gate.state != GateState::Normal {
            return Ok(id);
        }

        for &child in &gate.children {
            if tree.is_gate_index(child) {
                let child_id = self.create_simple_tree(child, arena, processed_gates)?;
                if tree.is_module(child) {
                    arena.add_module(id, child);
                } else {
                    arena.add_child_gate(id, child_id);
                }
            } else {
                arena.add_basic_event(id, child);
            }
        }
        Ok(id)
    }
}

/// Generate and minimize the cut sets of one simple gate
fn find_mcs_from_simple_gate(generator: &CutSetGenerator<'_>, gate: SimpleGateId) -> Vec<CutSet> {
    let start = Instant::now();
    let mut cut_sets = CutSetCollection::new();
    generator.generate_cut_sets(gate, &CutSet::new(), &mut cut_sets);
    log::trace!("Unique cut sets generated: {}", cut_sets.len());
    log::trace!("Cut set generation time: {:?}", start.elapsed());

    let start = Instant::now();
    let mcs = minimize_collection(&cut_sets);
    log::trace!("The number of local MCS: {}", mcs.len());
    log::trace!("Cut set minimization time: {:?}", start.elapsed());
    mcs
}

/// Reduce unique cut sets to the minimal ones
///
/// Singletons are minimal by construction; the rest go through
/// [`minimize_cut_sets`] starting at order two. An empty set absorbs
/// everything else.
pub fn minimize_collection(cut_sets: &CutSetCollection) -> Vec<CutSet> {
    if cut_sets.contains(&CutSet::new()) {
        return vec![CutSet::new()];
    }
    let mut mcs: Vec<CutSet> = Vec::new();
    let mut candidates: Vec<&CutSet> = Vec::with_capacity(cut_sets.len());
    for cut_set in cut_sets {
        if cut_set.len() == 1 {
            mcs.push(cut_set.clone());
        } else {
            candidates.push(cut_set);
        }
    }
    let singletons = mcs.clone();
    minimize_cut_sets(&candidates, &singletons, 2, &mut mcs);
    mcs
}

/// Order-by-order subsumption filter
///
/// At each order, candidates containing a confirmed minimal set of the
/// previous order are dropped, survivors of exactly this order are minimal,
/// and larger survivors move on to the next order.
pub fn minimize_cut_sets(
    cut_sets: &[&CutSet],
    mcs_lower_order: &[CutSet],
    min_order: usize,
    mcs: &mut Vec<CutSet>,
) {
    let mut candidates: Vec<&CutSet> = cut_sets.to_vec();
    let mut lower_order: Vec<CutSet> = mcs_lower_order.to_vec();
    let mut order = min_order;

    while !candidates.is_empty() {
        let mut next_candidates: Vec<&CutSet> = Vec::new();
        let mut order_mcs: Vec<CutSet> = Vec::new();
        for cut_set in candidates {
            debug_assert!(cut_set.len() >= order);
            if lower_order.iter().any(|min| min.is_subset(cut_set)) {
                continue;
            }
            if cut_set.len() == order {
                order_mcs.push(cut_set.clone());
            } else {
                next_candidates.push(cut_set);
            }
        }
        mcs.extend(order_mcs.iter().cloned());
        lower_order = order_mcs;
        candidates = next_candidates;
        order += 1;
    }
}
