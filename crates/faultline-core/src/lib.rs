//! # Faultline Core
//!
//! Qualitative and quantitative core of a probabilistic risk analysis engine.
//!
//! The qualitative side turns an indexed, normalized fault tree into minimal
//! cut sets with the MOCUS algorithm. Independent sub-trees (modules) are
//! solved once and joined into their parents without re-checking minimality.
//!
//! The quantitative side evaluates the probability of the union of those cut
//! sets with a truncated inclusion-exclusion expansion, either at point
//! estimates ([`ProbabilityAnalysis`]) or under Monte Carlo resampling of the
//! basic event distributions ([`UncertaintyAnalysis`]).
//!
//! ```
//! use faultline_core::{GateKind, IndexedFaultTree, Mocus};
//!
//! // Basic events 1 and 2 under an OR gate with index 3.
//! let mut tree = IndexedFaultTree::new(3, 3);
//! tree.add_gate(3, GateKind::Or, [1, 2]);
//!
//! let mut mocus = Mocus::new(&tree, 20).unwrap();
//! mocus.find_mcs().unwrap();
//! assert_eq!(mocus.mcs().len(), 2);
//! ```

pub mod cut_set;
pub mod error;
pub mod event;
pub mod expansion;
pub mod indexed_tree;
pub mod indexing;
pub mod mocus;
pub mod probability;
pub mod settings;
pub mod simple_gate;
pub mod statistics;
pub mod uncertainty;

pub use cut_set::{CutSet, NamedCutSet};
pub use error::{AnalysisError, AnalysisResult};
pub use event::{BasicEvent, ProbabilityDistribution};
pub use indexed_tree::{GateKind, GateState, IndexedFaultTree, IndexedGate};
pub use mocus::Mocus;
pub use probability::{ProbabilityAnalysis, ProbabilityResults};
pub use settings::{Approximation, Settings};
pub use uncertainty::{UncertaintyAnalysis, UncertaintyResults};
