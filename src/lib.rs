//! Phylogenetic network index computation library
//!
//! This library computes diversity and fair-allocation indices over rooted
//! phylogenetic networks: cophenetic value, rooted and unrooted phylogenetic
//! subnet diversity, fair proportion, and the cophenetic and unrooted Shapley
//! values. Networks may contain reticulations, so every index accounts for
//! ancestry shared through hybrid nodes.

pub mod closure;
pub mod diversity;
pub mod enewick;
pub mod error;
pub mod fair_proportion;
pub mod kappa;
pub mod network;
pub mod report;
pub mod session;
pub mod shapley;
pub mod weights;

// Re-export main types and functions
pub use enewick::parse_enewick;
pub use error::{IndexError, Result};
pub use kappa::LeafCounts;
pub use network::{Edge, NetworkBuilder, NodeId, PhyloNetwork};
pub use report::NodeValue;
pub use session::{IndexSession, NodeIndex, SetIndex};
pub use weights::{EdgeWeight, StoredWeight, WeightFn, WeightTable};
