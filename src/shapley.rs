//! Closed-form Shapley values of the cophenetic and diversity games.

use crate::closure::ancestors;
use crate::error::{IndexError, Result};
use crate::fair_proportion::fair_proportion;
use crate::kappa::LeafCounts;
use crate::network::{NodeId, PhyloNetwork};
use crate::weights::EdgeWeight;

/// Cophenetic Shapley value of `node`:
///
/// `W / n - Σ w(e) / (n - κ(head(e)))` over the edges `e` whose head is not
/// an ancestor of `node`, where `n` is the number of leaves and `W` the
/// total edge weight.
///
/// An edge outside the ancestry of `node` whose head covers every leaf has
/// no complement to share its weight with. Such an edge can only exist for
/// an internal `node`; it is skipped when its weight is zero and is an
/// [IndexError::NoComplementLeaves] otherwise.
pub fn cophenetic_shapley_value<W: EdgeWeight>(
    network: &PhyloNetwork,
    node: NodeId,
    weights: &W,
    kappa: Option<&LeafCounts>,
) -> Result<f64> {
    let built;
    let kappa = match kappa {
        Some(kappa) => kappa,
        None => {
            built = LeafCounts::new(network);
            &built
        }
    };

    let num_leaves = kappa.num_leaves();
    let mut above = vec![false; network.node_count()];
    for v in ancestors(network, node) {
        above[v.index()] = true;
    }

    let mut total = 0.0;
    let mut outside = 0.0;
    for edge in network.edges() {
        let weight = weights.weight(network, edge);
        total += weight;
        if above[edge.child.index()] {
            continue;
        }

        let complement = num_leaves - kappa.get(edge.child);
        if complement == 0 {
            if weight == 0.0 {
                continue;
            }
            return Err(IndexError::NoComplementLeaves {
                node: network.display_name(node),
            });
        }
        outside += weight / complement as f64;
    }

    Ok(total / num_leaves as f64 - outside)
}

/// Fair proportion minus cophenetic Shapley value
pub fn unrooted_shapley_value<W: EdgeWeight>(
    network: &PhyloNetwork,
    node: NodeId,
    weights: &W,
    kappa: Option<&LeafCounts>,
) -> Result<f64> {
    let built;
    let kappa = match kappa {
        Some(kappa) => kappa,
        None => {
            built = LeafCounts::new(network);
            &built
        }
    };

    Ok(fair_proportion(network, node, weights, Some(kappa))
        - cophenetic_shapley_value(network, node, weights, Some(kappa))?)
}
