//! Cophenetic value and phylogenetic subnet diversity of a node set.
//!
//! Both indices sum the weight of every edge whose head lies in a set built
//! from the ancestor closures of the targets: their intersection for the
//! cophenetic value, their union for the rooted diversity.

use crate::closure::ancestors;
use crate::network::{NodeId, PhyloNetwork};
use crate::weights::EdgeWeight;

/// For every node, how many of `targets` it is an ancestor of (or equal to)
fn ancestor_multiplicity(network: &PhyloNetwork, targets: &[NodeId]) -> Vec<usize> {
    let mut multiplicity = vec![0; network.node_count()];
    for &target in targets {
        for node in ancestors(network, target) {
            multiplicity[node.index()] += 1;
        }
    }
    multiplicity
}

/// Sum of weights of the edges whose head satisfies `keep`
fn weight_into<W, F>(network: &PhyloNetwork, weights: &W, keep: F) -> f64
where
    W: EdgeWeight,
    F: Fn(NodeId) -> bool,
{
    network
        .edges()
        .iter()
        .filter(|edge| keep(edge.child))
        .map(|edge| weights.weight(network, edge))
        .sum()
}

/// Total weight of the edges above the common ancestry of `targets`.
///
/// An empty target set has value 0.
pub fn cophenetic_value<W: EdgeWeight>(
    network: &PhyloNetwork,
    targets: &[NodeId],
    weights: &W,
) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let multiplicity = ancestor_multiplicity(network, targets);
    weight_into(network, weights, |v| multiplicity[v.index()] == targets.len())
}

/// Total weight of the edges on any lineage from the root to a target.
///
/// An empty target set spans no edge and has value 0.
pub fn rooted_phylogenetic_diversity<W: EdgeWeight>(
    network: &PhyloNetwork,
    targets: &[NodeId],
    weights: &W,
) -> f64 {
    let multiplicity = ancestor_multiplicity(network, targets);
    weight_into(network, weights, |v| multiplicity[v.index()] > 0)
}

/// Rooted diversity minus the cophenetic value
pub fn unrooted_phylogenetic_diversity<W: EdgeWeight>(
    network: &PhyloNetwork,
    targets: &[NodeId],
    weights: &W,
) -> f64 {
    rooted_phylogenetic_diversity(network, targets, weights)
        - cophenetic_value(network, targets, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enewick::parse_enewick;
    use crate::weights::StoredWeight;

    const TOLERANCE: f64 = 1e-12;

    fn example() -> PhyloNetwork {
        parse_enewick("((1:0,(3,#H1)c:0.3)a:0.1,(2,((4:0.5)H#H1,5)d:0.4)b:0.2)r;").unwrap()
    }

    #[test]
    fn test_empty_targets() {
        let net = example();
        assert_eq!(cophenetic_value(&net, &[], &StoredWeight), 0.0);
        assert_eq!(rooted_phylogenetic_diversity(&net, &[], &StoredWeight), 0.0);
        assert_eq!(unrooted_phylogenetic_diversity(&net, &[], &StoredWeight), 0.0);
    }

    #[test]
    fn test_single_target_spans_its_lineage() {
        let net = example();
        let four = net.nodes_by_taxa(&["4"]).unwrap();
        // H-4, c-H, d-H, a-c, b-d, r-a, r-b
        let expected = 0.5 + 0.3 + 0.4 + 0.1 + 0.2;
        let cv = cophenetic_value(&net, &four, &StoredWeight);
        let rpd = rooted_phylogenetic_diversity(&net, &four, &StoredWeight);
        assert!((cv - expected).abs() < TOLERANCE);
        assert!((rpd - expected).abs() < TOLERANCE);
        assert!(unrooted_phylogenetic_diversity(&net, &four, &StoredWeight).abs() < TOLERANCE);
    }

    #[test]
    fn test_duplicated_targets_do_not_change_values() {
        let net = example();
        let once = net.nodes_by_taxa(&["3", "4"]).unwrap();
        let twice = net.nodes_by_taxa(&["3", "4", "3"]).unwrap();
        assert_eq!(
            cophenetic_value(&net, &once, &StoredWeight),
            cophenetic_value(&net, &twice, &StoredWeight)
        );
        assert_eq!(
            rooted_phylogenetic_diversity(&net, &once, &StoredWeight),
            rooted_phylogenetic_diversity(&net, &twice, &StoredWeight)
        );
    }

    #[test]
    fn test_only_root_in_common() {
        let net = example();
        let targets = net.nodes_by_taxa(&["1", "2", "3"]).unwrap();
        assert_eq!(cophenetic_value(&net, &targets, &StoredWeight), 0.0);
    }
}
