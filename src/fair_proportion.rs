//! Fair proportion index of a single node.

use crate::closure::ancestors;
use crate::kappa::LeafCounts;
use crate::network::{NodeId, PhyloNetwork};
use crate::weights::EdgeWeight;

/// Fair proportion of `node`: every edge above it contributes its weight
/// split evenly over the κ leaves below the edge's head.
///
/// Builds a [LeafCounts] for this call when none is supplied; pass one in
/// when querying many nodes of the same network.
pub fn fair_proportion<W: EdgeWeight>(
    network: &PhyloNetwork,
    node: NodeId,
    weights: &W,
    kappa: Option<&LeafCounts>,
) -> f64 {
    let built;
    let kappa = match kappa {
        Some(kappa) => kappa,
        None => {
            built = LeafCounts::new(network);
            &built
        }
    };

    ancestors(network, node)
        .flat_map(|v| network.in_edges(v))
        .map(|edge| weights.weight(network, edge) / kappa.get(edge.child) as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enewick::parse_enewick;
    use crate::weights::StoredWeight;

    #[test]
    fn test_tree_with_unit_weights() {
        // ((a,b)x,c)r with every edge of weight 1
        let net = parse_enewick("((a:1,b:1)x:1,c:1)r;").unwrap();
        let kappa = LeafCounts::new(&net);
        let fp = |t: &str| {
            fair_proportion(&net, net.node_by_taxon(t).unwrap(), &StoredWeight, Some(&kappa))
        };
        assert!((fp("a") - 1.5).abs() < 1e-12);
        assert!((fp("b") - 1.5).abs() < 1e-12);
        assert!((fp("c") - 1.0).abs() < 1e-12);
        assert!((fp("x") - 0.5).abs() < 1e-12);
        assert_eq!(fp("r"), 0.0);
    }

    #[test]
    fn test_builds_cache_when_absent() {
        let net = parse_enewick("((a:1,b:1)x:1,c:1)r;").unwrap();
        let a = net.node_by_taxon("a").unwrap();
        let kappa = LeafCounts::new(&net);
        assert_eq!(
            fair_proportion(&net, a, &StoredWeight, None),
            fair_proportion(&net, a, &StoredWeight, Some(&kappa))
        );
    }
}
