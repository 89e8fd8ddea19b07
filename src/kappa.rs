//! Leaf-count cache κ.
//!
//! κ(u) is the number of distinct leaves among `u` and its descendants.
//! Counting leaves by summing over children would double count leaves below
//! a hybrid, so each node instead carries a leaf bitset that is the union of
//! its children's sets, filled bottom-up in reverse topological order.
//! A set is counted as soon as it is complete and dropped once its last
//! parent has merged it, so only sets on the current frontier stay alive.

use crate::network::{NodeId, PhyloNetwork};

/// κ value of every node of one network, computed once at construction.
#[derive(Debug, Clone)]
pub struct LeafCounts {
    counts: Vec<usize>,
    num_leaves: usize,
}

impl LeafCounts {
    pub fn new(network: &PhyloNetwork) -> Self {
        let (counts, peak_sets) = count_leaves(network);
        tracing::debug!(
            nodes = network.node_count(),
            leaves = network.leaf_count(),
            peak_sets,
            "built leaf-count cache"
        );
        Self {
            counts,
            num_leaves: network.leaf_count(),
        }
    }

    /// κ(node); 1 for a leaf
    pub fn get(&self, node: NodeId) -> usize {
        self.counts[node.index()]
    }

    /// Total number of leaves in the network
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }
}

/// κ of every node, plus the largest number of leaf sets alive at once
fn count_leaves(network: &PhyloNetwork) -> (Vec<usize>, usize) {
    let words = network.leaf_count().div_ceil(64).max(1);
    let mut rank = vec![0; network.node_count()];
    for (i, leaf) in network.leaves().iter().enumerate() {
        rank[leaf.index()] = i;
    }

    let mut pending_parents: Vec<usize> = network
        .nodes()
        .map(|node| network.predecessors(node).count())
        .collect();
    let mut leaf_sets: Vec<Vec<u64>> = vec![Vec::new(); network.node_count()];
    let mut counts = vec![0; network.node_count()];
    let (mut live, mut peak) = (0usize, 0usize);

    for &node in network.topological_order().iter().rev() {
        if network.is_leaf(node) {
            counts[node.index()] = 1;
            continue;
        }

        let mut set = vec![0u64; words];
        for child in network.successors(node) {
            if network.is_leaf(child) {
                let r = rank[child.index()];
                set[r / 64] |= 1 << (r % 64);
                continue;
            }
            for (word, child_word) in set.iter_mut().zip(&leaf_sets[child.index()]) {
                *word |= child_word;
            }
            pending_parents[child.index()] -= 1;
            if pending_parents[child.index()] == 0 {
                leaf_sets[child.index()] = Vec::new();
                live -= 1;
            }
        }

        counts[node.index()] = set.iter().map(|w| w.count_ones() as usize).sum();
        if pending_parents[node.index()] > 0 {
            leaf_sets[node.index()] = set;
            live += 1;
            peak = peak.max(live);
        }
    }

    (counts, peak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::descendants;
    use crate::enewick::parse_enewick;

    #[test]
    fn test_example_counts() {
        let net = parse_enewick("((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;").unwrap();
        let kappa = LeafCounts::new(&net);
        let k = |taxon: &str| kappa.get(net.node_by_taxon(taxon).unwrap());

        assert_eq!(k("r"), 5);
        assert_eq!(k("a"), 3);
        assert_eq!(k("b"), 3);
        assert_eq!(k("c"), 2);
        assert_eq!(k("d"), 2);
        assert_eq!(k("H"), 1);
        for leaf in ["1", "2", "3", "4", "5"] {
            assert_eq!(k(leaf), 1);
        }
        assert_eq!(kappa.num_leaves(), 5);
    }

    #[test]
    fn test_matches_closure_count_beyond_one_word() {
        // 70 leaves hanging off two hybrid-linked subtrees
        let left: Vec<String> = (0..35).map(|i| format!("l{i}")).collect();
        let right: Vec<String> = (0..35).map(|i| format!("r{i}")).collect();
        let input = format!(
            "(({},#H1)x,(({})H#H1)y)root;",
            left.join(","),
            right.join(",")
        );
        let net = parse_enewick(&input).unwrap();
        let kappa = LeafCounts::new(&net);

        assert_eq!(kappa.get(net.root()), 70);
        for node in net.nodes() {
            let expected = descendants(&net, node).filter(|&v| net.is_leaf(v)).count();
            assert_eq!(kappa.get(node), expected);
        }
    }

    #[test]
    fn test_completed_sets_are_released() {
        // Caterpillar (l0,(l1,(l2,...))) with a hybrid reaching back down
        let leaves = 2_000;
        let mut newick = format!("l{}", leaves - 1);
        for i in (0..leaves - 1).rev() {
            newick = if i == 10 {
                format!("(l{i},#H1,{newick})")
            } else if i == leaves - 20 {
                format!("(l{i},{newick}H#H1)")
            } else {
                format!("(l{i},{newick})")
            };
        }
        let net = parse_enewick(&format!("{newick}root;")).unwrap();

        let (counts, peak_sets) = count_leaves(&net);
        assert_eq!(counts[net.root().index()], leaves);
        assert_eq!(counts[net.node_by_taxon("H").unwrap().index()], 19);
        assert!(peak_sets <= 3, "{peak_sets} leaf sets alive at once");
    }
}
