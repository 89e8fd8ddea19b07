//! Lazy enumeration of the nodes reachable from a start node.

use crate::network::{NodeId, PhyloNetwork};

/// Which adjacency a [Closure] walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges parent to child
    Descendants,
    /// Follow edges child to parent
    Ancestors,
}

/// Depth-first walk yielding the start node followed by every node
/// reachable from it in the chosen direction, each exactly once.
///
/// A node is marked when first discovered, so alternative paths through
/// hybrid nodes never yield it a second time. The iterator is single-pass;
/// create a new one to walk again.
#[derive(Debug)]
pub struct Closure<'a> {
    network: &'a PhyloNetwork,
    direction: Direction,
    stack: Vec<NodeId>,
    discovered: Vec<bool>,
}

impl<'a> Closure<'a> {
    pub fn new(network: &'a PhyloNetwork, start: NodeId, direction: Direction) -> Self {
        let mut discovered = vec![false; network.node_count()];
        discovered[start.index()] = true;
        Self {
            network,
            direction,
            stack: vec![start],
            discovered,
        }
    }
}

impl Iterator for Closure<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        let Self {
            network,
            direction,
            stack,
            discovered,
        } = self;
        let mut discover = |next: NodeId| {
            if !discovered[next.index()] {
                discovered[next.index()] = true;
                stack.push(next);
            }
        };
        match direction {
            Direction::Descendants => network.successors(node).for_each(&mut discover),
            Direction::Ancestors => network.predecessors(node).for_each(&mut discover),
        }
        Some(node)
    }
}

/// `node` and all nodes below it
pub fn descendants(network: &PhyloNetwork, node: NodeId) -> Closure<'_> {
    Closure::new(network, node, Direction::Descendants)
}

/// `node` and all nodes with a directed path to it
pub fn ancestors(network: &PhyloNetwork, node: NodeId) -> Closure<'_> {
    Closure::new(network, node, Direction::Ancestors)
}
