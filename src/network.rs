//! Rooted phylogenetic network stored as an arena.
//!
//! Nodes live in a contiguous vector and are referenced by [NodeId]. Edges
//! are stored once and indexed from both endpoints, so parents and children
//! are available without back-pointers even when a hybrid node has several
//! parents.

use crate::error::{IndexError, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::{Display, Formatter};

/// Index of a node in a [PhyloNetwork] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// Directed edge from `parent` to `child` carrying a nonnegative weight slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub weight: f64,
}

/// An immutable rooted DAG with optionally labeled nodes.
#[derive(Debug, Clone)]
pub struct PhyloNetwork {
    labels: Vec<Option<String>>,
    edges: Vec<Edge>,
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
    root: NodeId,
    topological_order: Vec<NodeId>,
    leaves: Vec<NodeId>,
    taxa: HashMap<String, Vec<NodeId>>,
}

impl PhyloNetwork {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all nodes in arena order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.labels.len()).map(NodeId)
    }

    /// Nodes ordered so that every parent precedes all of its children
    pub fn topological_order(&self) -> &[NodeId] {
        &self.topological_order
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `node`
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.out_edges[node.0].iter().map(|&e| &self.edges[e])
    }

    /// Edges entering `node`
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.in_edges[node.0].iter().map(|&e| &self.edges[e])
    }

    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| e.child)
    }

    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.in_edges(node).map(|e| e.parent)
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.out_edges[node.0].is_empty()
    }

    /// Reticulation: more than one parent
    pub fn is_hybrid(&self, node: NodeId) -> bool {
        self.in_edges[node.0].len() > 1
    }

    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels[node.0].as_deref()
    }

    /// Label of the node, or its arena position when unlabeled
    pub fn display_name(&self, node: NodeId) -> String {
        match self.label(node) {
            Some(label) => label.to_string(),
            None => node.to_string(),
        }
    }

    /// Look up the single node carrying `taxon` as its label
    pub fn node_by_taxon(&self, taxon: &str) -> Result<NodeId> {
        match self.taxa.get(taxon).map(Vec::as_slice) {
            None | Some([]) => Err(IndexError::UnknownTaxon(taxon.to_string())),
            Some([node]) => Ok(*node),
            Some(nodes) => Err(IndexError::AmbiguousTaxon {
                taxon: taxon.to_string(),
                count: nodes.len(),
            }),
        }
    }

    /// Resolve every name, failing on the first unknown one
    pub fn nodes_by_taxa<S: AsRef<str>>(&self, taxa: &[S]) -> Result<Vec<NodeId>> {
        taxa.iter()
            .map(|taxon| self.node_by_taxon(taxon.as_ref()))
            .collect()
    }

    /// Weight slot of the edge `parent -> child`, if that edge exists
    pub fn edge_weight(&self, parent: NodeId, child: NodeId) -> Option<f64> {
        self.out_edges(parent)
            .find(|e| e.child == child)
            .map(|e| e.weight)
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }
}

/// Incremental construction of a [PhyloNetwork].
///
/// Nodes and edges can be added in any order; [NetworkBuilder::build]
/// derives the root and validates that the result is a rooted DAG.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    labels: Vec<Option<String>>,
    edges: Vec<Edge>,
    seen_edges: HashSet<(NodeId, NodeId)>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, label: Option<String>) -> NodeId {
        self.labels.push(label.filter(|l| !l.is_empty()));
        NodeId(self.labels.len() - 1)
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels[node.0].as_deref()
    }

    pub fn set_label(&mut self, node: NodeId, label: String) {
        self.labels[node.0] = Some(label);
    }

    /// Add the edge `parent -> child`; a repeated pair is rejected
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId, weight: f64) -> Result<()> {
        if !self.seen_edges.insert((parent, child)) {
            return Err(IndexError::DuplicateEdge {
                parent: self.name(parent),
                child: self.name(child),
            });
        }
        self.edges.push(Edge {
            parent,
            child,
            weight,
        });
        Ok(())
    }

    fn name(&self, node: NodeId) -> String {
        self.label(node)
            .map(str::to_string)
            .unwrap_or_else(|| node.to_string())
    }

    pub fn build(self) -> Result<PhyloNetwork> {
        let n = self.labels.len();
        let mut out_edges = vec![Vec::new(); n];
        let mut in_edges = vec![Vec::new(); n];
        for (idx, edge) in self.edges.iter().enumerate() {
            out_edges[edge.parent.0].push(idx);
            in_edges[edge.child.0].push(idx);
        }

        // Kahn's algorithm; nodes left over sit on a cycle
        let mut in_degree: Vec<usize> = in_edges.iter().map(Vec::len).collect();
        let roots: Vec<NodeId> = (0..n)
            .filter(|&v| in_degree[v] == 0)
            .map(NodeId)
            .collect();
        let mut queue: VecDeque<NodeId> = roots.iter().copied().collect();
        let mut topological_order = Vec::with_capacity(n);
        while let Some(node) = queue.pop_front() {
            topological_order.push(node);
            for &e in &out_edges[node.0] {
                let child = self.edges[e].child;
                in_degree[child.0] -= 1;
                if in_degree[child.0] == 0 {
                    queue.push_back(child);
                }
            }
        }
        if topological_order.len() < n {
            let stuck = (0..n).find(|&v| in_degree[v] > 0).map(NodeId);
            return Err(IndexError::CyclicNetwork {
                node: stuck.map(|v| self.name(v)).unwrap_or_default(),
            });
        }
        if roots.len() != 1 {
            return Err(IndexError::RootCount { count: roots.len() });
        }

        let leaves: Vec<NodeId> = (0..n)
            .filter(|&v| out_edges[v].is_empty())
            .map(NodeId)
            .collect();

        let mut taxa: HashMap<String, Vec<NodeId>> = HashMap::new();
        for (idx, label) in self.labels.iter().enumerate() {
            if let Some(label) = label {
                taxa.entry(label.clone()).or_default().push(NodeId(idx));
            }
        }

        Ok(PhyloNetwork {
            labels: self.labels,
            edges: self.edges,
            out_edges,
            in_edges,
            root: roots[0],
            topological_order,
            leaves,
            taxa,
        })
    }
}
