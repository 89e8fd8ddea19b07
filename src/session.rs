use crate::{
    diversity::{cophenetic_value, rooted_phylogenetic_diversity, unrooted_phylogenetic_diversity},
    error::Result,
    fair_proportion::fair_proportion,
    kappa::LeafCounts,
    network::{NodeId, PhyloNetwork},
    shapley::{cophenetic_shapley_value, unrooted_shapley_value},
    weights::{EdgeWeight, StoredWeight, total_weight},
};
use rayon::prelude::*;

/// Index of a set of nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetIndex {
    CopheneticValue,
    RootedDiversity,
    UnrootedDiversity,
}

/// Index of a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIndex {
    FairProportion,
    CopheneticShapley,
    UnrootedShapley,
}

/// Queries against one network, sharing a single leaf-count cache.
///
/// The cache is built eagerly in [IndexSession::with_weights] and only read
/// afterwards, so batch queries over many nodes cost one cache build in total.
/// A session borrows its network immutably and is tied to it for its lifetime.
#[derive(Debug)]
pub struct IndexSession<'a, W = StoredWeight> {
    network: &'a PhyloNetwork,
    weights: W,
    kappa: LeafCounts,
}

impl<'a> IndexSession<'a, StoredWeight> {
    /// Session reading the weights stored on the edges
    pub fn new(network: &'a PhyloNetwork) -> Self {
        Self::with_weights(network, StoredWeight)
    }
}

impl<'a, W: EdgeWeight> IndexSession<'a, W> {
    pub fn with_weights(network: &'a PhyloNetwork, weights: W) -> Self {
        Self {
            network,
            weights,
            kappa: LeafCounts::new(network),
        }
    }

    pub fn network(&self) -> &'a PhyloNetwork {
        self.network
    }

    pub fn kappa(&self) -> &LeafCounts {
        &self.kappa
    }

    pub fn weights(&self) -> &W {
        &self.weights
    }

    /// W, the sum of every edge weight
    pub fn total_weight(&self) -> f64 {
        total_weight(self.network, &self.weights)
    }

    pub fn cophenetic_value(&self, targets: &[NodeId]) -> f64 {
        cophenetic_value(self.network, targets, &self.weights)
    }

    pub fn rooted_phylogenetic_diversity(&self, targets: &[NodeId]) -> f64 {
        rooted_phylogenetic_diversity(self.network, targets, &self.weights)
    }

    pub fn unrooted_phylogenetic_diversity(&self, targets: &[NodeId]) -> f64 {
        unrooted_phylogenetic_diversity(self.network, targets, &self.weights)
    }

    pub fn fair_proportion(&self, node: NodeId) -> f64 {
        fair_proportion(self.network, node, &self.weights, Some(&self.kappa))
    }

    pub fn cophenetic_shapley_value(&self, node: NodeId) -> Result<f64> {
        cophenetic_shapley_value(self.network, node, &self.weights, Some(&self.kappa))
    }

    pub fn unrooted_shapley_value(&self, node: NodeId) -> Result<f64> {
        unrooted_shapley_value(self.network, node, &self.weights, Some(&self.kappa))
    }

    pub fn set_index(&self, index: SetIndex, targets: &[NodeId]) -> f64 {
        match index {
            SetIndex::CopheneticValue => self.cophenetic_value(targets),
            SetIndex::RootedDiversity => self.rooted_phylogenetic_diversity(targets),
            SetIndex::UnrootedDiversity => self.unrooted_phylogenetic_diversity(targets),
        }
    }

    pub fn node_index(&self, index: NodeIndex, node: NodeId) -> Result<f64> {
        match index {
            NodeIndex::FairProportion => Ok(self.fair_proportion(node)),
            NodeIndex::CopheneticShapley => self.cophenetic_shapley_value(node),
            NodeIndex::UnrootedShapley => self.unrooted_shapley_value(node),
        }
    }
}

// Batch queries run in parallel over the read-only cache
impl<W: EdgeWeight + Sync> IndexSession<'_, W> {
    /// Evaluate `index` for every node, in input order
    pub fn node_indices(&self, index: NodeIndex, nodes: &[NodeId]) -> Result<Vec<f64>> {
        nodes
            .par_iter()
            .map(|&node| self.node_index(index, node))
            .collect()
    }

    pub fn fair_proportions(&self, nodes: &[NodeId]) -> Vec<f64> {
        nodes
            .par_iter()
            .map(|&node| self.fair_proportion(node))
            .collect()
    }

    pub fn cophenetic_shapley_values(&self, nodes: &[NodeId]) -> Result<Vec<f64>> {
        self.node_indices(NodeIndex::CopheneticShapley, nodes)
    }

    pub fn unrooted_shapley_values(&self, nodes: &[NodeId]) -> Result<Vec<f64>> {
        self.node_indices(NodeIndex::UnrootedShapley, nodes)
    }
}
