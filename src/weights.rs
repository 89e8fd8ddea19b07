//! Edge weight accessors and the label-keyed weight table.

use crate::network::{Edge, NodeId, PhyloNetwork};
use std::collections::HashMap;

/// Strategy for reading the weight of an edge.
///
/// Every index function takes one of these, so weights can come from the
/// edge's own slot, from a [WeightTable], or from an arbitrary function.
pub trait EdgeWeight {
    fn weight(&self, network: &PhyloNetwork, edge: &Edge) -> f64;
}

/// Reads the weight stored on the edge itself (branch length or an
/// assigned table weight, 0 when neither was given).
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredWeight;

impl EdgeWeight for StoredWeight {
    fn weight(&self, _network: &PhyloNetwork, edge: &Edge) -> f64 {
        edge.weight
    }
}

/// Caller-supplied weight function of `(network, parent, child)`.
#[derive(Debug, Clone, Copy)]
pub struct WeightFn<F>(pub F);

impl<F> EdgeWeight for WeightFn<F>
where
    F: Fn(&PhyloNetwork, NodeId, NodeId) -> f64,
{
    fn weight(&self, network: &PhyloNetwork, edge: &Edge) -> f64 {
        (self.0)(network, edge.parent, edge.child)
    }
}

impl<W: EdgeWeight + ?Sized> EdgeWeight for &W {
    fn weight(&self, network: &PhyloNetwork, edge: &Edge) -> f64 {
        (**self).weight(network, edge)
    }
}

/// Sum of all edge weights, W
pub fn total_weight<W: EdgeWeight>(network: &PhyloNetwork, weights: &W) -> f64 {
    network
        .edges()
        .iter()
        .map(|edge| weights.weight(network, edge))
        .sum()
}

/// Weights keyed by the `(parent label, child label)` pair of an edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    weights: HashMap<(String, String), f64>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight for `source -> target`, replacing any earlier entry
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>, weight: f64) {
        self.weights.insert((source.into(), target.into()), weight);
    }

    pub fn get(&self, source: &str, target: &str) -> Option<f64> {
        self.weights
            .get(&(source.to_string(), target.to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn lookup(&self, network: &PhyloNetwork, edge: &Edge) -> Option<f64> {
        let parent = network.label(edge.parent)?;
        let child = network.label(edge.child)?;
        self.get(parent, child)
    }
}

impl FromIterator<(String, String, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (String, String, f64)>>(iter: I) -> Self {
        let mut table = WeightTable::new();
        for (source, target, weight) in iter {
            table.insert(source, target, weight);
        }
        table
    }
}

/// Table lookup by endpoint labels; an absent pair weighs 0.
impl EdgeWeight for WeightTable {
    fn weight(&self, network: &PhyloNetwork, edge: &Edge) -> f64 {
        self.lookup(network, edge).unwrap_or(0.0)
    }
}

impl PhyloNetwork {
    /// Replace every edge weight with its table weight. Edges whose label
    /// pair is not listed get weight 0, dropping any branch length.
    ///
    /// Returns the number of edges found in the table.
    pub fn assign_weights(&mut self, table: &WeightTable) -> usize {
        let assigned: Vec<Option<f64>> = self
            .edges()
            .iter()
            .map(|edge| table.lookup(self, edge))
            .collect();

        let matched = assigned.iter().flatten().count();
        for (edge, weight) in self.edges_mut().iter_mut().zip(assigned) {
            edge.weight = weight.unwrap_or(0.0);
        }

        tracing::debug!(
            matched,
            unmatched = self.edge_count() - matched,
            table_entries = table.len(),
            "assigned edge weights"
        );
        matched
    }
}

#[cfg(feature = "serde")]
mod csv_support {
    use super::*;
    use crate::error::{IndexError, Result};
    use serde::Deserialize;
    use std::io::Read;
    use std::path::Path;

    #[derive(Debug, Deserialize)]
    struct WeightRecord {
        source: String,
        target: String,
        weight: f64,
    }

    impl WeightTable {
        /// Read a headerless `source,target,weight` table; fields are trimmed
        pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .trim(csv::Trim::All)
                .from_reader(reader);

            let mut table = WeightTable::new();
            for result in reader.deserialize() {
                let record: WeightRecord =
                    result.map_err(|e| IndexError::WeightTable(e.to_string()))?;
                if !record.weight.is_finite() || record.weight < 0.0 {
                    return Err(IndexError::WeightTable(format!(
                        "weight of {} -> {} must be a nonnegative number, got {}",
                        record.source, record.target, record.weight
                    )));
                }
                table.insert(record.source, record.target, record.weight);
            }
            Ok(table)
        }

        /// Read a weight table from a CSV file
        pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
            let file = std::fs::File::open(path)?;
            Self::from_reader(file)
        }
    }
}
