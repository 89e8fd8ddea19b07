use thiserror::Error;

/// Error types for network construction and index computation
#[derive(Debug, Error)]
pub enum IndexError {
    /// eNewick string could not be parsed
    #[error("Malformed eNewick string at byte {position}: {message}")]
    MalformedNetwork { position: usize, message: String },

    /// Two occurrences of the same hybrid node disagree on its label
    #[error("Hybrid node #{hybrid} is labeled both {first:?} and {second:?}")]
    ConflictingHybridLabel {
        hybrid: String,
        first: String,
        second: String,
    },

    /// The same parent/child pair was listed twice
    #[error("Edge {parent} -> {child} appears more than once")]
    DuplicateEdge { parent: String, child: String },

    /// Network does not have exactly one node without parents
    #[error("Network must have exactly one root, found {count}")]
    RootCount { count: usize },

    /// Hybrid references close a directed cycle
    #[error("Network is not acyclic; {node} is its own ancestor")]
    CyclicNetwork { node: String },

    /// Requested taxon has no node
    #[error("Unknown taxon: {0}")]
    UnknownTaxon(String),

    /// Requested taxon labels several nodes
    #[error("Taxon {taxon} labels {count} nodes; lookup is ambiguous")]
    AmbiguousTaxon { taxon: String, count: usize },

    /// An edge outside the ancestry of the query node spans every leaf
    #[error(
        "Cophenetic Shapley value of {node} is undefined: an edge outside its ancestry covers every leaf"
    )]
    NoComplementLeaves { node: String },

    /// Malformed weight table record, or a negative or non-finite weight
    #[error("Weight table error: {0}")]
    WeightTable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for network index operations
pub type Result<T> = std::result::Result<T, IndexError>;
