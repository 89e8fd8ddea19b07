//! Parser for phylogenetic networks in eNewick notation.
//!
//! eNewick extends Newick with hybrid markers: every occurrence of
//! `label#H1` (or just `#H1`) refers to the same reticulation node, whose
//! children are the union of the children listed at each occurrence.
//!
//! ```
//! use phylo_shapley::enewick::parse_enewick;
//!
//! let network = parse_enewick("((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;").unwrap();
//! let hybrid = network.node_by_taxon("H").unwrap();
//! assert!(network.is_hybrid(hybrid));
//! assert_eq!(network.leaf_count(), 5);
//! ```

use crate::error::{IndexError, Result};
use crate::network::{NetworkBuilder, NodeId, PhyloNetwork};
use std::collections::HashMap;

/// Bytes that end an unquoted label
const LABEL_DELIMITERS: &[u8] = b"(),:;[]#'";

/// Parse a single eNewick network terminated by `;`.
///
/// Branch lengths become the weight slot of the edge into that occurrence;
/// edges without a length get weight 0. Extra `:support:probability`
/// fields are accepted and ignored, as is a length on the root.
pub fn parse_enewick(input: &str) -> Result<PhyloNetwork> {
    let network = ENewickParser::new(input).parse()?;
    tracing::debug!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        leaves = network.leaf_count(),
        "parsed eNewick network"
    );
    Ok(network)
}

struct ENewickParser<'s> {
    input: &'s str,
    pos: usize,
    builder: NetworkBuilder,
    hybrids: HashMap<String, NodeId>,
}

// ============================================================================
// Cursor primitives
// ============================================================================
impl<'s> ENewickParser<'s> {
    fn new(input: &'s str) -> Self {
        Self {
            input,
            pos: 0,
            builder: NetworkBuilder::new(),
            hybrids: HashMap::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn consume_if(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> IndexError {
        IndexError::MalformedNetwork {
            position: self.pos,
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> IndexError {
        let found = self.peek().map(char::from);
        self.error(format!("Expected {expected} but found {found:?}"))
    }

    /// Skips whitespace and `[...]` comments
    fn skip_comment_and_whitespace(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'[') => match self.input[self.pos..].find(']') {
                    Some(offset) => self.pos += offset + 1,
                    None => return Err(self.error("Unclosed comment")),
                },
                _ => return Ok(()),
            }
        }
    }
}

// ============================================================================
// Grammar
// ============================================================================
impl ENewickParser<'_> {
    fn parse(mut self) -> Result<PhyloNetwork> {
        self.skip_comment_and_whitespace()?;
        self.parse_subtree()?;
        self.parse_branch_length()?;

        self.skip_comment_and_whitespace()?;
        if !self.consume_if(b';') {
            return Err(self.unexpected("';' at end of network"));
        }
        self.skip_comment_and_whitespace()?;
        if !self.is_eof() {
            return Err(self.error("Unexpected input after ';'"));
        }

        self.builder.build()
    }

    /// Parses `(child[:len], ...)name` or a bare `name` and returns its node.
    ///
    /// Nesting is tracked on an explicit stack of open parentheses, each
    /// holding the children parsed so far, so depth is bounded by the heap.
    fn parse_subtree(&mut self) -> Result<NodeId> {
        let mut open: Vec<Vec<(NodeId, f64)>> = Vec::new();

        loop {
            self.skip_comment_and_whitespace()?;
            while self.consume_if(b'(') {
                open.push(Vec::new());
                self.skip_comment_and_whitespace()?;
            }
            let mut node = self.parse_name()?;

            // Attach `node` to the innermost group and close groups until
            // another sibling follows
            loop {
                let Some(mut children) = open.pop() else {
                    return Ok(node);
                };
                let length = self.parse_branch_length()?;
                children.push((node, length.unwrap_or(0.0)));

                self.skip_comment_and_whitespace()?;
                if self.consume_if(b',') {
                    open.push(children);
                    break;
                }
                if !self.consume_if(b')') {
                    return Err(self.unexpected("',' or ')' between children"));
                }

                node = self.parse_name()?;
                for (child, weight) in children {
                    self.builder.add_edge(node, child, weight)?;
                }
            }
        }
    }

    /// Parses `[label]['#'[kind]number]`, reusing the node of an
    /// already seen hybrid key
    fn parse_name(&mut self) -> Result<NodeId> {
        self.skip_comment_and_whitespace()?;
        let label = self.parse_label()?;

        if !self.consume_if(b'#') {
            return Ok(self.builder.add_node(Some(label)));
        }

        let key = self.parse_hybrid_key()?;
        match self.hybrids.get(&key) {
            Some(&node) => {
                if !label.is_empty() {
                    match self.builder.label(node).map(str::to_string) {
                        None => self.builder.set_label(node, label),
                        Some(existing) if existing == label => {}
                        Some(existing) => {
                            return Err(IndexError::ConflictingHybridLabel {
                                hybrid: key,
                                first: existing,
                                second: label,
                            });
                        }
                    }
                }
                Ok(node)
            }
            None => {
                let node = self.builder.add_node(Some(label));
                self.hybrids.insert(key, node);
                Ok(node)
            }
        }
    }

    /// Quoted (`'it''s'`) or unquoted label; may be empty
    fn parse_label(&mut self) -> Result<String> {
        if self.consume_if(b'\'') {
            let mut label = String::new();
            loop {
                let Some(offset) = self.input[self.pos..].find('\'') else {
                    return Err(self.error("Unclosed quoted label"));
                };
                label.push_str(&self.input[self.pos..self.pos + offset]);
                self.pos += offset + 1;
                if self.consume_if(b'\'') {
                    label.push('\'');
                } else {
                    return Ok(label);
                }
            }
        }

        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || LABEL_DELIMITERS.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// `[kind]number` following a `#`, e.g. `H1` or `LGT3`
    fn parse_hybrid_key(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if digits_start == self.pos {
            return Err(self.unexpected("hybrid number after '#'"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// Parses optional `:length[:support[:probability]]`; only the length is kept
    fn parse_branch_length(&mut self) -> Result<Option<f64>> {
        self.skip_comment_and_whitespace()?;
        if !self.consume_if(b':') {
            return Ok(None);
        }
        let length = self.parse_number()?;
        if let Some(length) = length {
            if length < 0.0 {
                return Err(self.error(format!("Negative branch length {length}")));
            }
        }

        // eNewick bootstrap support and inheritance probability
        self.skip_comment_and_whitespace()?;
        while self.consume_if(b':') {
            self.parse_number()?;
            self.skip_comment_and_whitespace()?;
        }
        Ok(length)
    }

    fn parse_number(&mut self) -> Result<Option<f64>> {
        self.skip_comment_and_whitespace()?;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.input[start..self.pos];
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<f64>().map(Some).map_err(|_| IndexError::MalformedNetwork {
            position: start,
            message: format!("Invalid number {text:?}"),
        })
    }
}
