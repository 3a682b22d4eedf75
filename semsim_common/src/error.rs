//! Error types for graph construction and fragment queries.
//!
//! None of these abort a batch: the fragment processor records them per
//! fragment (or per fragment/sentence pair) and moves on.

use std::fmt;

use thiserror::Error;

use crate::{Edge, Location};

/// Errors raised while assembling a [`crate::Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge endpoint does not name a node of the graph.
    #[error("edge {relation}({head} -> {dep}) references a location outside the graph ({nodes} nodes)")]
    DanglingEdge {
        /// Relation label of the offending edge.
        relation: String,
        /// Head location of the offending edge.
        head: Location,
        /// Dependent location of the offending edge.
        dep: Location,
        /// Number of nodes in the graph.
        nodes: usize,
    },
}

impl GraphError {
    /// Create a dangling edge error.
    pub fn dangling_edge(edge: &Edge, nodes: usize) -> Self {
        Self::DanglingEdge {
            relation: edge.relation().to_owned(),
            head: edge.head(),
            dep: edge.dep(),
            nodes,
        }
    }
}

/// Reasons a fragment, or a fragment/sentence pair, cannot be evaluated.
///
/// Neither variant is fatal. "No match" is not an error at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// The graph uses a label that never occurred in the corpus, so it cannot
    /// be contained in any sentence.
    #[error("label '{label}' does not occur in the corpus vocabulary")]
    UnknownVocabulary {
        /// The unknown label.
        label: String,
    },

    /// A configured size guard was exceeded.
    #[error("{what} of {size} exceeds the configured limit of {limit}")]
    TooComplex {
        /// Which quantity was too large.
        what: Complexity,
        /// The observed size.
        size: usize,
        /// The configured limit.
        limit: usize,
    },
}

impl FragmentError {
    /// Create an unknown vocabulary error.
    pub fn unknown_vocabulary(label: impl Into<String>) -> Self {
        Self::UnknownVocabulary {
            label: label.into(),
        }
    }

    /// Create a too complex error.
    pub const fn too_complex(what: Complexity, size: usize, limit: usize) -> Self {
        Self::TooComplex { what, size, limit }
    }
}

/// The quantity a size guard applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Complexity {
    /// Edges handed to the complete edge set enumerator.
    EnumerationEdges,
    /// Edges of a candidate sentence.
    SentenceEdges,
    /// Nodes of a query fragment.
    FragmentNodes,
    /// Edges of a query fragment.
    FragmentEdges,
    /// Candidate node selections for one fragment/sentence pair.
    Selections,
    /// Backtracking steps spent on one fragment/sentence pair.
    SearchSteps,
}

impl Complexity {
    /// Fails with [`FragmentError::TooComplex`] when `size` exceeds `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::TooComplex`] if `size > limit`.
    pub const fn check(self, size: usize, limit: usize) -> Result<(), FragmentError> {
        if size > limit {
            return Err(FragmentError::too_complex(self, size, limit));
        }
        Ok(())
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnumerationEdges => "enumeration edge count",
            Self::SentenceEdges => "sentence edge count",
            Self::FragmentNodes => "fragment node count",
            Self::FragmentEdges => "fragment edge count",
            Self::Selections => "candidate selection count",
            Self::SearchSteps => "search step count",
        };
        f.write_str(name)
    }
}
