//! Boundary-feature counts for the offline feature-statistics path.
//!
//! Every complete edge subset of a sentence is a fragment occurring in the
//! corpus. Its boundary edges (one endpoint inside, one outside) describe the
//! context the fragment occurs in; each is summarised as a
//! [`BoundaryFeature`] and counted corpus-wide. Weighting the counts is left
//! to the caller.

use std::collections::BTreeMap;

use semsim_common::{Config, Corpus, FragmentError, Graph, SentenceId};
use tracing::{info, warn};

use crate::enumerate::{EdgeSplit, enumerate_complete};

/// Relation and dependent label of a boundary edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundaryFeature {
    /// Relation label of the edge.
    pub relation: String,
    /// Label of the edge's dependent node.
    pub dep_label: String,
}

/// Boundary features of one complete edge subset of `graph`.
#[must_use]
pub fn boundary_features(graph: &Graph, subset: &[usize]) -> Vec<BoundaryFeature> {
    let edges = graph.edges();
    EdgeSplit::classify(edges, subset)
        .boundary
        .into_iter()
        .filter_map(|i| {
            let edge = edges.get(i)?;
            Some(BoundaryFeature {
                relation: edge.relation().to_owned(),
                dep_label: graph.label_at(edge.dep())?.to_owned(),
            })
        })
        .collect()
}

/// Corpus-wide boundary-feature occurrence counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureCounter {
    /// Feature to number of (fragment, boundary edge) occurrences.
    counts: BTreeMap<BoundaryFeature, usize>,
    /// Sentences the enumerator refused.
    skipped: Vec<(SentenceId, FragmentError)>,
}

impl FeatureCounter {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the boundary features of every complete subset of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::TooComplex`] if the graph has more edges than
    /// [`Config::max_enumeration_edges`]; nothing is counted in that case.
    pub fn count_graph(&mut self, graph: &Graph, config: &Config) -> Result<(), FragmentError> {
        let enumeration = enumerate_complete(graph.edges(), config)?;
        for subset in enumeration.complete() {
            for feature in boundary_features(graph, subset) {
                *self.counts.entry(feature).or_insert(0) += 1;
            }
        }
        Ok(())
    }

    /// Counts features over the designated parse of every corpus sentence.
    ///
    /// Sentences the enumerator refuses are recorded in
    /// [`FeatureCounter::skipped`] and do not stop the pass.
    #[must_use]
    pub fn count_corpus(corpus: &Corpus, config: &Config) -> Self {
        let mut counter = Self::new();
        for (sentence_id, graph) in corpus.ranked(config.parse_rank) {
            if let Err(err) = counter.count_graph(graph, config) {
                warn!("skipping features of sentence {}: {}", sentence_id, err);
                counter.skipped.push((sentence_id, err));
            }
        }
        info!(
            "counted {} distinct boundary features, {} sentences skipped",
            counter.counts.len(),
            counter.skipped.len()
        );
        counter
    }

    /// Occurrences of `feature`.
    #[must_use]
    pub fn get(&self, feature: &BoundaryFeature) -> usize {
        self.counts.get(feature).copied().unwrap_or(0)
    }

    /// Iterates `(feature, count)` in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (&BoundaryFeature, usize)> {
        self.counts.iter().map(|(feature, &count)| (feature, count))
    }

    /// Number of distinct features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sentences skipped by [`FeatureCounter::count_corpus`].
    #[must_use]
    pub fn skipped(&self) -> &[(SentenceId, FragmentError)] {
        &self.skipped
    }
}
