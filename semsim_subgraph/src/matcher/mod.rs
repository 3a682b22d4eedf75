//! Exact subgraph matching of one fragment against one sentence.
//!
//! Matching runs in three stages. The sentence locations are bucketed by the
//! fragment's labels and every way of choosing one location per fragment node
//! is enumerated. Selections with an isolated location are dropped. The
//! survivors go to a backtracking search that must pair every fragment edge
//! with exactly one selected sentence edge.

mod assignment;
mod bucket;
mod connectivity;
mod isomorphism;

pub use assignment::Assignment;

use semsim_common::{Complexity, Config, Edge, FragmentError, Graph};
use tracing::{debug, trace};

use bucket::BucketGroup;
use connectivity::connected_edges;
use isomorphism::{ExactMatch, SearchBudget};

/// One matched selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Embedding {
    /// Indices of the matched sentence edges, ascending.
    pub edge_indices: Vec<usize>,
    /// The matched sentence edges, in sentence edge order.
    pub edges: Vec<Edge>,
    /// Fragment location to sentence location.
    pub mapping: Assignment,
}

/// Counters describing how much work a match did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Selections enumerated.
    pub selections: usize,
    /// Selections that passed the connectivity gate.
    pub connected: usize,
    /// Selections the exact search accepted.
    pub matched: usize,
    /// Backtracking steps spent by the exact search.
    pub search_steps: usize,
}

/// All embeddings of a fragment in a sentence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Matched selections, in selection order.
    pub embeddings: Vec<Embedding>,
    /// Work counters.
    pub stats: MatchStats,
}

impl MatchOutcome {
    /// Returns true if at least one selection matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        !self.embeddings.is_empty()
    }
}

/// Matches a fragment graph against a sentence graph.
pub struct SubgraphMatcher<'f, 's, 'cfg> {
    /// The query fragment.
    fragment: &'f Graph,
    /// The candidate sentence.
    sentence: &'s Graph,
    /// Size limits.
    config: &'cfg Config,
}

impl<'f, 's, 'cfg> SubgraphMatcher<'f, 's, 'cfg> {
    /// Creates a matcher for one pair.
    #[must_use]
    pub const fn new(fragment: &'f Graph, sentence: &'s Graph, config: &'cfg Config) -> Self {
        Self {
            fragment,
            sentence,
            config,
        }
    }

    /// Convenience for `SubgraphMatcher::new(..).search()`.
    ///
    /// # Errors
    ///
    /// See [`SubgraphMatcher::search`].
    pub fn search_all(
        fragment: &'f Graph,
        sentence: &'s Graph,
        config: &'cfg Config,
    ) -> Result<MatchOutcome, FragmentError> {
        Self::new(fragment, sentence, config).search()
    }

    /// Finds every selection of sentence locations whose induced edges match
    /// the fragment exactly.
    ///
    /// A fragment with no nodes never matches. "No match" is an empty
    /// outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::TooComplex`] if the fragment or sentence
    /// exceeds a size limit of the [`Config`], if the pair would produce
    /// more than [`Config::max_selections`] selections, or if the exact
    /// search takes more than [`Config::max_search_steps`] steps.
    pub fn search(&self) -> Result<MatchOutcome, FragmentError> {
        self.check_limits()?;

        let mut outcome = MatchOutcome::default();
        if self.fragment.is_empty() {
            return Ok(outcome);
        }

        let Some(group) = BucketGroup::build(self.fragment, self.sentence) else {
            trace!("sentence lacks a fragment label occurrence");
            return Ok(outcome);
        };
        for bucket in group.buckets() {
            trace!(
                "bucket {:?}: choose {} of {}",
                bucket.label,
                bucket.count,
                bucket.locations.len()
            );
        }
        Complexity::Selections.check(group.selection_count(), self.config.max_selections)?;

        let exact = ExactMatch::new(self.fragment, self.sentence);
        let mut budget = SearchBudget::new(self.config.max_search_steps);
        for selection in group.selections() {
            outcome.stats.selections += 1;

            let Some(induced) = connected_edges(self.sentence, &selection) else {
                continue;
            };
            outcome.stats.connected += 1;

            let found = exact.find(&induced, &mut budget);
            outcome.stats.search_steps = budget.spent();
            let Some(mapping) = found? else {
                continue;
            };
            outcome.stats.matched += 1;

            let edges = induced
                .iter()
                .filter_map(|&i| self.sentence.edges().get(i))
                .cloned()
                .collect();
            outcome.embeddings.push(Embedding {
                edge_indices: induced,
                edges,
                mapping,
            });
        }

        debug!(
            "{} selections, {} connected, {} matched in {} steps",
            outcome.stats.selections,
            outcome.stats.connected,
            outcome.stats.matched,
            outcome.stats.search_steps
        );
        Ok(outcome)
    }

    /// Applies the fragment and sentence size guards.
    fn check_limits(&self) -> Result<(), FragmentError> {
        check_fragment_limits(self.fragment, self.config)?;
        Complexity::SentenceEdges.check(self.sentence.edge_count(), self.config.max_sentence_edges)
    }
}

/// Applies the size guards that depend on the fragment alone.
///
/// # Errors
///
/// Returns [`FragmentError::TooComplex`] if the fragment has more nodes or
/// edges than the [`Config`] allows.
pub fn check_fragment_limits(fragment: &Graph, config: &Config) -> Result<(), FragmentError> {
    Complexity::FragmentNodes.check(fragment.node_count(), config.max_fragment_nodes)?;
    Complexity::FragmentEdges.check(fragment.edge_count(), config.max_fragment_edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use semsim_common::Location;

    fn loc(raw: u32) -> Location {
        Location::new(raw)
    }

    /// bark -ncsubj-> dog
    fn dog_barks_fragment() -> Graph {
        let mut b = Graph::builder();
        let bark = b.add_node("bark", None);
        let dog = b.add_node("dog", None);
        b.add_edge("ncsubj", bark, dog);
        b.build().unwrap()
    }

    /// the0 dog1 bark2, det(dog1 -> the0), ncsubj(bark2 -> dog1)
    fn the_dog_barks() -> Graph {
        let mut b = Graph::builder();
        let the = b.add_node("the", None);
        let dog = b.add_node("dog", None);
        let bark = b.add_node("bark", None);
        b.add_edge("det", dog, the);
        b.add_edge("ncsubj", bark, dog);
        b.build().unwrap()
    }

    #[test]
    fn finds_the_embedded_edge() {
        let fragment = dog_barks_fragment();
        let sentence = the_dog_barks();
        let cfg = Config::default();
        let outcome = SubgraphMatcher::search_all(&fragment, &sentence, &cfg).unwrap();

        assert!(outcome.is_match());
        assert_eq!(outcome.embeddings.len(), 1);
        let embedding = &outcome.embeddings[0];
        assert_eq!(embedding.edge_indices, vec![1]);
        assert_eq!(embedding.edges, vec![Edge::new("ncsubj", loc(2), loc(1))]);
        assert_eq!(embedding.mapping.get(loc(0)), Some(loc(2)));
        assert_eq!(embedding.mapping.get(loc(1)), Some(loc(1)));
    }

    #[test]
    fn empty_fragment_never_matches() {
        let cfg = Config::default();
        let outcome = SubgraphMatcher::search_all(&Graph::default(), &the_dog_barks(), &cfg).unwrap();
        assert!(!outcome.is_match());
        assert_eq!(outcome.stats, MatchStats::default());
    }

    #[test]
    fn single_node_fragment_fails_the_gate() {
        let mut b = Graph::builder();
        b.add_node("dog", None);
        let fragment = b.build().unwrap();
        let cfg = Config::default();
        let outcome = SubgraphMatcher::search_all(&fragment, &the_dog_barks(), &cfg).unwrap();

        assert!(!outcome.is_match());
        assert_eq!(outcome.stats.selections, 1);
        assert_eq!(outcome.stats.connected, 0);
    }

    #[test]
    fn extra_induced_edge_blocks_the_match() {
        // the fragment lacks det, and selecting {the, dog, bark} induces it
        let mut b = Graph::builder();
        let the = b.add_node("the", None);
        let dog = b.add_node("dog", None);
        let bark = b.add_node("bark", None);
        b.add_edge("ncsubj", bark, dog);
        b.add_edge("ncmod", bark, the);
        let fragment = b.build().unwrap();

        let cfg = Config::default();
        let outcome = SubgraphMatcher::search_all(&fragment, &the_dog_barks(), &cfg).unwrap();
        assert!(!outcome.is_match());
        assert_eq!(outcome.stats.connected, 1);
    }

    #[test]
    fn size_limits_are_reported() {
        let fragment = dog_barks_fragment();
        let sentence = the_dog_barks();

        let cfg = Config::builder().max_fragment_edges(0).build();
        assert_eq!(
            SubgraphMatcher::search_all(&fragment, &sentence, &cfg),
            Err(FragmentError::too_complex(Complexity::FragmentEdges, 1, 0))
        );

        let cfg = Config::builder().max_sentence_edges(1).build();
        assert_eq!(
            SubgraphMatcher::search_all(&fragment, &sentence, &cfg),
            Err(FragmentError::too_complex(Complexity::SentenceEdges, 2, 1))
        );

        let cfg = Config::builder().max_selections(0).build();
        assert_eq!(
            SubgraphMatcher::search_all(&fragment, &sentence, &cfg),
            Err(FragmentError::too_complex(Complexity::Selections, 1, 0))
        );
    }

    #[test]
    fn search_budget_is_shared_by_all_selections() {
        // two candidate subjects, each tried once against the single edge
        let fragment = dog_barks_fragment();
        let mut b = Graph::builder();
        let bark = b.add_node("bark", None);
        let dog = b.add_node("dog", None);
        let other = b.add_node("dog", None);
        b.add_edge("ncsubj", bark, dog);
        b.add_edge("ncsubj", bark, other);
        let sentence = b.build().unwrap();

        let cfg = Config::default();
        let outcome = SubgraphMatcher::search_all(&fragment, &sentence, &cfg).unwrap();
        assert_eq!(outcome.stats.matched, 2);
        assert_eq!(outcome.stats.search_steps, 2);

        let cfg = Config::builder().max_search_steps(1).build();
        assert_eq!(
            SubgraphMatcher::search_all(&fragment, &sentence, &cfg),
            Err(FragmentError::too_complex(Complexity::SearchSteps, 2, 1))
        );
    }
}
