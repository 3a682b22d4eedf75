//! Batch driver: prefilter, then match every candidate sentence.

use std::collections::BTreeMap;

use semsim_common::{Config, Corpus, Edge, FragmentError, FragmentId, Graph, SentenceId};
use tracing::{debug, info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::candidates::CandidateFilter;
use crate::matcher::{MatchOutcome, SubgraphMatcher, check_fragment_limits};
use crate::model::CorpusModel;

/// One matched selection of a fragment in a sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentMatch {
    /// The sentence containing the fragment.
    pub sentence_id: SentenceId,
    /// The matched sentence edges, in sentence edge order.
    pub edges: Vec<Edge>,
}

/// A fragment, or a fragment/sentence pair, that could not be evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    /// The fragment.
    pub fragment_id: FragmentId,
    /// The sentence, or `None` if the whole fragment was skipped.
    pub sentence_id: Option<SentenceId>,
    /// Why it was skipped.
    pub reason: FragmentError,
}

/// Result of a batch query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Matches per fragment, ascending sentence id within each fragment.
    ///
    /// Every fragment that was not skipped as a whole has an entry, possibly
    /// empty.
    pub matches: BTreeMap<FragmentId, Vec<FragmentMatch>>,
    /// Skipped fragments and pairs, in processing order.
    pub skipped: Vec<Skipped>,
}

impl MatchReport {
    /// Ids of the sentences containing `fragment_id`, ascending and
    /// deduplicated.
    #[must_use]
    pub fn sentences_for(&self, fragment_id: FragmentId) -> Vec<SentenceId> {
        let mut sentences: Vec<SentenceId> = self
            .matches
            .get(&fragment_id)
            .into_iter()
            .flatten()
            .map(|m| m.sentence_id)
            .collect();
        sentences.dedup();
        sentences
    }
}

/// Answers fragment queries against a corpus and its statistics.
#[derive(Clone, Copy, Debug)]
pub struct FragmentProcessor<'a> {
    /// Sentence graphs.
    corpus: &'a Corpus,
    /// Statistics built from `corpus`.
    model: &'a CorpusModel,
    /// Parse rank and size limits.
    config: &'a Config,
}

impl<'a> FragmentProcessor<'a> {
    /// Creates a processor. `model` must have been built from `corpus` with
    /// the same parse rank.
    #[must_use]
    pub const fn new(corpus: &'a Corpus, model: &'a CorpusModel, config: &'a Config) -> Self {
        Self {
            corpus,
            model,
            config,
        }
    }

    /// Candidate sentences for `fragment`, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::UnknownVocabulary`] if the fragment uses a
    /// label unknown to the corpus.
    pub fn probable_matches(&self, fragment: &Graph) -> Result<Vec<SentenceId>, FragmentError> {
        CandidateFilter::new(self.model).probable_matches(fragment)
    }

    /// Matches `fragment` against the designated parse of one sentence.
    ///
    /// A sentence without a parse at the configured rank yields an empty
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::TooComplex`] if a size limit is exceeded.
    pub fn match_pair(
        &self,
        fragment: &Graph,
        sentence_id: SentenceId,
    ) -> Result<MatchOutcome, FragmentError> {
        let Some(sentence) = self.corpus.parse(sentence_id, self.config.parse_rank) else {
            warn!(
                "sentence {} has no parse at rank {}",
                sentence_id, self.config.parse_rank
            );
            return Ok(MatchOutcome::default());
        };
        SubgraphMatcher::search_all(fragment, sentence, self.config)
    }

    /// Runs every fragment through the prefilter and matcher.
    ///
    /// Failures are recorded in [`MatchReport::skipped`] and never stop the
    /// batch. A fragment over its own size limits, or with unknown
    /// vocabulary, is skipped once as a whole.
    #[must_use]
    pub fn find_fragment_matches(&self, fragments: &BTreeMap<FragmentId, Graph>) -> MatchReport {
        info!("matching {} fragments", fragments.len());

        let mut report = MatchReport::default();
        for (&fragment_id, fragment) in fragments {
            let candidates = match check_fragment_limits(fragment, self.config)
                .and_then(|()| self.probable_matches(fragment))
            {
                Ok(candidates) => candidates,
                Err(reason) => {
                    warn!("skipping fragment {}: {}", fragment_id, reason);
                    report.skipped.push(Skipped {
                        fragment_id,
                        sentence_id: None,
                        reason,
                    });
                    continue;
                }
            };
            debug!(
                "fragment {}: {} candidate sentences",
                fragment_id,
                candidates.len()
            );

            #[cfg(feature = "rayon")]
            let candidate_iter = candidates.par_iter();

            #[cfg(not(feature = "rayon"))]
            let candidate_iter = candidates.iter();

            let outcomes: Vec<(SentenceId, Result<MatchOutcome, FragmentError>)> = candidate_iter
                .map(|&sentence_id| (sentence_id, self.match_pair(fragment, sentence_id)))
                .collect();

            let mut found = Vec::new();
            for (sentence_id, outcome) in outcomes {
                match outcome {
                    Ok(outcome) => found.extend(outcome.embeddings.into_iter().map(|e| {
                        FragmentMatch {
                            sentence_id,
                            edges: e.edges,
                        }
                    })),
                    Err(reason) => {
                        warn!(
                            "skipping fragment {} against sentence {}: {}",
                            fragment_id, sentence_id, reason
                        );
                        report.skipped.push(Skipped {
                            fragment_id,
                            sentence_id: Some(sentence_id),
                            reason,
                        });
                    }
                }
            }
            debug!("fragment {}: {} matches", fragment_id, found.len());
            report.matches.insert(fragment_id, found);
        }

        info!(
            "matched {} fragments, {} skipped entries",
            report.matches.len(),
            report.skipped.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semsim_common::{Complexity, Location};

    fn sid(raw: u32) -> SentenceId {
        SentenceId::new(raw)
    }

    /// `bark -ncsubj-> dog`, with `the` attached to dog if `det` is set.
    fn dog_barks(det: bool) -> Graph {
        let mut b = Graph::builder();
        let dog = b.add_node("dog", None);
        let bark = b.add_node("bark", None);
        b.add_edge("ncsubj", bark, dog);
        if det {
            let the = b.add_node("the", None);
            b.add_edge("det", dog, the);
        }
        b.build().unwrap()
    }

    fn fixture() -> (Corpus, CorpusModel, Config) {
        let corpus: Corpus = [(sid(1), dog_barks(true)), (sid(2), dog_barks(false))]
            .into_iter()
            .collect();
        let config = Config::default();
        let model = CorpusModel::build(&corpus, &config);
        (corpus, model, config)
    }

    #[test]
    fn batch_collects_matches_per_fragment() {
        let (corpus, model, config) = fixture();
        let processor = FragmentProcessor::new(&corpus, &model, &config);
        let fragments: BTreeMap<FragmentId, Graph> =
            [(FragmentId::new(10), dog_barks(false))].into_iter().collect();

        let report = processor.find_fragment_matches(&fragments);
        assert!(report.skipped.is_empty());
        assert_eq!(
            report.sentences_for(FragmentId::new(10)),
            vec![sid(1), sid(2)]
        );
        let first = &report.matches[&FragmentId::new(10)][0];
        assert_eq!(
            first.edges,
            vec![Edge::new("ncsubj", Location::new(1), Location::new(0))]
        );
    }

    #[test]
    fn unknown_vocabulary_skips_the_fragment() {
        let (corpus, model, config) = fixture();
        let processor = FragmentProcessor::new(&corpus, &model, &config);
        let mut b = Graph::builder();
        b.add_node("unicorn", None);
        let fragments: BTreeMap<FragmentId, Graph> =
            [(FragmentId::new(1), b.build().unwrap())].into_iter().collect();

        let report = processor.find_fragment_matches(&fragments);
        assert!(report.matches.is_empty());
        assert_eq!(
            report.skipped,
            vec![Skipped {
                fragment_id: FragmentId::new(1),
                sentence_id: None,
                reason: FragmentError::unknown_vocabulary("unicorn"),
            }]
        );
    }

    #[test]
    fn oversized_pair_is_skipped_but_batch_continues() {
        let (corpus, model, _) = fixture();
        let config = Config::builder().max_sentence_edges(1).build();
        let processor = FragmentProcessor::new(&corpus, &model, &config);
        let fragments: BTreeMap<FragmentId, Graph> =
            [(FragmentId::new(3), dog_barks(false))].into_iter().collect();

        let report = processor.find_fragment_matches(&fragments);
        assert_eq!(report.sentences_for(FragmentId::new(3)), vec![sid(2)]);
        assert_eq!(
            report.skipped,
            vec![Skipped {
                fragment_id: FragmentId::new(3),
                sentence_id: Some(sid(1)),
                reason: FragmentError::too_complex(Complexity::SentenceEdges, 2, 1),
            }]
        );
    }

    #[test]
    fn match_pair_without_parse_is_empty() {
        let (corpus, model, _) = fixture();
        let config = Config::builder().parse_rank(1).build();
        let processor = FragmentProcessor::new(&corpus, &model, &config);
        let outcome = processor.match_pair(&dog_barks(false), sid(1)).unwrap();
        assert!(!outcome.is_match());
    }

    #[test]
    fn oversized_fragment_is_skipped_once() {
        let (corpus, model, _) = fixture();
        let config = Config::builder().max_fragment_edges(0).build();
        let processor = FragmentProcessor::new(&corpus, &model, &config);
        let fragments: BTreeMap<FragmentId, Graph> =
            [(FragmentId::new(4), dog_barks(false))].into_iter().collect();

        let report = processor.find_fragment_matches(&fragments);
        assert!(!report.matches.contains_key(&FragmentId::new(4)));
        assert_eq!(
            report.skipped,
            vec![Skipped {
                fragment_id: FragmentId::new(4),
                sentence_id: None,
                reason: FragmentError::too_complex(Complexity::FragmentEdges, 1, 0),
            }]
        );
    }
}
