//! Word-distribution statistics over the corpus.
//!
//! For every sentence we record how often each label occurs (its word
//! distribution) and a reverse index from `(label, exact count)` to the
//! sentences recorded with that count. The candidate filter uses both to
//! prune the corpus before any structural matching.
//!
//! Statistics are produced by a single build pass ([`build_statistics`]) and
//! are read-only afterwards.

use std::collections::BTreeMap;

use semsim_common::{Config, Corpus, FragmentError, Graph, LabelId, LabelIndex, SentenceId};
use tracing::{debug, info, warn};

/// Occurrence count of each label within one graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordDistribution {
    /// Label id to occurrence count. Counts are always at least one.
    counts: BTreeMap<LabelId, usize>,
}

impl WordDistribution {
    /// Count of `label`, zero if absent.
    #[must_use]
    pub fn count(&self, label: LabelId) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Iterates `(label, count)` in label id order.
    pub fn iter(&self) -> impl Iterator<Item = (LabelId, usize)> + '_ {
        self.counts.iter().map(|(&label, &count)| (label, count))
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true for the distribution of an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of nodes counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns true if every label of `requirement` occurs at least as often
    /// here.
    #[must_use]
    pub fn satisfies(&self, requirement: &Self) -> bool {
        requirement
            .iter()
            .all(|(label, needed)| self.count(label) >= needed)
    }

    /// Adds one occurrence of `label`.
    fn bump(&mut self, label: LabelId) {
        *self.counts.entry(label).or_insert(0) += 1;
    }
}

impl FromIterator<(LabelId, usize)> for WordDistribution {
    fn from_iter<I: IntoIterator<Item = (LabelId, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().filter(|&(_, count)| count > 0).collect(),
        }
    }
}

/// Computes the word distribution of `graph` against an existing vocabulary.
///
/// # Errors
///
/// Returns [`FragmentError::UnknownVocabulary`] for the first node whose label
/// is not in `index`. Such a graph cannot be contained in any corpus sentence.
pub fn distribution(graph: &Graph, index: &LabelIndex) -> Result<WordDistribution, FragmentError> {
    let mut dist = WordDistribution::default();
    for node in graph.nodes() {
        let Some(label) = index.lookup(node.label()) else {
            debug!("label '{}' is not in the corpus vocabulary", node.label());
            return Err(FragmentError::unknown_vocabulary(node.label()));
        };
        dist.bump(label);
    }
    Ok(dist)
}

/// Interns every label of `graph` and returns its word distribution.
fn intern_distribution(graph: &Graph, index: &mut LabelIndex) -> WordDistribution {
    let mut dist = WordDistribution::default();
    for node in graph.nodes() {
        dist.bump(index.get_or_create(node.label()));
    }
    dist
}

/// Reverse buckets: label, then exact count, then the sentences.
type Buckets = BTreeMap<LabelId, BTreeMap<usize, Vec<SentenceId>>>;

/// Accumulates per-sentence distributions during the build phase.
#[derive(Debug, Default)]
pub struct StatisticsBuilder {
    /// `(label, exact count)` to recorded sentences.
    buckets: Buckets,
    /// Sentence to its full distribution.
    distributions: BTreeMap<SentenceId, WordDistribution>,
}

impl StatisticsBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sentence.
    ///
    /// The sentence id is appended to the bucket of every `(label, count)`
    /// pair of the distribution, and the distribution itself is stored under
    /// the sentence id.
    pub fn record(&mut self, sentence_id: SentenceId, distribution: WordDistribution) {
        for (label, count) in distribution.iter() {
            self.buckets
                .entry(label)
                .or_default()
                .entry(count)
                .or_default()
                .push(sentence_id);
        }
        if self.distributions.insert(sentence_id, distribution).is_some() {
            warn!("sentence {} recorded twice, keeping the latest distribution", sentence_id);
        }
    }

    /// Freezes the statistics.
    #[must_use]
    pub fn finish(mut self) -> CorpusStatistics {
        for sentences in self.buckets.values_mut().flat_map(BTreeMap::values_mut) {
            sentences.sort_unstable();
            sentences.dedup();
        }
        CorpusStatistics {
            buckets: self.buckets,
            distributions: self.distributions,
        }
    }
}

/// Read-only corpus statistics snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusStatistics {
    /// `(label, exact count)` to recorded sentences, ascending.
    buckets: Buckets,
    /// Sentence to its full distribution.
    distributions: BTreeMap<SentenceId, WordDistribution>,
}

impl CorpusStatistics {
    /// Sentences recorded with exactly `count` occurrences of `label`.
    #[must_use]
    pub fn lookup_exact(&self, label: LabelId, count: usize) -> &[SentenceId] {
        self.buckets
            .get(&label)
            .and_then(|by_count| by_count.get(&count))
            .map_or(&[], Vec::as_slice)
    }

    /// Sentences recorded with at least `count` occurrences of `label`,
    /// ascending.
    #[must_use]
    pub fn lookup_at_least(&self, label: LabelId, count: usize) -> Vec<SentenceId> {
        let Some(by_count) = self.buckets.get(&label) else {
            return Vec::new();
        };
        let mut sentences: Vec<SentenceId> = by_count
            .range(count.max(1)..)
            .flat_map(|(_, sentences)| sentences.iter().copied())
            .collect();
        sentences.sort_unstable();
        sentences
    }

    /// Keeps the candidates whose recorded count of every required label is at
    /// least the required count. Order is preserved.
    #[must_use]
    pub fn filter_at_least(
        &self,
        candidates: &[SentenceId],
        requirement: &WordDistribution,
    ) -> Vec<SentenceId> {
        candidates
            .iter()
            .copied()
            .filter(|sentence| {
                self.distributions
                    .get(sentence)
                    .is_some_and(|dist| dist.satisfies(requirement))
            })
            .collect()
    }

    /// The recorded distribution of a sentence.
    #[must_use]
    pub fn distribution_of(&self, sentence_id: SentenceId) -> Option<&WordDistribution> {
        self.distributions.get(&sentence_id)
    }

    /// Number of recorded sentences.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.distributions.len()
    }
}

/// Single build pass over the corpus.
///
/// Interns every label of each sentence's designated parse
/// ([`Config::parse_rank`]) into `index` and records the sentence's word
/// distribution. Sentences without a parse at that rank are skipped.
/// Running it twice on the same corpus into fresh indices yields identical
/// results.
pub fn build_statistics(corpus: &Corpus, index: &mut LabelIndex, config: &Config) -> CorpusStatistics {
    info!(
        "building corpus statistics: {} sentences, parse rank {}",
        corpus.len(),
        config.parse_rank
    );

    let mut builder = StatisticsBuilder::new();
    for (sentence_id, parses) in corpus.iter() {
        let Some(graph) = parses.get(config.parse_rank) else {
            warn!(
                "sentence {} has {} parses, none at rank {}; skipping",
                sentence_id,
                parses.len(),
                config.parse_rank
            );
            continue;
        };
        builder.record(sentence_id, intern_distribution(graph, index));
    }
    let statistics = builder.finish();

    info!(
        "corpus statistics built: {} sentences recorded, {} labels",
        statistics.sentence_count(),
        index.len()
    );
    statistics
}
