//! Statistics-based prefilter narrowing the corpus to probable matches.
//!
//! A sentence can only contain a fragment if it has at least as many
//! occurrences of every fragment label. The filter seeds from the smallest
//! such reverse bucket and checks the remaining labels against each
//! candidate's recorded distribution. It never drops a sentence that could
//! match, but it keeps many that do not.

use semsim_common::{FragmentError, Graph, SentenceId};
use tracing::debug;

use crate::model::CorpusModel;
use crate::stats::{WordDistribution, distribution};

/// Prefilter over a built [`CorpusModel`].
#[derive(Clone, Copy, Debug)]
pub struct CandidateFilter<'m> {
    /// The corpus snapshot.
    model: &'m CorpusModel,
}

impl<'m> CandidateFilter<'m> {
    /// Creates a filter over `model`.
    #[must_use]
    pub const fn new(model: &'m CorpusModel) -> Self {
        Self { model }
    }

    /// The smallest at-least bucket among the requirement's labels, ascending.
    ///
    /// Ties go to the lowest label id. An empty requirement yields no
    /// sentences.
    #[must_use]
    pub fn representative_bucket(&self, requirement: &WordDistribution) -> Vec<SentenceId> {
        let statistics = self.model.statistics();
        let mut smallest: Option<Vec<SentenceId>> = None;
        for (label, count) in requirement.iter() {
            let bucket = statistics.lookup_at_least(label, count);
            if smallest.as_ref().is_none_or(|best| bucket.len() < best.len()) {
                smallest = Some(bucket);
            }
        }
        smallest.unwrap_or_default()
    }

    /// Sentences that pass the label-count prefilter for `fragment`,
    /// ascending.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::UnknownVocabulary`] if the fragment uses a
    /// label that never occurred in the corpus.
    pub fn probable_matches(&self, fragment: &Graph) -> Result<Vec<SentenceId>, FragmentError> {
        let requirement = distribution(fragment, self.model.index())?;
        let seed = self.representative_bucket(&requirement);
        let candidates = self
            .model
            .statistics()
            .filter_at_least(&seed, &requirement);
        debug!(
            "prefilter: seed bucket {}, {} candidates",
            seed.len(),
            candidates.len()
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semsim_common::{Config, Corpus};

    fn graph(labels: &[&str]) -> Graph {
        let mut b = Graph::builder();
        for label in labels {
            b.add_node(*label, None);
        }
        b.build().unwrap()
    }

    fn sid(raw: u32) -> SentenceId {
        SentenceId::new(raw)
    }

    fn model() -> CorpusModel {
        let corpus: Corpus = [
            (sid(1), graph(&["the", "dog", "bark"])),
            (sid(2), graph(&["the", "dog", "the", "cat"])),
            (sid(3), graph(&["dog", "dog", "bark"])),
            (sid(4), graph(&["cat"])),
        ]
        .into_iter()
        .collect();
        CorpusModel::build(&corpus, &Config::default())
    }

    fn requirement(model: &CorpusModel, pairs: &[(&str, usize)]) -> WordDistribution {
        pairs
            .iter()
            .map(|&(label, count)| (model.index().lookup(label).unwrap(), count))
            .collect()
    }

    #[test]
    fn representative_bucket_is_the_smallest() {
        let model = model();
        let filter = CandidateFilter::new(&model);

        // dog: {1, 2, 3}, bark: {1, 3}
        let req = requirement(&model, &[("dog", 1), ("bark", 1)]);
        assert_eq!(filter.representative_bucket(&req), vec![sid(1), sid(3)]);

        // dog x2: {3}
        let req = requirement(&model, &[("dog", 2), ("bark", 1)]);
        assert_eq!(filter.representative_bucket(&req), vec![sid(3)]);
    }

    #[test]
    fn ties_go_to_the_lowest_label_id() {
        let model = model();
        let filter = CandidateFilter::new(&model);
        // "the" is interned before "cat"; both have two sentences
        let req = requirement(&model, &[("cat", 1), ("the", 1)]);
        assert_eq!(filter.representative_bucket(&req), vec![sid(1), sid(2)]);
    }

    #[test]
    fn probable_matches_apply_every_label() {
        let model = model();
        let filter = CandidateFilter::new(&model);

        assert_eq!(
            filter.probable_matches(&graph(&["dog", "bark"])).unwrap(),
            vec![sid(1), sid(3)]
        );
        assert_eq!(
            filter.probable_matches(&graph(&["the", "the"])).unwrap(),
            vec![sid(2)]
        );
        assert_eq!(
            filter.probable_matches(&graph(&["cat", "bark"])).unwrap(),
            Vec::<SentenceId>::new()
        );
    }

    #[test]
    fn empty_fragment_has_no_candidates() {
        let model = model();
        let filter = CandidateFilter::new(&model);
        assert!(filter.probable_matches(&Graph::default()).unwrap().is_empty());
    }

    #[test]
    fn unknown_label_is_an_error() {
        let model = model();
        let filter = CandidateFilter::new(&model);
        assert_eq!(
            filter.probable_matches(&graph(&["dog", "unicorn"])),
            Err(FragmentError::unknown_vocabulary("unicorn"))
        );
    }
}
