//! Immutable corpus-wide snapshot shared by every query.

use semsim_common::{Config, Corpus, LabelIndex};

use crate::stats::{CorpusStatistics, build_statistics};

/// Vocabulary and statistics produced by the build phase.
///
/// Queries borrow this snapshot; nothing mutates it after [`CorpusModel::build`]
/// returns, so it can be shared freely across threads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusModel {
    /// Vocabulary of every label in the designated parses.
    index: LabelIndex,
    /// Word-distribution statistics.
    statistics: CorpusStatistics,
}

impl CorpusModel {
    /// Runs the statistics build pass over `corpus` into a fresh index.
    #[must_use]
    pub fn build(corpus: &Corpus, config: &Config) -> Self {
        let mut index = LabelIndex::new();
        let statistics = build_statistics(corpus, &mut index, config);
        Self { index, statistics }
    }

    /// Wraps an externally built vocabulary and statistics.
    #[must_use]
    pub const fn from_parts(index: LabelIndex, statistics: CorpusStatistics) -> Self {
        Self { index, statistics }
    }

    /// The label vocabulary.
    #[must_use]
    pub const fn index(&self) -> &LabelIndex {
        &self.index
    }

    /// The word-distribution statistics.
    #[must_use]
    pub const fn statistics(&self) -> &CorpusStatistics {
        &self.statistics
    }
}
