//! Fragment matching over a corpus of dependency parses.
//!
//! The build phase ([`CorpusModel::build`]) interns every label of the corpus
//! and records per-sentence word distributions. Queries then run through
//! [`FragmentProcessor::find_fragment_matches`]: a statistics prefilter
//! ([`CandidateFilter`]) narrows the corpus, and the [`SubgraphMatcher`]
//! decides exact containment for each remaining sentence.
//!
//! The [`enumerate`] and [`features`] modules serve the offline side: listing
//! the complete edge subsets of a graph and counting the boundary features of
//! each.

mod candidates;
pub mod enumerate;
pub mod features;
pub mod matcher;
mod model;
mod processor;
pub mod stats;

pub use candidates::CandidateFilter;
pub use matcher::{
    Assignment, Embedding, MatchOutcome, MatchStats, SubgraphMatcher, check_fragment_limits,
};
pub use model::CorpusModel;
pub use processor::{FragmentMatch, FragmentProcessor, MatchReport, Skipped};
pub use stats::{CorpusStatistics, WordDistribution};
