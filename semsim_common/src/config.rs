//! Configuration for statistics building and fragment matching.
//!
//! Both the complete edge set enumerator and the exact matcher are worst-case
//! exponential, so every potentially explosive quantity has an explicit limit
//! here. Exceeding one surfaces as [`crate::FragmentError::TooComplex`] for
//! the affected fragment or fragment/sentence pair only.
//!
//! ```ignore
//! use semsim_common::Config;
//! let cfg = Config::builder()
//!     .max_fragment_nodes(8)
//!     .max_selections(10_000)
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

/// Global search configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which parse of each corpus sentence statistics and matching use.
    /// Sentences without a parse at this rank are skipped.
    pub parse_rank: usize,
    /// Largest edge list the complete edge set enumerator accepts (it visits
    /// `2^edges` subsets).
    pub max_enumeration_edges: usize,
    /// Largest sentence, in edges, the matcher will search.
    pub max_sentence_edges: usize,
    /// Largest fragment, in nodes, the matcher will search for.
    pub max_fragment_nodes: usize,
    /// Largest fragment, in edges, the matcher will search for.
    pub max_fragment_edges: usize,
    /// Most candidate node selections tried for one fragment/sentence pair.
    pub max_selections: usize,
    /// Most backtracking steps spent on one fragment/sentence pair, summed
    /// over all of its candidate selections.
    pub max_search_steps: usize,
}

impl Config {
    /// Start from the defaults and override selectively.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parse_rank: 0,
            max_enumeration_edges: 20,
            max_sentence_edges: 64,
            max_fragment_nodes: 12,
            max_fragment_edges: 16,
            max_selections: 100_000,
            max_search_steps: 1_000_000,
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    /// The configuration under construction.
    config: Config,
}

impl ConfigBuilder {
    /// Sets [`Config::parse_rank`].
    #[must_use]
    pub const fn parse_rank(mut self, rank: usize) -> Self {
        self.config.parse_rank = rank;
        self
    }

    /// Sets [`Config::max_enumeration_edges`].
    #[must_use]
    pub const fn max_enumeration_edges(mut self, limit: usize) -> Self {
        self.config.max_enumeration_edges = limit;
        self
    }

    /// Sets [`Config::max_sentence_edges`].
    #[must_use]
    pub const fn max_sentence_edges(mut self, limit: usize) -> Self {
        self.config.max_sentence_edges = limit;
        self
    }

    /// Sets [`Config::max_fragment_nodes`].
    #[must_use]
    pub const fn max_fragment_nodes(mut self, limit: usize) -> Self {
        self.config.max_fragment_nodes = limit;
        self
    }

    /// Sets [`Config::max_fragment_edges`].
    #[must_use]
    pub const fn max_fragment_edges(mut self, limit: usize) -> Self {
        self.config.max_fragment_edges = limit;
        self
    }

    /// Sets [`Config::max_selections`].
    #[must_use]
    pub const fn max_selections(mut self, limit: usize) -> Self {
        self.config.max_selections = limit;
        self
    }

    /// Sets [`Config::max_search_steps`].
    #[must_use]
    pub const fn max_search_steps(mut self, limit: usize) -> Self {
        self.config.max_search_steps = limit;
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
