//! In-memory corpus of parsed sentences.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{Graph, SentenceId};

/// Every ingested sentence with its ranked alternative parses.
///
/// The parser may yield several parses per sentence; statistics and matching
/// only look at the one selected by [`crate::Config::parse_rank`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    /// Sentence id to parses, best first.
    sentences: BTreeMap<SentenceId, Vec<Graph>>,
}

impl Corpus {
    /// Creates an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers all parses of a sentence.
    ///
    /// Returns `false`, leaving the corpus untouched, if the sentence was
    /// already registered.
    pub fn insert(&mut self, sentence_id: SentenceId, parses: Vec<Graph>) -> bool {
        if self.sentences.contains_key(&sentence_id) {
            debug!("sentence {} is already registered", sentence_id);
            return false;
        }
        self.sentences.insert(sentence_id, parses);
        true
    }

    /// Appends one more parse to a sentence, creating it if needed.
    pub fn push_parse(&mut self, sentence_id: SentenceId, graph: Graph) {
        self.sentences.entry(sentence_id).or_default().push(graph);
    }

    /// All parses of a sentence.
    #[must_use]
    pub fn parses(&self, sentence_id: SentenceId) -> Option<&[Graph]> {
        self.sentences.get(&sentence_id).map(Vec::as_slice)
    }

    /// The parse of a sentence at `rank`.
    #[must_use]
    pub fn parse(&self, sentence_id: SentenceId, rank: usize) -> Option<&Graph> {
        self.sentences.get(&sentence_id)?.get(rank)
    }

    /// Iterates sentences in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (SentenceId, &[Graph])> {
        self.sentences
            .iter()
            .map(|(&id, parses)| (id, parses.as_slice()))
    }

    /// Iterates the parse at `rank` of every sentence that has one.
    pub fn ranked(&self, rank: usize) -> impl Iterator<Item = (SentenceId, &Graph)> {
        self.sentences
            .iter()
            .filter_map(move |(&id, parses)| parses.get(rank).map(|g| (id, g)))
    }

    /// Number of sentences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Returns true if no sentence was ingested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Collects `(sentence id, graph)` pairs; repeated ids become lower ranked
/// parses of the same sentence, in arrival order.
impl FromIterator<(SentenceId, Graph)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (SentenceId, Graph)>>(iter: I) -> Self {
        let mut corpus = Self::new();
        for (id, graph) in iter {
            corpus.push_parse(id, graph);
        }
        corpus
    }
}
