#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use lazy_static::lazy_static;
use semsim_common::{Config, Corpus, FragmentId, Graph, SentenceId};
use semsim_subgraph::CorpusModel;

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds a graph from words and `(relation, head, dep)` position triples.
#[track_caller]
pub fn graph(words: &[&str], edges: &[(&str, usize, usize)]) -> Graph {
    let mut b = Graph::builder();
    let locations: Vec<_> = words.iter().map(|w| b.add_node(*w, None)).collect();
    for &(relation, head, dep) in edges {
        b.add_edge(relation, locations[head], locations[dep]);
    }
    b.build().expect("fixture graph is well formed")
}

pub fn sid(raw: u32) -> SentenceId {
    SentenceId::new(raw)
}

pub fn fid(raw: u32) -> FragmentId {
    FragmentId::new(raw)
}

pub fn corpus(sentences: Vec<(u32, Graph)>) -> Corpus {
    sentences
        .into_iter()
        .map(|(raw, graph)| (sid(raw), graph))
        .collect()
}

pub fn fragments(graphs: Vec<(u32, Graph)>) -> BTreeMap<FragmentId, Graph> {
    graphs
        .into_iter()
        .map(|(raw, graph)| (fid(raw), graph))
        .collect()
}

lazy_static! {
    /// A handful of short parses shared by the scenario and property tests.
    pub static ref SMALL_CORPUS: Corpus = corpus(vec![
        (1, graph(&["run", "dog"], &[("ncsubj", 0, 1)])),
        (
            2,
            graph(
                &["the", "dog", "barks", "loudly"],
                &[("det", 1, 0), ("ncsubj", 2, 1), ("ncmod", 2, 3)],
            ),
        ),
        (
            3,
            graph(
                &["a", "big", "dog", "sees", "the", "dog"],
                &[
                    ("det", 2, 0),
                    ("ncmod", 2, 1),
                    ("ncsubj", 3, 2),
                    ("dobj", 3, 5),
                    ("det", 5, 4),
                ],
            ),
        ),
        (
            4,
            graph(
                &["the", "cat", "barks"],
                &[("det", 1, 0), ("ncsubj", 2, 1)],
            ),
        ),
    ]);
    pub static ref SMALL_MODEL: CorpusModel = CorpusModel::build(&SMALL_CORPUS, &Config::default());
}
