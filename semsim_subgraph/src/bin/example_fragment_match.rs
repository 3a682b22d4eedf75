//! Demo: enumerate fragments of one sentence and query them against a toy corpus.

use std::collections::BTreeMap;

use semsim_common::{Config, Corpus, FragmentId, Graph, SentenceId};
use semsim_subgraph::enumerate::enumerate_complete;
use semsim_subgraph::features::FeatureCounter;
use semsim_subgraph::{CorpusModel, FragmentProcessor};
use tracing::info;

/// Parses `words` with `edges` given as `(relation, head, dep)` positions.
fn parse(words: &[&str], edges: &[(&str, usize, usize)]) -> Result<Graph, Box<dyn std::error::Error>> {
    let mut builder = Graph::builder();
    let locations: Vec<_> = words.iter().map(|w| builder.add_node(*w, None)).collect();
    for &(relation, head, dep) in edges {
        let (Some(&head), Some(&dep)) = (locations.get(head), locations.get(dep)) else {
            return Err(format!("edge {relation} references a missing word").into());
        };
        builder.add_edge(relation, head, dep);
    }
    Ok(builder.build()?)
}

/// Enumerates the fragments of the first sentence, then finds every corpus
/// sentence containing each of them.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut corpus = Corpus::new();
    corpus.push_parse(
        SentenceId::new(1),
        parse(
            &["the", "dog", "barks", "loudly"],
            &[("det", 1, 0), ("ncsubj", 2, 1), ("ncmod", 2, 3)],
        )?,
    );
    corpus.push_parse(
        SentenceId::new(2),
        parse(
            &["a", "dog", "barks"],
            &[("det", 1, 0), ("ncsubj", 2, 1)],
        )?,
    );
    corpus.push_parse(
        SentenceId::new(3),
        parse(
            &["the", "cat", "sleeps", "loudly"],
            &[("det", 1, 0), ("ncsubj", 2, 1), ("ncmod", 2, 3)],
        )?,
    );

    let config = Config::default();
    let model = CorpusModel::build(&corpus, &config);
    info!("vocabulary has {} labels", model.index().len());

    let Some(source) = corpus.parse(SentenceId::new(1), config.parse_rank) else {
        return Err("sentence 1 has no designated parse".into());
    };
    let fragments: BTreeMap<FragmentId, Graph> = enumerate_complete(source.edges(), &config)?
        .into_complete()
        .into_iter()
        .filter(|subset| !subset.is_empty())
        .zip(0u32..)
        .map(|(subset, id)| (FragmentId::new(id), source.edge_subgraph(&subset)))
        .collect();

    let processor = FragmentProcessor::new(&corpus, &model, &config);
    let report = processor.find_fragment_matches(&fragments);

    for (fragment_id, fragment) in &fragments {
        let sentences = report.sentences_for(*fragment_id);
        println!("{fragment_id} {fragment}");
        println!("    found in {} sentences: {:?}", sentences.len(), sentences);
    }
    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.fragment_id, skipped.reason);
    }

    let features = FeatureCounter::count_corpus(&corpus, &config);
    for (feature, count) in features.iter() {
        println!("{} -> {}: {}", feature.relation, feature.dep_label, count);
    }

    Ok(())
}
