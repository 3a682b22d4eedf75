//! Cheap connectivity gate run before the exact match.

use semsim_common::Graph;

use super::bucket::Selection;

/// Indices of `sentence`'s edges whose endpoints are both selected.
pub(crate) fn induced_edges(sentence: &Graph, selection: &Selection) -> Vec<usize> {
    sentence
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, e)| selection.contains(e.head()) && selection.contains(e.dep()))
        .map(|(i, _)| i)
        .collect()
}

/// Returns true if every selected location is an endpoint of at least one
/// edge in `induced`.
pub(crate) fn covers_selection(sentence: &Graph, selection: &Selection, induced: &[usize]) -> bool {
    selection.locations().iter().all(|&location| {
        induced
            .iter()
            .filter_map(|&i| sentence.edges().get(i))
            .any(|e| e.touches(location))
    })
}

/// Checks a selection, returning its induced edges if no selected location is
/// isolated.
pub(crate) fn connected_edges(sentence: &Graph, selection: &Selection) -> Option<Vec<usize>> {
    let induced = induced_edges(sentence, selection);
    covers_selection(sentence, selection, &induced).then_some(induced)
}
