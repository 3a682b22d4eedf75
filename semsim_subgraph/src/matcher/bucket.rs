//! Per-label buckets of candidate sentence locations.

use indexmap::IndexMap;
use itertools::Itertools;
use semsim_common::{Graph, Location};

/// Sentence locations sharing one fragment label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Bucket<'f> {
    /// The shared label.
    pub(crate) label: &'f str,
    /// Sentence locations carrying the label, ascending.
    pub(crate) locations: Vec<Location>,
    /// How many fragment nodes carry the label.
    pub(crate) count: usize,
}

impl Bucket<'_> {
    /// Number of ways to pick `count` of `locations`, saturating.
    fn combinations(&self) -> usize {
        binomial(self.locations.len(), self.count)
    }
}

/// A full node selection: one sentence location per fragment node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Selection {
    /// Selected locations, ascending.
    locations: Vec<Location>,
}

impl Selection {
    /// Builds a selection from per-bucket choices.
    fn from_choices(choices: Vec<Vec<Location>>) -> Self {
        let mut locations: Vec<Location> = choices.into_iter().flatten().collect();
        locations.sort_unstable();
        Self { locations }
    }

    /// Returns true if `location` is selected.
    pub(crate) fn contains(&self, location: Location) -> bool {
        self.locations.binary_search(&location).is_ok()
    }

    /// Selected locations, ascending.
    pub(crate) fn locations(&self) -> &[Location] {
        &self.locations
    }
}

#[cfg(test)]
impl From<Vec<Location>> for Selection {
    fn from(mut locations: Vec<Location>) -> Self {
        locations.sort_unstable();
        Self { locations }
    }
}

/// Buckets for every label of a fragment, in first-occurrence order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BucketGroup<'f> {
    /// One bucket per distinct fragment label.
    buckets: Vec<Bucket<'f>>,
}

impl<'f> BucketGroup<'f> {
    /// Buckets `sentence`'s locations by the labels of `fragment`.
    ///
    /// Returns `None` if some label has fewer sentence locations than fragment
    /// occurrences, in which case no selection exists.
    pub(crate) fn build(fragment: &'f Graph, sentence: &Graph) -> Option<Self> {
        let mut counts: IndexMap<&'f str, usize> = IndexMap::new();
        for node in fragment.nodes() {
            *counts.entry(node.label()).or_insert(0) += 1;
        }

        let mut buckets = Vec::with_capacity(counts.len());
        for (label, count) in counts {
            let locations: Vec<Location> = sentence.locations_with_label(label).collect();
            if locations.len() < count {
                return None;
            }
            buckets.push(Bucket {
                label,
                locations,
                count,
            });
        }
        Some(Self { buckets })
    }

    /// The buckets.
    pub(crate) fn buckets(&self) -> &[Bucket<'f>] {
        &self.buckets
    }

    /// Total number of selections [`BucketGroup::selections`] yields,
    /// saturating at `usize::MAX`.
    pub(crate) fn selection_count(&self) -> usize {
        if self.buckets.is_empty() {
            return 0;
        }
        self.buckets
            .iter()
            .fold(1usize, |acc, bucket| acc.saturating_mul(bucket.combinations()))
    }

    /// All selections, depth-first across buckets: the choice within the
    /// first bucket varies slowest, the last bucket fastest. Within a bucket
    /// combinations come in lexicographic order of ascending locations.
    pub(crate) fn selections(&self) -> impl Iterator<Item = Selection> + '_ {
        let per_bucket = self
            .buckets
            .iter()
            .map(|bucket| bucket.locations.iter().copied().combinations(bucket.count));

        // An empty product would otherwise yield a single empty selection.
        let non_empty = !self.buckets.is_empty();
        per_bucket
            .multi_cartesian_product()
            .filter(move |_| non_empty)
            .map(Selection::from_choices)
    }
}

/// `n choose k`, saturating at `usize::MAX`.
pub(crate) fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    acc as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(labels: &[&str]) -> Graph {
        let mut b = Graph::builder();
        for label in labels {
            b.add_node(*label, None);
        }
        b.build().unwrap()
    }

    fn locs(raw: &[u32]) -> Vec<Location> {
        raw.iter().copied().map(Location::new).collect()
    }

    #[test]
    fn binomial_matches_small_table() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(200, 100), usize::MAX);
    }

    #[test]
    fn buckets_follow_fragment_label_order() {
        let fragment = graph(&["dog", "bark", "dog"]);
        let sentence = graph(&["bark", "dog", "the", "dog", "dog"]);
        let group = BucketGroup::build(&fragment, &sentence).unwrap();

        let labels: Vec<&str> = group.buckets().iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["dog", "bark"]);
        assert_eq!(group.buckets()[0].locations, locs(&[1, 3, 4]));
        assert_eq!(group.buckets()[0].count, 2);
        assert_eq!(group.selection_count(), 3);
    }

    #[test]
    fn missing_occurrences_yield_no_group() {
        let fragment = graph(&["dog", "dog"]);
        let sentence = graph(&["dog", "bark"]);
        assert!(BucketGroup::build(&fragment, &sentence).is_none());
    }

    #[test]
    fn selections_are_depth_first() {
        let fragment = graph(&["a", "b"]);
        let sentence = graph(&["a", "b", "a", "b"]);
        let group = BucketGroup::build(&fragment, &sentence).unwrap();

        let selections: Vec<Vec<Location>> = group
            .selections()
            .map(|s| s.locations().to_vec())
            .collect();
        assert_eq!(
            selections,
            vec![locs(&[0, 1]), locs(&[0, 3]), locs(&[1, 2]), locs(&[2, 3])]
        );
        assert_eq!(selections.len(), group.selection_count());
    }

    #[test]
    fn combinations_never_repeat_a_location() {
        let fragment = graph(&["dog", "dog"]);
        let sentence = graph(&["dog", "dog", "dog"]);
        let group = BucketGroup::build(&fragment, &sentence).unwrap();

        let selections: Vec<Selection> = group.selections().collect();
        assert_eq!(selections.len(), 3);
        assert!(selections.iter().all(|s| s.locations()[0] != s.locations()[1]));
    }

    #[test]
    fn empty_fragment_has_no_selection() {
        let fragment = graph(&[]);
        let sentence = graph(&["dog"]);
        let group = BucketGroup::build(&fragment, &sentence).unwrap();
        assert_eq!(group.selection_count(), 0);
        assert_eq!(group.selections().count(), 0);
    }
}
