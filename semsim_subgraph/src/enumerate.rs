//! Exhaustive enumeration of complete edge subsets.
//!
//! A subset `S` of a graph's edge list `E` is *complete* when the edges of `E`
//! whose endpoints both lie in the locations touched by `S` are exactly `S`.
//! Complete subsets correspond one-to-one with node-induced subgraphs, and
//! they are the only subsets for which the split into internal and boundary
//! edges ([`EdgeSplit`]) is unambiguous.
//!
//! The enumerator walks the binary include/exclude tree over `E`, so it visits
//! `2^|E|` leaves. [`Config::max_enumeration_edges`] bounds `|E|`.

use std::collections::BTreeSet;

use contracts::*;
use semsim_common::{Complexity, Config, Edge, FragmentError, Location};
use tracing::debug;

/// Result of one enumeration run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Complete subsets as ascending edge indices, in discovery order.
    complete: Vec<Vec<usize>>,
    /// Leaves of the include/exclude tree that were tested.
    visited: u64,
}

impl Enumeration {
    /// The complete subsets found, including the empty one.
    #[must_use]
    pub fn complete(&self) -> &[Vec<usize>] {
        &self.complete
    }

    /// Consumes the enumeration, returning the complete subsets.
    #[must_use]
    pub fn into_complete(self) -> Vec<Vec<usize>> {
        self.complete
    }

    /// Number of candidate subsets tested.
    #[must_use]
    pub const fn visited(&self) -> u64 {
        self.visited
    }
}

/// Locations touched by the edges of `subset`.
#[must_use]
pub fn locations_of(edges: &[Edge], subset: &[usize]) -> BTreeSet<Location> {
    subset
        .iter()
        .filter_map(|&i| edges.get(i))
        .flat_map(|edge| [edge.head(), edge.dep()])
        .collect()
}

/// Returns true if `subset` (ascending edge indices into `edges`) is complete.
#[must_use]
pub fn is_complete(edges: &[Edge], subset: &[usize]) -> bool {
    let locations = locations_of(edges, subset);
    let induced = edges
        .iter()
        .filter(|e| locations.contains(&e.head()) && locations.contains(&e.dep()))
        .count();
    induced == subset.len()
}

/// Enumerates every complete subset of `edges`.
///
/// # Errors
///
/// Returns [`FragmentError::TooComplex`] if `edges` is longer than
/// [`Config::max_enumeration_edges`].
#[debug_ensures(ret.as_ref().ok().is_none_or(|e| {
    u32::try_from(edges.len())
        .ok()
        .and_then(|n| 1u64.checked_shl(n))
        .is_none_or(|total| e.visited() == total)
}))]
pub fn enumerate_complete(edges: &[Edge], config: &Config) -> Result<Enumeration, FragmentError> {
    Complexity::EnumerationEdges.check(edges.len(), config.max_enumeration_edges)?;

    let mut enumerator = Enumerator {
        edges,
        found: Enumeration::default(),
    };
    enumerator.descend(0, Vec::new());

    debug!(
        "enumerated {} edges: {} subsets visited, {} complete",
        edges.len(),
        enumerator.found.visited,
        enumerator.found.complete.len()
    );
    Ok(enumerator.found)
}

/// Include/exclude recursion state.
struct Enumerator<'e> {
    /// The full edge list.
    edges: &'e [Edge],
    /// Results accumulated so far.
    found: Enumeration,
}

impl Enumerator<'_> {
    /// Decides edge `next`, then recurses; `selected` is owned by the frame.
    fn descend(&mut self, next: usize, selected: Vec<usize>) {
        if next == self.edges.len() {
            self.found.visited += 1;
            if is_complete(self.edges, &selected) {
                self.found.complete.push(selected);
            }
            return;
        }

        self.descend(next + 1, selected.clone());

        let mut with_next = selected;
        with_next.push(next);
        self.descend(next + 1, with_next);
    }
}

/// Edges of a graph classified against one complete subset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeSplit {
    /// Edges with both endpoints inside the subset's locations.
    pub internal: Vec<usize>,
    /// Edges with exactly one endpoint inside.
    pub boundary: Vec<usize>,
}

impl EdgeSplit {
    /// Classifies every edge of `edges` against the locations of `subset`.
    ///
    /// Edges with neither endpoint inside belong to neither class.
    #[must_use]
    pub fn classify(edges: &[Edge], subset: &[usize]) -> Self {
        let locations = locations_of(edges, subset);
        let mut split = Self::default();
        for (i, edge) in edges.iter().enumerate() {
            match (
                locations.contains(&edge.head()),
                locations.contains(&edge.dep()),
            ) {
                (true, true) => split.internal.push(i),
                (true, false) | (false, true) => split.boundary.push(i),
                (false, false) => {}
            }
        }
        split
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    #[derive(Clone, Debug)]
    struct SmallEdgeList(Vec<Edge>);

    impl Arbitrary for SmallEdgeList {
        fn arbitrary(g: &mut Gen) -> Self {
            let len = usize::arbitrary(g) % 8;
            let edges = (0..len)
                .map(|_| {
                    Edge::new(
                        "r",
                        Location::new(u32::arbitrary(g) % 5),
                        Location::new(u32::arbitrary(g) % 5),
                    )
                })
                .collect();
            Self(edges)
        }
    }

    quickcheck! {
        fn prop_visits_every_subset(list: SmallEdgeList) -> bool {
            let found = enumerate_complete(&list.0, &Config::default()).unwrap();
            found.visited() == 1u64 << list.0.len()
        }

        fn prop_full_set_is_complete_and_covers_every_edge(list: SmallEdgeList) -> bool {
            let all: Vec<usize> = (0..list.0.len()).collect();
            let found = enumerate_complete(&list.0, &Config::default()).unwrap();
            found.complete().contains(&all)
                && all.iter().all(|i| found.complete().iter().any(|s| s.contains(i)))
        }

        fn prop_every_reported_subset_is_complete(list: SmallEdgeList) -> bool {
            let found = enumerate_complete(&list.0, &Config::default()).unwrap();
            found.complete().iter().all(|s| is_complete(&list.0, s))
        }
    }
}
