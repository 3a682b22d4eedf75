//! Partial node mapping between a fragment and a sentence selection.

use contracts::*;
use std::collections::BTreeMap;

use semsim_common::Location;

/// An injective, partial mapping of fragment locations to sentence locations.
///
/// The value is never changed in place during the search: [`Assignment::bind`]
/// returns an extended copy, so every backtracking frame owns the mapping it
/// was called with and abandoning a branch needs no undo step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Fragment to sentence location mapping
    fragment_to_sentence: BTreeMap<Location, Location>,
    /// Sentence to fragment location mapping
    sentence_to_fragment: BTreeMap<Location, Location>,
}

impl Assignment {
    /// Creates an empty assignment.
    #[ensures(ret.is_consistent())]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that both directions describe the same injective mapping.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.fragment_to_sentence.len() == self.sentence_to_fragment.len()
            && self
                .fragment_to_sentence
                .iter()
                .all(|(f, s)| self.sentence_to_fragment.get(s) == Some(f))
    }

    /// Sentence location bound to `fragment`, if any.
    #[must_use]
    pub fn get(&self, fragment: Location) -> Option<Location> {
        self.fragment_to_sentence.get(&fragment).copied()
    }

    /// Returns true if some fragment location is bound to `sentence`.
    #[must_use]
    pub fn is_used(&self, sentence: Location) -> bool {
        self.sentence_to_fragment.contains_key(&sentence)
    }

    /// Returns an assignment that additionally binds `fragment` to `sentence`.
    ///
    /// Binding an existing pair again is a no-op. Returns `None` if
    /// `fragment` is already bound elsewhere or `sentence` is already taken by
    /// another fragment location.
    #[debug_ensures(ret.as_ref().is_none_or(|a| a.is_consistent() && a.get(fragment) == Some(sentence)))]
    #[must_use]
    pub fn bind(&self, fragment: Location, sentence: Location) -> Option<Self> {
        match (self.get(fragment), self.sentence_to_fragment.get(&sentence)) {
            (Some(bound), _) if bound == sentence => Some(self.clone()),
            (None, None) => {
                let mut next = self.clone();
                next.fragment_to_sentence.insert(fragment, sentence);
                next.sentence_to_fragment.insert(sentence, fragment);
                Some(next)
            }
            _ => None,
        }
    }

    /// Number of bound fragment locations.
    #[must_use]
    pub fn len(&self) -> usize {
        debug_assert_eq!(
            self.fragment_to_sentence.len(),
            self.sentence_to_fragment.len()
        );
        self.fragment_to_sentence.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragment_to_sentence.is_empty()
    }

    /// Iterates `(fragment, sentence)` pairs in fragment location order.
    pub fn iter(&self) -> impl Iterator<Item = (Location, Location)> + '_ {
        self.fragment_to_sentence.iter().map(|(&f, &s)| (f, s))
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    #[derive(Clone, Debug)]
    struct ArbitraryBind {
        fragment: Location,
        sentence: Location,
    }

    impl Arbitrary for ArbitraryBind {
        fn arbitrary(g: &mut Gen) -> Self {
            Self {
                fragment: Location::new(u32::arbitrary(g) % 10),
                sentence: Location::new(u32::arbitrary(g) % 10),
            }
        }
    }

    quickcheck! {
        fn prop_binds_stay_injective(ops: Vec<ArbitraryBind>) -> bool {
            let mut assignment = Assignment::new();
            for op in ops {
                if let Some(next) = assignment.bind(op.fragment, op.sentence) {
                    assignment = next;
                }
                if !assignment.is_consistent() {
                    return false;
                }
            }
            let mut targets: Vec<Location> = assignment.iter().map(|(_, s)| s).collect();
            targets.sort_unstable();
            targets.dedup();
            targets.len() == assignment.len()
        }
    }
}
