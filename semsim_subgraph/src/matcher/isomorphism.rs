//! Backtracking exact match between fragment edges and selected sentence
//! edges.
//!
//! The search state is a partial [`Assignment`] plus the two pools of edges
//! still to be matched. Each frame receives its own copies, so a failed branch
//! simply returns and the caller carries on with the state it already holds.
//!
//! Every candidate edge tried costs one step of a [`SearchBudget`], which
//! bounds the factorial worst case of fragments with many interchangeable
//! edges.

use semsim_common::{Complexity, Edge, FragmentError, Graph};
use tracing::trace;

use super::assignment::Assignment;

/// Backtracking steps available to one fragment/sentence pair.
#[derive(Debug)]
pub(crate) struct SearchBudget {
    /// Steps taken so far.
    spent: usize,
    /// Most steps allowed.
    limit: usize,
}

impl SearchBudget {
    /// A fresh budget of `limit` steps.
    pub(crate) const fn new(limit: usize) -> Self {
        Self { spent: 0, limit }
    }

    /// Steps taken so far.
    pub(crate) const fn spent(&self) -> usize {
        self.spent
    }

    /// Takes one step.
    fn step(&mut self) -> Result<(), FragmentError> {
        self.spent += 1;
        Complexity::SearchSteps.check(self.spent, self.limit)
    }
}

/// Exact structural matcher for one fragment and one sentence.
pub(crate) struct ExactMatch<'f, 's> {
    /// The fragment graph.
    fragment: &'f Graph,
    /// The sentence graph.
    sentence: &'s Graph,
}

impl<'f, 's> ExactMatch<'f, 's> {
    /// Creates a matcher.
    pub(crate) const fn new(fragment: &'f Graph, sentence: &'s Graph) -> Self {
        Self { fragment, sentence }
    }

    /// Searches for a bijection between all fragment edges and exactly the
    /// sentence edges in `selected` (indices into the sentence edge list).
    ///
    /// Returns the first mapping found, trying candidates in edge-list order.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::TooComplex`] once `budget` runs out.
    pub(crate) fn find(
        &self,
        selected: &[usize],
        budget: &mut SearchBudget,
    ) -> Result<Option<Assignment>, FragmentError> {
        let fragment_pool: Vec<usize> = (0..self.fragment.edge_count()).collect();
        if fragment_pool.len() != selected.len() {
            trace!(
                "edge count mismatch: fragment {}, selection {}",
                fragment_pool.len(),
                selected.len()
            );
            return Ok(None);
        }
        self.search(fragment_pool, selected.to_vec(), Assignment::new(), 0, budget)
    }

    /// One frame of the search. Both pools always have equal length.
    fn search(
        &self,
        fragment_pool: Vec<usize>,
        sentence_pool: Vec<usize>,
        assignment: Assignment,
        depth: usize,
        budget: &mut SearchBudget,
    ) -> Result<Option<Assignment>, FragmentError> {
        let Some((&f_idx, fragment_rest)) = fragment_pool.split_first() else {
            return Ok(sentence_pool.is_empty().then_some(assignment));
        };
        let Some(f_edge) = self.fragment.edges().get(f_idx) else {
            return Ok(None);
        };

        for (pos, &s_idx) in sentence_pool.iter().enumerate() {
            budget.step()?;
            let Some(s_edge) = self.sentence.edges().get(s_idx) else {
                continue;
            };
            let Some(extended) = self.extend(&assignment, f_edge, s_edge) else {
                continue;
            };
            trace!("depth {}: {} => {}", depth, f_edge, s_edge);

            let mut sentence_rest = sentence_pool.clone();
            sentence_rest.remove(pos);
            let found = self.search(
                fragment_rest.to_vec(),
                sentence_rest,
                extended,
                depth + 1,
                budget,
            )?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    /// Tries to match `f_edge` onto `s_edge` under `assignment`.
    ///
    /// The relation and both endpoint labels must agree, and each endpoint
    /// must be either already bound to the corresponding sentence endpoint or
    /// free on both sides.
    fn extend(&self, assignment: &Assignment, f_edge: &Edge, s_edge: &Edge) -> Option<Assignment> {
        if f_edge.relation() != s_edge.relation()
            || self.fragment.label_at(f_edge.head()) != self.sentence.label_at(s_edge.head())
            || self.fragment.label_at(f_edge.dep()) != self.sentence.label_at(s_edge.dep())
        {
            return None;
        }
        assignment
            .bind(f_edge.head(), s_edge.head())?
            .bind(f_edge.dep(), s_edge.dep())
    }
}
