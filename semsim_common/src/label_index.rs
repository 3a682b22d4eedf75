//! Append-only string to integer vocabulary.

use contracts::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier assigned to a label the first time the index sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId {
    /// The underlying raw integer id.
    inner: u32,
}

impl LabelId {
    /// Creates a label id from a raw integer.
    pub const fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the id as a usize for array access.
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.inner)
    }
}

/// Vocabulary of node labels seen in the corpus.
///
/// Ids are handed out monotonically starting at zero and are never reused or
/// removed, so an id obtained during ingestion stays valid for the lifetime
/// of the index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelIndex {
    /// Label to id lookup.
    ids: HashMap<String, LabelId>,
    /// Id to label lookup, indexed by `LabelId::as_usize`.
    labels: Vec<String>,
}

impl LabelIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `label`, assigning the next free id on first sight.
    #[debug_ensures(self.ids.len() == self.labels.len())]
    #[debug_ensures(self.labels[ret.as_usize()] == label)]
    pub fn get_or_create(&mut self, label: &str) -> LabelId {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = LabelId::new(self.labels.len() as u32);
        self.labels.push(label.to_owned());
        self.ids.insert(label.to_owned(), id);
        id
    }

    /// Looks up `label` without creating an entry.
    ///
    /// `None` means the label never occurred during ingestion.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<LabelId> {
        self.ids.get(label).copied()
    }

    /// Resolves an id back to its label.
    #[must_use]
    pub fn label(&self, id: LabelId) -> Option<&str> {
        self.labels.get(id.as_usize()).map(String::as_str)
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no label has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates `(id, label)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (LabelId::from(idx), label.as_str()))
    }
}

impl From<usize> for LabelId {
    #[inline]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

impl From<LabelId> for usize {
    #[inline]
    fn from(id: LabelId) -> Self {
        id.inner as Self
    }
}
