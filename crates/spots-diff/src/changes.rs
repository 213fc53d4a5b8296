//! Bucketing of per-index classifications into a change set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::item_diff::{IndexedDiff, ItemDiff};

/// Aggregate result of a diff, bucketed by operation.
///
/// Index spaces differ per bucket: `insertions` and `moved` values are
/// indices in the new collection, `deletions` and `moved` keys are indices in
/// the old collection, and `reloads`, `updates`, `child_updates` address a
/// position that exists in both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Changes {
    pub insertions: BTreeSet<usize>,
    pub deletions: BTreeSet<usize>,
    pub reloads: BTreeSet<usize>,
    pub updates: BTreeSet<usize>,
    #[serde(rename = "childUpdates", alias = "child_updates")]
    pub child_updates: BTreeSet<usize>,
    /// Old index → new index.
    pub moved: BTreeMap<usize, usize>,
}

impl Changes {
    /// An empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket a sequence of classifications in one pass.
    ///
    /// `None` contributes nothing. Bucket membership is the contract; the
    /// order of the input only matters for which entry wins if the same
    /// move source shows up twice.
    pub fn aggregate<I>(diffs: I) -> Self
    where
        I: IntoIterator<Item = IndexedDiff>,
    {
        let mut changes = Self::default();
        for IndexedDiff { index, diff } in diffs {
            match diff {
                ItemDiff::Kind | ItemDiff::Size => {
                    changes.reloads.insert(index);
                }
                ItemDiff::Children => {
                    changes.child_updates.insert(index);
                }
                ItemDiff::New => {
                    changes.insertions.insert(index);
                }
                ItemDiff::Removed => {
                    changes.deletions.insert(index);
                }
                ItemDiff::Moved { from, to } => {
                    changes.moved.insert(from, to);
                }
                ItemDiff::Value => {
                    changes.updates.insert(index);
                }
                ItemDiff::None => {}
            }
        }
        changes
    }

    /// Returns `true` if there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
            && self.deletions.is_empty()
            && self.reloads.is_empty()
            && self.updates.is_empty()
            && self.child_updates.is_empty()
            && self.moved.is_empty()
    }

    /// Total number of operations across all buckets.
    pub fn len(&self) -> usize {
        self.insertions.len()
            + self.deletions.len()
            + self.reloads.len()
            + self.updates.len()
            + self.child_updates.len()
            + self.moved.len()
    }

    /// Returns `true` if applying the changes alters the row structure
    /// (anything other than in-place refreshes).
    pub fn is_structural(&self) -> bool {
        !self.insertions.is_empty() || !self.deletions.is_empty() || !self.moved.is_empty()
    }

    /// Length of the collection after applying to one of `old_len` rows.
    pub fn resulting_len(&self, old_len: usize) -> usize {
        (old_len + self.insertions.len()).saturating_sub(self.deletions.len())
    }
}

impl FromIterator<IndexedDiff> for Changes {
    fn from_iter<T: IntoIterator<Item = IndexedDiff>>(iter: T) -> Self {
        Self::aggregate(iter)
    }
}
