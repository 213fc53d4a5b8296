//! Per-index classification of an old/new item pair.

use serde::{Deserialize, Serialize};
use spots_types::Item;

/// Relationship between the old and new item at one index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemDiff {
    /// Nothing the view cares about changed.
    None,
    /// The renderer kind changed; the row must be reloaded.
    Kind,
    /// The size changed; the row must be reloaded for layout.
    Size,
    /// Child relations changed.
    Children,
    /// A content-equal item moved from one index to another.
    Moved { from: usize, to: usize },
    /// The index only exists in the new collection.
    New,
    /// The index only exists in the old collection.
    Removed,
    /// Content fields changed in place; no structural reload needed.
    Value,
}

impl ItemDiff {
    /// Returns `true` for outcomes that force a full reload of the row.
    pub fn is_reload(&self) -> bool {
        matches!(self, ItemDiff::Kind | ItemDiff::Size)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ItemDiff::None)
    }
}

/// A classification tagged with the index it applies to.
///
/// `New` is indexed in the new collection, `Removed` in the old one, and the
/// in-place outcomes at an index present in both. `Moved` carries its own
/// indices; `index` is its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDiff {
    pub index: usize,
    pub diff: ItemDiff,
}

impl IndexedDiff {
    pub fn new(index: usize, diff: ItemDiff) -> Self {
        Self { index, diff }
    }
}

/// Classify the old/new pair at one index.
///
/// Checks run in a fixed order and the first hit wins, so a kind change
/// masks a simultaneous size change, and any reload masks finer updates.
/// Moves are never produced here; they come from the reconciler's pre-pass.
pub fn classify(old: Option<&Item>, new: Option<&Item>) -> ItemDiff {
    let (old, new) = match (old, new) {
        (None, None) => return ItemDiff::None,
        (None, Some(_)) => return ItemDiff::New,
        (Some(_), None) => return ItemDiff::Removed,
        (Some(old), Some(new)) => (old, new),
    };

    if old.kind != new.kind {
        ItemDiff::Kind
    } else if old.size != new.size {
        ItemDiff::Size
    } else if !old.relations_eq(new) {
        ItemDiff::Children
    } else if !old.content_eq(new) {
        ItemDiff::Value
    } else {
        ItemDiff::None
    }
}
