//! Old-to-new reconciliation of two ordered item collections.
//!
//! Runs in three passes over the snapshots:
//!
//! 1. Index `old` by match key, one queue of positions per key.
//! 2. Walk `new` and let every item claim the leftmost unconsumed old match.
//!    A claim at the same position is classified in place; anywhere else it
//!    is a move.
//! 3. Unclaimed new items pair with the unconsumed old item at the same
//!    position and are classified in place, or become insertions. Old items
//!    still unconsumed afterwards are deletions.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use spots_types::{Fingerprint, Item};
use tracing::debug;

use crate::changes::Changes;
use crate::item_diff::{classify, IndexedDiff, ItemDiff};
use crate::strategy::{ContentMatch, MatchStrategy};

/// A new item that had several equally good old candidates.
///
/// Resolved by taking the lowest unused old index; recorded for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousMatch {
    pub new_index: usize,
    pub chosen: usize,
    pub candidates: usize,
}

/// The outcome of reconciling an old snapshot with a new one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Per-index classifications in merged index order.
    pub diffs: Vec<IndexedDiff>,
    pub changes: Changes,
    pub old_len: usize,
    pub new_len: usize,
    /// Fingerprint of the old snapshot.
    pub base: Fingerprint,
    /// Fingerprint of the new snapshot.
    pub target: Fingerprint,
    pub ambiguous: Vec<AmbiguousMatch>,
}

impl Reconciliation {
    /// Returns `true` if the snapshots are equivalent for the view.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Reconcile two snapshots using content identity.
pub fn reconcile(old: &[Item], new: &[Item]) -> Reconciliation {
    Reconciler::new(ContentMatch).reconcile(old, new)
}

/// Reconciliation engine parameterised by a [`MatchStrategy`].
#[derive(Clone, Debug, Default)]
pub struct Reconciler<S = ContentMatch> {
    strategy: S,
}

impl<S: MatchStrategy> Reconciler<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Compute the changes that turn `old` into `new`.
    pub fn reconcile(&self, old: &[Item], new: &[Item]) -> Reconciliation {
        let mut positions: HashMap<S::Key, VecDeque<usize>> = HashMap::new();
        for (index, item) in old.iter().enumerate() {
            positions
                .entry(self.strategy.key(item))
                .or_default()
                .push_back(index);
        }

        let mut consumed = vec![false; old.len()];
        let mut claimed: Vec<Option<usize>> = vec![None; new.len()];
        let mut ambiguous = Vec::new();

        for (new_index, item) in new.iter().enumerate() {
            let Some(queue) = positions.get_mut(&self.strategy.key(item)) else {
                continue;
            };
            let mut candidates = queue
                .iter()
                .enumerate()
                .filter(|(_, old_index)| self.strategy.matches(&old[**old_index], item));
            let Some((slot, &chosen)) = candidates.next() else {
                continue;
            };
            let others = candidates.count();
            queue.remove(slot);
            consumed[chosen] = true;
            claimed[new_index] = Some(chosen);

            if others > 0 {
                debug!(new_index, chosen, candidates = others + 1, "ambiguous match, took leftmost");
                ambiguous.push(AmbiguousMatch {
                    new_index,
                    chosen,
                    candidates: others + 1,
                });
            }
        }

        let mut diffs = Vec::with_capacity(old.len().max(new.len()));
        for index in 0..old.len().max(new.len()) {
            if let Some(item) = new.get(index) {
                let diff = match claimed[index] {
                    Some(from) if from == index => classify(Some(&old[from]), Some(item)),
                    Some(from) => ItemDiff::Moved { from, to: index },
                    None if index < old.len() && !consumed[index] => {
                        consumed[index] = true;
                        classify(Some(&old[index]), Some(item))
                    }
                    None => ItemDiff::New,
                };
                diffs.push(IndexedDiff::new(index, diff));
            }
            if index < old.len() && !consumed[index] {
                diffs.push(IndexedDiff::new(index, ItemDiff::Removed));
            }
        }

        let changes = Changes::aggregate(diffs.iter().copied());

        debug!(
            old_len = old.len(),
            new_len = new.len(),
            insertions = changes.insertions.len(),
            deletions = changes.deletions.len(),
            moves = changes.moved.len(),
            reloads = changes.reloads.len(),
            updates = changes.updates.len(),
            child_updates = changes.child_updates.len(),
            "reconciled snapshots"
        );

        Reconciliation {
            diffs,
            changes,
            old_len: old.len(),
            new_len: new.len(),
            base: Fingerprint::of(old),
            target: Fingerprint::of(new),
            ambiguous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::KeyedMatch;
    use serde_json::json;
    use spots_types::Size;
    use std::collections::{BTreeMap, BTreeSet};

    fn items(titles: &[&str]) -> Vec<Item> {
        titles.iter().map(|t| Item::new(*t).with_kind("text")).collect()
    }

    fn set(indices: &[usize]) -> BTreeSet<usize> {
        indices.iter().copied().collect()
    }

    #[test]
    fn identical_collections_have_no_changes() {
        let a = items(&["a", "b", "c"]);
        let rec = reconcile(&a, &a);
        assert!(rec.is_empty());
        assert_eq!(rec.base, rec.target);
        assert!(rec.diffs.iter().all(|d| d.diff.is_none()));
    }

    #[test]
    fn rotation_is_detected_as_moves() {
        let rec = reconcile(&items(&["a", "b", "c"]), &items(&["c", "a", "b"]));
        assert_eq!(rec.changes.moved, BTreeMap::from([(0, 1), (1, 2), (2, 0)]));
        assert!(rec.changes.insertions.is_empty());
        assert!(rec.changes.deletions.is_empty());
        assert_eq!(rec.changes.len(), 3);
    }

    #[test]
    fn kind_change_forces_reload() {
        let old = vec![Item::new("x").with_kind("text")];
        let new = vec![Item::new("x").with_kind("image")];
        let rec = reconcile(&old, &new);
        assert_eq!(rec.changes.reloads, set(&[0]));
        assert!(rec.changes.updates.is_empty());
        assert!(rec.changes.insertions.is_empty());
        assert!(rec.changes.deletions.is_empty());
    }

    #[test]
    fn pure_insertion() {
        let rec = reconcile(&[], &items(&["x", "y"]));
        assert_eq!(rec.changes.insertions, set(&[0, 1]));
        assert_eq!(rec.changes.len(), 2);
    }

    #[test]
    fn pure_deletion() {
        let rec = reconcile(&items(&["x", "y"]), &[]);
        assert_eq!(rec.changes.deletions, set(&[0, 1]));
        assert_eq!(rec.changes.len(), 2);
    }

    #[test]
    fn edited_title_is_value_update() {
        let rec = reconcile(&items(&["a", "b"]), &items(&["a", "B"]));
        assert_eq!(rec.changes.updates, set(&[1]));
        assert_eq!(rec.changes.len(), 1);
    }

    #[test]
    fn resize_in_place_is_reload() {
        let old = items(&["a", "b"]);
        let mut new = old.clone();
        new[1].size = Size::new(320.0, 88.0);
        let rec = reconcile(&old, &new);
        assert_eq!(rec.changes.reloads, set(&[1]));
        assert_eq!(rec.changes.len(), 1);
    }

    #[test]
    fn child_change_in_place() {
        let old = vec![Item::new("album").with_relation("tracks", items(&["one"]))];
        let new = vec![Item::new("album").with_relation("tracks", items(&["one", "two"]))];
        let rec = reconcile(&old, &new);
        assert_eq!(rec.changes.child_updates, set(&[0]));
    }

    #[test]
    fn append_keeps_existing_rows() {
        let rec = reconcile(&items(&["a", "b"]), &items(&["a", "b", "c", "d"]));
        assert_eq!(rec.changes.insertions, set(&[2, 3]));
        assert_eq!(rec.changes.len(), 2);
    }

    #[test]
    fn prepend_shifts_existing_rows_as_moves() {
        let rec = reconcile(&items(&["a", "b"]), &items(&["x", "a", "b"]));
        assert_eq!(rec.changes.insertions, set(&[0]));
        assert_eq!(rec.changes.moved, BTreeMap::from([(0, 1), (1, 2)]));
        assert!(rec.changes.deletions.is_empty());
    }

    #[test]
    fn replaced_row_with_shift() {
        // "b" leaves, "x" arrives at the front, "a" shifts right.
        let rec = reconcile(&items(&["a", "b"]), &items(&["x", "a"]));
        assert_eq!(rec.changes.insertions, set(&[0]));
        assert_eq!(rec.changes.deletions, set(&[1]));
        assert_eq!(rec.changes.moved, BTreeMap::from([(0, 1)]));
    }

    #[test]
    fn duplicates_match_leftmost_first() {
        let rec = reconcile(&items(&["a", "a", "b"]), &items(&["b", "a"]));
        assert_eq!(rec.changes.moved, BTreeMap::from([(2, 0), (0, 1)]));
        assert_eq!(rec.changes.deletions, set(&[1]));
        assert_eq!(
            rec.ambiguous,
            vec![AmbiguousMatch {
                new_index: 1,
                chosen: 0,
                candidates: 2
            }]
        );
    }

    #[test]
    fn diffs_are_in_merged_index_order() {
        let rec = reconcile(&items(&["a", "b", "c"]), &items(&["a"]));
        let indices: Vec<usize> = rec.diffs.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(rec.diffs[1].diff, ItemDiff::Removed);
    }

    #[test]
    fn content_identity_cannot_follow_edited_moves() {
        let old = vec![
            Item::new("first").with_meta("id", json!(1)),
            Item::new("second").with_meta("id", json!(2)),
        ];
        let new = vec![
            Item::new("second (edited)").with_meta("id", json!(2)),
            Item::new("first").with_meta("id", json!(1)),
        ];

        let by_content = reconcile(&old, &new);
        assert_eq!(by_content.changes.moved, BTreeMap::from([(0, 1)]));
        assert_eq!(by_content.changes.insertions, set(&[0]));
        assert_eq!(by_content.changes.deletions, set(&[1]));

        let by_key = Reconciler::new(KeyedMatch::new("id")).reconcile(&old, &new);
        assert_eq!(by_key.changes.moved, BTreeMap::from([(0, 1), (1, 0)]));
        assert!(by_key.changes.insertions.is_empty());
        assert!(by_key.changes.deletions.is_empty());
    }

    #[test]
    fn keyed_match_in_place_edit_is_value_update() {
        let old = vec![Item::new("draft").with_meta("id", json!("p"))];
        let new = vec![Item::new("final").with_meta("id", json!("p"))];
        let rec = Reconciler::new(KeyedMatch::new("id")).reconcile(&old, &new);
        assert_eq!(rec.changes.updates, set(&[0]));
    }

    #[test]
    fn reconciler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Reconciler>();
        assert_send_sync::<Reconciler<KeyedMatch>>();
        assert_send_sync::<Reconciliation>();
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_item() -> impl Strategy<Value = Item> {
            (
                prop::sample::select(vec!["a", "b", "c", "d"]),
                prop::sample::select(vec!["text", "image"]),
                prop::sample::select(vec![0.0, 44.0]),
            )
                .prop_map(|(title, kind, height)| {
                    Item::new(title)
                        .with_kind(kind)
                        .with_size(Size::new(0.0, height))
                })
        }

        fn arb_items() -> impl Strategy<Value = Vec<Item>> {
            prop::collection::vec(arb_item(), 0..12)
        }

        proptest! {
            #[test]
            fn self_reconciliation_is_empty(a in arb_items()) {
                prop_assert!(reconcile(&a, &a).changes.is_empty());
            }

            #[test]
            fn every_index_is_accounted_for_once(a in arb_items(), b in arb_items()) {
                let rec = reconcile(&a, &b);
                let c = &rec.changes;

                let paired: BTreeSet<usize> = rec
                    .diffs
                    .iter()
                    .filter(|d| !matches!(d.diff, ItemDiff::New | ItemDiff::Removed | ItemDiff::Moved { .. }))
                    .map(|d| d.index)
                    .collect();

                // Old side: deletions, move sources, and in-place pairs partition 0..old_len.
                let mut old_seen = vec![0usize; a.len()];
                for &i in c.deletions.iter().chain(c.moved.keys()).chain(paired.iter()) {
                    old_seen[i] += 1;
                }
                prop_assert!(old_seen.iter().all(|&n| n == 1));

                // New side: insertions, move targets, and in-place pairs partition 0..new_len.
                let mut new_seen = vec![0usize; b.len()];
                for &i in c.insertions.iter().chain(c.moved.values()).chain(paired.iter()) {
                    new_seen[i] += 1;
                }
                prop_assert!(new_seen.iter().all(|&n| n == 1));

                // In-place buckets never overlap.
                prop_assert!(c.reloads.is_disjoint(&c.updates));
                prop_assert!(c.reloads.is_disjoint(&c.child_updates));
                prop_assert!(c.updates.is_disjoint(&c.child_updates));
            }

            #[test]
            fn moves_only_connect_content_equal_items(a in arb_items(), b in arb_items()) {
                let rec = reconcile(&a, &b);
                for (&from, &to) in &rec.changes.moved {
                    prop_assert!(a[from].content_eq(&b[to]));
                    prop_assert_ne!(from, to);
                }
            }
        }
    }
}
