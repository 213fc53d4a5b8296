use std::collections::BTreeSet;

use serde::Serialize;
use spots_diff::{Changes, Reconciliation};
use spots_types::{Fingerprint, Item};
use tracing::{debug, warn};

use crate::config::{ApplyConfig, StalePolicy};
use crate::error::{ApplyIssue, ViewResult};
use crate::view::{Operation, ViewCollection};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Changes that survived [`validate`], plus what was dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validated {
    pub changes: Changes,
    pub issues: Vec<ApplyIssue>,
}

fn out_of_range(operation: Operation, index: usize, len: usize) -> ApplyIssue {
    warn!(operation = %operation, index, len, "dropping out-of-range index");
    ApplyIssue::OutOfRangeIndex {
        operation,
        index,
        len,
    }
}

/// Re-check every index in `changes` against a collection of
/// `collection_size` rows.
///
/// Deletions, move sources, and in-place indices must exist in the
/// collection. Insertions and move targets must fit the collection that
/// results from applying the surviving changes, and may not collide.
/// Anything else is dropped and reported as
/// [`ApplyIssue::OutOfRangeIndex`].
pub fn validate(changes: &Changes, collection_size: usize) -> Validated {
    let mut issues = Vec::new();
    let mut valid = Changes::new();

    for &index in &changes.deletions {
        if index < collection_size {
            valid.deletions.insert(index);
        } else {
            issues.push(out_of_range(Operation::Delete, index, collection_size));
        }
    }

    let mut targets = BTreeSet::new();
    for (&from, &to) in &changes.moved {
        if from >= collection_size || valid.deletions.contains(&from) {
            issues.push(out_of_range(Operation::MoveOut, from, collection_size));
        } else if changes.insertions.contains(&to) || !targets.insert(to) {
            issues.push(out_of_range(
                Operation::MoveIn,
                to,
                changes.resulting_len(collection_size),
            ));
        } else {
            valid.moved.insert(from, to);
        }
    }

    // Dropping an insertion shrinks the result, which can push other
    // targets out of range; repeat until nothing else drops.
    let mut insertions = changes.insertions.clone();
    let final_len = loop {
        let survivors = collection_size
            .saturating_sub(valid.deletions.len())
            .saturating_sub(valid.moved.len());
        let final_len = survivors + insertions.len() + valid.moved.len();

        let bad_insertions: Vec<usize> = insertions.range(final_len..).copied().collect();
        let bad_moves: Vec<usize> = valid
            .moved
            .iter()
            .filter(|(_, to)| **to >= final_len)
            .map(|(from, _)| *from)
            .collect();

        if bad_insertions.is_empty() && bad_moves.is_empty() {
            break final_len;
        }
        for index in bad_insertions {
            insertions.remove(&index);
            issues.push(out_of_range(Operation::Insert, index, final_len));
        }
        for from in bad_moves {
            if let Some(to) = valid.moved.remove(&from) {
                issues.push(out_of_range(Operation::MoveIn, to, final_len));
            }
        }
    };
    valid.insertions = insertions;

    let in_place_limit = collection_size.min(final_len);
    let buckets = [
        (&changes.reloads, &mut valid.reloads, Operation::Reload),
        (&changes.updates, &mut valid.updates, Operation::Update),
        (
            &changes.child_updates,
            &mut valid.child_updates,
            Operation::ChildUpdate,
        ),
    ];
    for (source, dest, operation) in buckets {
        for &index in source {
            if index < in_place_limit {
                dest.insert(index);
            } else {
                issues.push(out_of_range(operation, index, in_place_limit));
            }
        }
    }

    Validated {
        changes: valid,
        issues,
    }
}

// ---------------------------------------------------------------------------
// ApplyReport
// ---------------------------------------------------------------------------

/// How an apply call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// A batch ran against the view.
    Applied,
    /// There was nothing to apply.
    Unchanged,
    /// The view already shows the target snapshot.
    AlreadyApplied,
    /// The reconciliation no longer matches the view or the items; nothing
    /// was touched.
    Rejected,
}

/// Result of applying changes to a view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub outcome: ApplyOutcome,
    /// Number of primitives the view accepted.
    pub applied: usize,
    /// Indices that were dropped or skipped.
    pub issues: Vec<ApplyIssue>,
}

impl ApplyReport {
    fn without_batch(outcome: ApplyOutcome) -> Self {
        Self {
            outcome,
            applied: 0,
            issues: Vec::new(),
        }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome == ApplyOutcome::Applied
    }

    /// Returns `true` if no index was dropped or skipped.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Applier
// ---------------------------------------------------------------------------

/// Drives a [`ViewCollection`] through a set of changes.
#[derive(Clone, Debug, Default)]
pub struct Applier {
    config: ApplyConfig,
}

struct Batch<'a, V: ?Sized> {
    view: &'a mut V,
    applied: usize,
    issues: Vec<ApplyIssue>,
}

impl<V: ViewCollection + ?Sized> Batch<'_, V> {
    fn record(&mut self, operation: Operation, index: usize, result: ViewResult<()>) -> bool {
        match result {
            Ok(()) => {
                self.applied += 1;
                true
            }
            Err(err) => {
                warn!(operation = %operation, index, error = %err, "skipping view update");
                self.issues
                    .push(ApplyIssue::from_view_error(operation, index, err));
                false
            }
        }
    }

    /// Range check for primitives that address an existing row.
    fn existing(&mut self, operation: Operation, index: usize) -> bool {
        let len = self.view.len();
        if index < len {
            true
        } else {
            self.issues.push(out_of_range(operation, index, len));
            false
        }
    }

    /// Range check for primitives that place a new row.
    fn placeable<'i>(
        &mut self,
        operation: Operation,
        index: usize,
        items: &'i [Item],
    ) -> Option<&'i Item> {
        let len = self.view.len();
        if index > len {
            self.issues.push(out_of_range(operation, index, len));
            return None;
        }
        self.item(operation, index, items)
    }

    fn item<'i>(&mut self, operation: Operation, index: usize, items: &'i [Item]) -> Option<&'i Item> {
        let item = items.get(index);
        if item.is_none() {
            self.issues.push(out_of_range(operation, index, items.len()));
        }
        item
    }
}

impl Applier {
    pub fn new(config: ApplyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApplyConfig {
        &self.config
    }

    /// Apply `changes` to `view`, reading new content from `items`.
    ///
    /// `items` is the new snapshot the changes lead to. Indices are validated
    /// against the view's current length first and range-checked again as
    /// each primitive runs.
    pub fn apply_changes<V>(&self, changes: &Changes, items: &[Item], view: &mut V) -> ApplyReport
    where
        V: ViewCollection + ?Sized,
    {
        if changes.is_empty() && self.config.skip_empty {
            return ApplyReport::without_batch(ApplyOutcome::Unchanged);
        }

        let Validated { changes, issues } = validate(changes, view.len());
        let mut batch = Batch {
            view,
            applied: 0,
            issues,
        };

        batch.view.begin_updates();

        // Deletions and moves-out, highest index first.
        let mut removals: Vec<(usize, Option<usize>)> = changes
            .deletions
            .iter()
            .map(|&index| (index, None))
            .chain(changes.moved.iter().map(|(&from, &to)| (from, Some(to))))
            .collect();
        removals.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        let mut detached = Vec::with_capacity(changes.moved.len());
        for (index, move_to) in removals {
            match move_to {
                None => {
                    if batch.existing(Operation::Delete, index) {
                        let result = batch.view.delete_row(index);
                        batch.record(Operation::Delete, index, result);
                    }
                }
                Some(to) => {
                    if batch.existing(Operation::MoveOut, index) {
                        let result = batch.view.move_out(index);
                        if batch.record(Operation::MoveOut, index, result) {
                            detached.push((to, Some(index)));
                        }
                    }
                }
            }
        }

        // Insertions and moves-in, lowest index first.
        let mut placements: Vec<(usize, Option<usize>)> = changes
            .insertions
            .iter()
            .map(|&index| (index, None))
            .chain(detached)
            .collect();
        placements.sort_unstable_by_key(|(index, _)| *index);

        for (index, moved_from) in placements {
            let operation = match moved_from {
                Some(_) => Operation::MoveIn,
                None => Operation::Insert,
            };
            let Some(item) = batch.placeable(operation, index, items) else {
                continue;
            };
            let result = match moved_from {
                Some(from) => batch.view.move_in(from, index, item),
                None => batch.view.insert_row(index, item),
            };
            batch.record(operation, index, result);
        }

        // In-place refreshes.
        let refreshes = [
            (&changes.reloads, Operation::Reload),
            (&changes.updates, Operation::Update),
            (&changes.child_updates, Operation::ChildUpdate),
        ];
        for (indices, operation) in refreshes {
            for &index in indices {
                if !batch.existing(operation, index) {
                    continue;
                }
                let Some(item) = batch.item(operation, index, items) else {
                    continue;
                };
                let result = match operation {
                    Operation::Reload => batch.view.reload_row(index, item),
                    Operation::Update => batch.view.update_row(index, item),
                    _ => batch.view.update_children(index, item),
                };
                batch.record(operation, index, result);
            }
        }

        batch.view.end_updates();

        debug!(
            applied = batch.applied,
            issues = batch.issues.len(),
            rows = batch.view.len(),
            "applied changes"
        );

        ApplyReport {
            outcome: ApplyOutcome::Applied,
            applied: batch.applied,
            issues: batch.issues,
        }
    }

    /// Apply a reconciliation, guarding against stale or repeated applies.
    ///
    /// `items` must be the snapshot the reconciliation targets. The view must
    /// show the snapshot it was computed from; a view that already shows the
    /// target is left alone, and any other view is handled per
    /// [`StalePolicy`].
    pub fn apply<V>(&self, reconciliation: &Reconciliation, items: &[Item], view: &mut V) -> ApplyReport
    where
        V: ViewCollection + ?Sized,
    {
        if Fingerprint::of(items) != reconciliation.target {
            warn!(
                items = items.len(),
                expected = reconciliation.new_len,
                "items do not match the reconciliation target"
            );
            return ApplyReport::without_batch(ApplyOutcome::Rejected);
        }

        let on_base = match view.fingerprint() {
            Some(current) if current == reconciliation.target => {
                let outcome = if reconciliation.is_empty() {
                    ApplyOutcome::Unchanged
                } else {
                    ApplyOutcome::AlreadyApplied
                };
                debug!(fingerprint = %reconciliation.target.short_hex(), "view already at target");
                return ApplyReport::without_batch(outcome);
            }
            Some(current) => current == reconciliation.base,
            None => view.len() == reconciliation.old_len,
        };

        if !on_base {
            match self.config.stale_policy {
                StalePolicy::Reject => {
                    warn!(
                        rows = view.len(),
                        expected = reconciliation.old_len,
                        "stale reconciliation rejected"
                    );
                    return ApplyReport::without_batch(ApplyOutcome::Rejected);
                }
                StalePolicy::Revalidate => {
                    warn!(
                        rows = view.len(),
                        expected = reconciliation.old_len,
                        "applying stale reconciliation after revalidation"
                    );
                }
            }
        }

        self.apply_changes(&reconciliation.changes, items, view)
    }
}
