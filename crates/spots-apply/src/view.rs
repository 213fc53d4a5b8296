use std::fmt;

use serde::{Deserialize, Serialize};
use spots_types::{Fingerprint, Item};

use crate::error::ViewResult;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A single view primitive issued by the applier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Delete,
    Insert,
    MoveOut,
    MoveIn,
    Reload,
    Update,
    ChildUpdate,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Delete => "delete",
            Operation::Insert => "insert",
            Operation::MoveOut => "move-out",
            Operation::MoveIn => "move-in",
            Operation::Reload => "reload",
            Operation::Update => "update",
            Operation::ChildUpdate => "child-update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ViewCollection
// ---------------------------------------------------------------------------

/// A live list/grid view the applier can mutate.
///
/// Implemented by the host platform over its native collection view. The
/// applier brackets every batch with [`begin_updates`](Self::begin_updates)
/// and [`end_updates`](Self::end_updates) and issues primitives in an order
/// where each index is valid for the view's state at the time of the call.
///
/// Implementations should return [`ViewError::OutOfRange`](crate::ViewError)
/// rather than panic on a bad index, and
/// [`ViewError::MissingView`](crate::ViewError) when no renderer exists for
/// an item's kind.
pub trait ViewCollection {
    /// Number of rows the view currently shows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fingerprint of the rows the view currently shows.
    ///
    /// Hosts that can compute it get idempotent, stale-safe applies. Without
    /// it the applier can only compare lengths.
    fn fingerprint(&self) -> Option<Fingerprint> {
        None
    }

    fn begin_updates(&mut self) {}

    fn end_updates(&mut self) {}

    fn delete_row(&mut self, index: usize) -> ViewResult<()>;

    fn insert_row(&mut self, index: usize, item: &Item) -> ViewResult<()>;

    /// Detach the row at `from` as the first half of a move.
    fn move_out(&mut self, from: usize) -> ViewResult<()> {
        self.delete_row(from)
    }

    /// Attach the row that left `from` at `to`, showing `item`.
    ///
    /// `from` is an index in the old snapshot and is only informational by
    /// the time this runs; hosts with native moves can use it to pair the
    /// two halves.
    fn move_in(&mut self, from: usize, to: usize, item: &Item) -> ViewResult<()> {
        let _ = from;
        self.insert_row(to, item)
    }

    /// Fully re-render the row at `index`.
    fn reload_row(&mut self, index: usize, item: &Item) -> ViewResult<()>;

    /// Refresh the row's fields in place.
    fn update_row(&mut self, index: usize, item: &Item) -> ViewResult<()> {
        self.reload_row(index, item)
    }

    /// Refresh the row's children in place.
    fn update_children(&mut self, index: usize, item: &Item) -> ViewResult<()> {
        self.update_row(index, item)
    }
}
