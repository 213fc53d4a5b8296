use serde::Serialize;

use crate::view::Operation;

/// Errors a [`ViewCollection`](crate::ViewCollection) primitive can report.
///
/// None of these abort a batch: the applier turns them into
/// [`ApplyIssue`]s and moves on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// No renderer is registered for the item's kind.
    #[error("no renderer registered for kind {kind:?}")]
    MissingView { kind: String },

    /// The index does not exist in the view.
    #[error("index {index} out of range for {len} rows")]
    OutOfRange { index: usize, len: usize },
}

/// Result alias for view primitives.
pub type ViewResult<T> = Result<T, ViewError>;

/// A non-fatal problem met while validating or applying changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApplyIssue {
    /// The index no longer fits the live collection and was dropped.
    OutOfRangeIndex {
        operation: Operation,
        index: usize,
        len: usize,
    },
    /// No renderer was found; the row kept its previous content.
    MissingView {
        operation: Operation,
        index: usize,
        kind: String,
    },
}

impl ApplyIssue {
    pub(crate) fn from_view_error(operation: Operation, index: usize, err: ViewError) -> Self {
        match err {
            ViewError::MissingView { kind } => ApplyIssue::MissingView {
                operation,
                index,
                kind,
            },
            ViewError::OutOfRange { index, len } => ApplyIssue::OutOfRangeIndex {
                operation,
                index,
                len,
            },
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ApplyIssue::OutOfRangeIndex { index, .. } | ApplyIssue::MissingView { index, .. } => {
                *index
            }
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ApplyIssue::OutOfRangeIndex { operation, .. }
            | ApplyIssue::MissingView { operation, .. } => *operation,
        }
    }
}

impl std::fmt::Display for ApplyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyIssue::OutOfRangeIndex {
                operation,
                index,
                len,
            } => write!(f, "{operation} at {index} dropped: out of range for {len} rows"),
            ApplyIssue::MissingView {
                operation,
                index,
                kind,
            } => write!(f, "{operation} at {index} skipped: no renderer for {kind:?}"),
        }
    }
}
