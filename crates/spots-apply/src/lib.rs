//! Reconciliation applier for Spots.
//!
//! Takes the [`Changes`](spots_diff::Changes) produced by the diff engine and
//! drives a live view collection through them in one batch. The live view is
//! the host platform's business; it is reached through the
//! [`ViewCollection`] trait.
//!
//! # Guarantees
//!
//! 1. Every index is re-checked against the view's *current* length before it
//!    is used. Out-of-range indices are dropped and reported, never raised.
//! 2. Within a batch, deletions and moves-out run highest index first, then
//!    insertions and moves-in lowest index first, then in-place refreshes.
//! 3. A missing renderer skips that one index; the rest of the batch runs.
//! 4. A reconciliation is only applied against the snapshot it was computed
//!    from. Applying it again, or against a view that moved on, is a no-op or
//!    a rejection depending on [`ApplyConfig`].
//!
//! The applier mutates view state and is meant to run on the sequence that
//! owns the view. Nothing here is synchronised.

pub mod applier;
pub mod config;
pub mod error;
pub mod memory;
pub mod registry;
pub mod view;

pub use applier::{validate, ApplyOutcome, ApplyReport, Applier, Validated};
pub use config::{ApplyConfig, StalePolicy};
pub use error::{ApplyIssue, ViewError, ViewResult};
pub use memory::{InMemoryView, Row};
pub use registry::{FixedSize, ItemRenderer, Renderer, RendererRegistry};
pub use view::{Operation, ViewCollection};
