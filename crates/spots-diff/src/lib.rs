//! Diff engine for Spots.
//!
//! Compares two ordered item collections and produces the structural changes
//! that turn one into the other. Everything in this crate is pure: it reads
//! two immutable snapshots and never touches a view, so it is safe to run on
//! any thread.
//!
//! # Key Types
//!
//! - [`ItemDiff`] / [`classify`] -- Per-index classification of an old/new item pair
//! - [`Changes`] -- Index buckets (insertions, deletions, reloads, updates, child updates) plus moves
//! - [`Reconciliation`] / [`reconcile`] -- Full old-to-new reconciliation with snapshot fingerprints
//! - [`MatchStrategy`] -- How items are correlated across snapshots ([`ContentMatch`], [`KeyedMatch`])
//!
//! # Identity
//!
//! Items carry no stable identity by default. Move detection correlates items
//! by content equality, so two content-equal items are indistinguishable and
//! the leftmost unused candidate always wins. Hosts that do have stable ids
//! can store them in item meta and use [`KeyedMatch`].

pub mod changes;
pub mod item_diff;
pub mod reconcile;
pub mod strategy;

pub use changes::Changes;
pub use item_diff::{classify, IndexedDiff, ItemDiff};
pub use reconcile::{reconcile, AmbiguousMatch, Reconciler, Reconciliation};
pub use strategy::{ContentMatch, KeyedMatch, MatchKey, MatchStrategy};
