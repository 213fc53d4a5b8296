//! Foundation types for Spots.
//!
//! This crate provides the data model that every other Spots crate works on:
//! the item view-models rendered by a component, the component container
//! itself, and the hashes used to compare snapshots of both.
//!
//! # Key Types
//!
//! - [`Item`] -- One row/cell record: content fields, size, meta, and child relations
//! - [`Size`] -- Width/height pair carried by items and components
//! - [`Component`] -- Ordered items plus display metadata (kind, title, header/footer, span)
//! - [`ContentSignature`] -- BLAKE3 hash of an item's content-equal fields
//! - [`Fingerprint`] -- BLAKE3 hash of an ordered item snapshot

pub mod component;
pub mod error;
pub mod item;
pub mod signature;

pub use component::{Component, Supplementary};
pub use error::{TypeError, TypeResult};
pub use item::{Item, Size};
pub use signature::{ContentSignature, Fingerprint};
