//! Component caching for Spots.
//!
//! A cached component is only ever used as the "old" snapshot of the next
//! reconciliation: load it, show it, then diff against fresh data.
//!
//! # Backends
//!
//! All backends implement the [`ComponentCache`] trait:
//!
//! - [`InMemoryComponentCache`] -- `HashMap`-based cache for tests and embedding
//! - [`FileComponentCache`] -- one JSON file per key under a directory
//!
//! # Rules
//!
//! 1. Keys are plain names. Anything that could escape the cache directory
//!    is refused with [`StoreError::InvalidKey`].
//! 2. A missing entry is `Ok(None)`, never an error.
//! 3. All I/O errors are propagated.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileComponentCache;
pub use memory::InMemoryComponentCache;
pub use traits::{validate_key, ComponentCache};
