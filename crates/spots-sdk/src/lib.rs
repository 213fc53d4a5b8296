//! High-level API for Spots.
//!
//! A [`Spot`] owns one component and keeps the view that shows it in step:
//! mutate the model, then [`flush`](Spot::flush) the staged reconciliation to
//! the view. Shared settings live in [`SpotsConfig`].

pub mod config;
pub mod error;
pub mod spot;

pub use config::SpotsConfig;
pub use error::{SdkError, SdkResult};
pub use spot::{Matching, Spot};

// Re-export key types
pub use spots_apply::{
    ApplyConfig, ApplyIssue, ApplyOutcome, ApplyReport, InMemoryView, Renderer, RendererRegistry,
    StalePolicy, ViewCollection,
};
pub use spots_diff::{Changes, Reconciliation};
pub use spots_store::{ComponentCache, FileComponentCache, InMemoryComponentCache};
pub use spots_types::{Component, Item, Size};
