use serde::{Deserialize, Serialize};

/// What to do with a reconciliation whose base snapshot no longer matches
/// the live view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Leave the view untouched. The host is expected to reconcile again
    /// from what the view shows now.
    #[default]
    Reject,
    /// Range-check every index against the current view and apply what
    /// still fits.
    Revalidate,
}

/// Configuration for the [`Applier`](crate::Applier).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Handling of reconciliations computed against an outdated snapshot.
    pub stale_policy: StalePolicy,
    /// When `true`, an empty change set returns immediately without opening
    /// a batch on the view.
    pub skip_empty: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            stale_policy: StalePolicy::Reject,
            skip_empty: true,
        }
    }
}

impl ApplyConfig {
    /// Apply whatever still fits, even against a view that moved on.
    pub fn lenient() -> Self {
        Self {
            stale_policy: StalePolicy::Revalidate,
            ..Default::default()
        }
    }
}
