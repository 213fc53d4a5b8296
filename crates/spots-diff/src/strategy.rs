//! How items in the old and new snapshot are correlated.

use std::hash::Hash;

use serde_json::Value;
use spots_types::{ContentSignature, Item};

/// Correlates old and new items for move detection.
///
/// `key` buckets candidates; `matches` confirms a candidate inside a bucket.
/// Two items that `matches` accepts must produce the same `key`.
pub trait MatchStrategy {
    type Key: Hash + Eq;

    fn key(&self, item: &Item) -> Self::Key;

    fn matches(&self, old: &Item, new: &Item) -> bool;
}

/// Positional identity: items correlate when they are content-equal.
///
/// Move detection is only as good as content uniqueness: duplicates are
/// matched leftmost-first and an edited item can never be seen as moved.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentMatch;

impl MatchStrategy for ContentMatch {
    type Key = ContentSignature;

    fn key(&self, item: &Item) -> ContentSignature {
        item.content_signature()
    }

    fn matches(&self, old: &Item, new: &Item) -> bool {
        old.content_eq(new)
    }
}

/// Bucket key produced by [`KeyedMatch`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchKey {
    Stable(String),
    Content(ContentSignature),
}

/// Stable identity read from an item's meta, falling back to content.
///
/// Items that carry the meta key correlate by that key alone, so an item can
/// be edited and moved at once. Items without it behave as in
/// [`ContentMatch`]. A keyed item never matches an unkeyed one.
#[derive(Clone, Debug)]
pub struct KeyedMatch {
    meta_key: String,
}

impl KeyedMatch {
    pub fn new(meta_key: impl Into<String>) -> Self {
        Self {
            meta_key: meta_key.into(),
        }
    }

    pub fn meta_key(&self) -> &str {
        &self.meta_key
    }

    fn stable_id(&self, item: &Item) -> Option<String> {
        match item.meta.get(&self.meta_key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl MatchStrategy for KeyedMatch {
    type Key = MatchKey;

    fn key(&self, item: &Item) -> MatchKey {
        match self.stable_id(item) {
            Some(id) => MatchKey::Stable(id),
            None => MatchKey::Content(item.content_signature()),
        }
    }

    fn matches(&self, old: &Item, new: &Item) -> bool {
        match (self.stable_id(old), self.stable_id(new)) {
            (Some(a), Some(b)) => a == b,
            (None, None) => old.content_eq(new),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_match_ignores_size() {
        let a = Item::new("a");
        let b = Item::new("a").with_size(spots_types::Size::new(1.0, 1.0));
        assert!(ContentMatch.matches(&a, &b));
        assert_eq!(ContentMatch.key(&a), ContentMatch.key(&b));
    }

    #[test]
    fn keyed_match_uses_meta_id() {
        let strategy = KeyedMatch::new("id");
        let old = Item::new("draft").with_meta("id", json!("post-1"));
        let new = Item::new("published").with_meta("id", json!("post-1"));
        assert!(strategy.matches(&old, &new));
        assert_eq!(strategy.key(&old), MatchKey::Stable("post-1".into()));
    }

    #[test]
    fn keyed_match_accepts_numeric_ids() {
        let strategy = KeyedMatch::new("id");
        let item = Item::new("x").with_meta("id", json!(42));
        assert_eq!(strategy.key(&item), MatchKey::Stable("42".into()));
    }

    #[test]
    fn keyed_match_falls_back_to_content() {
        let strategy = KeyedMatch::new("id");
        let a = Item::new("same");
        let b = Item::new("same").with_meta("id", json!(null));
        assert!(strategy.matches(&a, &b));
        assert!(matches!(strategy.key(&a), MatchKey::Content(_)));
    }

    #[test]
    fn keyed_never_matches_unkeyed() {
        let strategy = KeyedMatch::new("id");
        let keyed = Item::new("same").with_meta("id", json!("k"));
        let plain = Item::new("same");
        assert!(!strategy.matches(&keyed, &plain));
    }
}
