use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::signature::ContentSignature;

/// Width/height pair in points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// A zero-area size.
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are zero.
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// One row/cell record in a list, grid, or carousel.
///
/// Items have no stable identity: within a collection they are addressed by
/// position only. Comparison happens at two granularities:
///
/// - [`content_eq`](Item::content_eq): title, subtitle, image, kind, action
/// - [`exact_eq`](Item::exact_eq): content plus size
///
/// The derived `PartialEq` is plain structural equality over every field
/// (including `index` and `meta`) and is not used by the diff engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Position within the owning component. Maintained by [`Component`](crate::Component).
    #[serde(skip)]
    pub index: usize,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    /// Opaque tag selecting the renderer for this item.
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub size: Size,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, Vec<Item>>,
}

impl Item {
    /// Create an item with the given title and every other field empty.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    pub fn with_relation(mut self, key: impl Into<String>, children: Vec<Item>) -> Self {
        self.relations.insert(key.into(), children);
        self
    }

    /// Content equality: title, subtitle, image, kind, and action.
    pub fn content_eq(&self, other: &Item) -> bool {
        self.title == other.title
            && self.subtitle == other.subtitle
            && self.image == other.image
            && self.kind == other.kind
            && self.action == other.action
    }

    /// Exact equality: content equality plus size.
    pub fn exact_eq(&self, other: &Item) -> bool {
        self.content_eq(other) && self.size == other.size
    }

    /// Compare relations: same keys, same child counts, children content-equal.
    pub fn relations_eq(&self, other: &Item) -> bool {
        self.relations.len() == other.relations.len()
            && self.relations.iter().all(|(key, children)| {
                other.relations.get(key).is_some_and(|theirs| {
                    children.len() == theirs.len()
                        && children.iter().zip(theirs).all(|(a, b)| a.content_eq(b))
                })
            })
    }

    /// Hash of the content-equal fields.
    pub fn content_signature(&self) -> ContentSignature {
        ContentSignature::of(self)
    }

    /// Typed meta lookup with a fallback for missing or mistyped values.
    pub fn meta_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.meta_as(key).unwrap_or(default)
    }

    /// Typed meta lookup. Returns `None` if the key is missing or the value
    /// does not deserialize into `T`.
    pub fn meta_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.meta
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// The child at `index` under relation `key`, if present.
    pub fn relation(&self, key: &str, index: usize) -> Option<&Item> {
        self.relations.get(key).and_then(|children| children.get(index))
    }
}
