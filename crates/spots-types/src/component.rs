use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TypeError, TypeResult};
use crate::item::{Item, Size};
use crate::signature::Fingerprint;

/// Descriptor for a header or footer view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Supplementary {
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    pub title: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, Value>,
}

impl Supplementary {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
}

/// Container for an ordered item collection plus display metadata.
///
/// A component is owned by the hosting screen. Its items are only replaced
/// through reconciliation; UI callbacks read from it but never write.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Component {
    pub title: String,
    /// Default renderer kind for items that leave `kind` empty.
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Supplementary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Supplementary>,
    /// Number of items per row/page. Zero means "not spanned".
    pub span: f64,
    pub size: Size,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, Value>,
    pub items: Vec<Item>,
}

impl Component {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_span(mut self, span: f64) -> Self {
        self.span = span;
        self
    }

    pub fn with_header(mut self, header: Supplementary) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_footer(mut self, footer: Supplementary) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.set_items(items);
        self
    }

    /// Replace the item collection and re-number item indices.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.reindex();
    }

    /// Make every item's `index` match its position.
    pub fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.index = index;
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    /// Reuse identifier for the item at `index`: the item's kind, or the
    /// component's default kind when the item leaves it empty.
    pub fn identifier(&self, index: usize) -> Option<&str> {
        self.item(index).map(|item| {
            if item.kind.is_empty() {
                self.kind.as_str()
            } else {
                item.kind.as_str()
            }
        })
    }

    /// Typed meta lookup with a fallback for missing or mistyped values.
    pub fn meta_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.meta_as(key).unwrap_or(default)
    }

    pub fn meta_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.meta
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Fingerprint of the current item snapshot.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.items)
    }

    /// Decode a component from JSON. Item indices are re-numbered.
    pub fn from_json(json: &str) -> TypeResult<Self> {
        let mut component: Component =
            serde_json::from_str(json).map_err(|e| TypeError::Serialization(e.to_string()))?;
        component.reindex();
        Ok(component)
    }

    pub fn to_json(&self) -> TypeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
