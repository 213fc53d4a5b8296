//! `kind → renderer` lookup.
//!
//! The diff engine treats `kind` as an opaque key. Resolving it to something
//! that can lay out an item happens here, through an explicit registry that
//! the host builds and passes around instead of a process-wide table.

use std::collections::HashMap;
use std::fmt;

use spots_types::{Item, Size};
use tracing::debug;

use crate::error::{ViewError, ViewResult};

/// Rows never collapse below this height.
pub const MIN_ROW_HEIGHT: f64 = 1.0;

/// Capability shared by every renderer: take an item, report its size.
pub trait ItemRenderer: Send {
    fn configure(&mut self, item: &Item) -> Size;
}

impl<F> ItemRenderer for F
where
    F: FnMut(&Item) -> Size + Send,
{
    fn configure(&mut self, item: &Item) -> Size {
        self(item)
    }
}

/// Renders every item at the item's own size, or a fixed fallback when the
/// item has none.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedSize(pub Size);

impl ItemRenderer for FixedSize {
    fn configure(&mut self, item: &Item) -> Size {
        if item.size.is_zero() {
            self.0
        } else {
            item.size
        }
    }
}

/// The closed set of renderer shapes.
pub enum Renderer {
    /// A native row/cell view.
    Row(Box<dyn ItemRenderer>),
    /// A plain view hosted inside a list row wrapper. Takes at least the
    /// item's width and never less than [`MIN_ROW_HEIGHT`].
    Wrapped(Box<dyn ItemRenderer>),
    /// A row that stacks the children under `relation` vertically.
    Composite {
        relation: String,
        child: Box<dyn ItemRenderer>,
    },
}

impl Renderer {
    pub fn row(renderer: impl ItemRenderer + 'static) -> Self {
        Renderer::Row(Box::new(renderer))
    }

    pub fn wrapped(renderer: impl ItemRenderer + 'static) -> Self {
        Renderer::Wrapped(Box::new(renderer))
    }

    pub fn composite(relation: impl Into<String>, child: impl ItemRenderer + 'static) -> Self {
        Renderer::Composite {
            relation: relation.into(),
            child: Box::new(child),
        }
    }

    /// Lay out `item` and return the size it occupies.
    pub fn configure(&mut self, item: &Item) -> Size {
        match self {
            Renderer::Row(inner) => inner.configure(item),
            Renderer::Wrapped(inner) => {
                let size = inner.configure(item);
                Size::new(
                    size.width.max(item.size.width),
                    size.height.max(MIN_ROW_HEIGHT),
                )
            }
            Renderer::Composite { relation, child } => {
                let children = item.relations.get(relation.as_str());
                children
                    .into_iter()
                    .flatten()
                    .map(|c| child.configure(c))
                    .fold(Size::ZERO, |acc, s| {
                        Size::new(acc.width.max(s.width), acc.height + s.height)
                    })
            }
        }
    }

    pub fn variant(&self) -> &'static str {
        match self {
            Renderer::Row(_) => "row",
            Renderer::Wrapped(_) => "wrapped",
            Renderer::Composite { .. } => "composite",
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderer::Composite { relation, .. } => f
                .debug_struct("Composite")
                .field("relation", relation)
                .finish(),
            other => f.write_str(other.variant()),
        }
    }
}

type Factory = Box<dyn Fn() -> Renderer + Send + Sync>;

/// Maps reuse identifiers to renderer factories and caches one
/// materialised renderer per identifier.
#[derive(Default)]
pub struct RendererRegistry {
    factories: HashMap<String, Factory>,
    default_kind: Option<String>,
    cache: HashMap<String, Renderer>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Renderer + Send + Sync + 'static,
    {
        let kind = kind.into();
        self.cache.remove(&kind);
        self.factories.insert(kind, Box::new(factory));
        self
    }

    /// Kind used when an item's own kind is empty or unregistered.
    pub fn set_default_kind(&mut self, kind: impl Into<String>) -> &mut Self {
        self.default_kind = Some(kind.into());
        self
    }

    pub fn default_kind(&self) -> Option<&str> {
        self.default_kind.as_deref()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Reuse identifier that would serve `kind`: the kind itself when
    /// registered, else the default kind when that is registered.
    pub fn resolve<'a>(&'a self, kind: &'a str) -> Option<&'a str> {
        if self.contains(kind) {
            return Some(kind);
        }
        self.default_kind
            .as_deref()
            .filter(|default| self.contains(default))
    }

    /// The cached renderer for `kind`, materialising it on first use.
    pub fn make(&mut self, kind: &str) -> ViewResult<&mut Renderer> {
        let identifier = self
            .resolve(kind)
            .map(str::to_owned)
            .ok_or_else(|| ViewError::MissingView {
                kind: kind.to_owned(),
            })?;

        if !self.cache.contains_key(&identifier) {
            let factory = self
                .factories
                .get(&identifier)
                .ok_or_else(|| ViewError::MissingView {
                    kind: kind.to_owned(),
                })?;
            debug!(kind = %identifier, "materialised renderer");
            self.cache.insert(identifier.clone(), factory());
        }

        self.cache
            .get_mut(&identifier)
            .ok_or(ViewError::MissingView {
                kind: kind.to_owned(),
            })
    }

    /// Resolve a renderer for `item` and lay it out.
    pub fn configure(&mut self, item: &Item) -> ViewResult<Size> {
        Ok(self.make(&item.kind)?.configure(item))
    }

    /// Number of materialised renderers.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every materialised renderer; factories stay registered.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("RendererRegistry")
            .field("kinds", &kinds)
            .field("default_kind", &self.default_kind)
            .field("cached", &self.cache.len())
            .finish()
    }
}
