//! In-memory view collection for tests, tooling, and headless hosts.
//!
//! [`InMemoryView`] keeps its rows in a `Vec` and renders them through a
//! [`RendererRegistry`]. It records every primitive it receives, which makes
//! the applier's ordering observable.

use spots_types::{Fingerprint, Item, Size};
use tracing::debug;

use crate::error::{ViewError, ViewResult};
use crate::registry::RendererRegistry;
use crate::view::{Operation, ViewCollection};

/// One rendered row.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub item: Item,
    /// Size reported by the renderer, zero if none was found on insert.
    pub rendered: Size,
}

/// A [`ViewCollection`] backed by a `Vec` of rows.
#[derive(Debug, Default)]
pub struct InMemoryView {
    rows: Vec<Row>,
    registry: RendererRegistry,
    log: Vec<(Operation, usize)>,
    batches: usize,
    in_batch: bool,
}

impl InMemoryView {
    pub fn new(registry: RendererRegistry) -> Self {
        Self {
            registry,
            ..Default::default()
        }
    }

    /// Create a view that already shows `items`.
    pub fn with_items(registry: RendererRegistry, items: &[Item]) -> Self {
        let mut view = Self::new(registry);
        let rows: Vec<Row> = items.iter().map(|item| view.render(item)).collect();
        view.rows = rows;
        view
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The items currently shown, in order.
    pub fn items(&self) -> Vec<Item> {
        self.rows.iter().map(|row| row.item.clone()).collect()
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RendererRegistry {
        &mut self.registry
    }

    /// Every primitive received so far, with the index it targeted.
    pub fn log(&self) -> &[(Operation, usize)] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Number of completed update batches.
    pub fn batches(&self) -> usize {
        self.batches
    }

    fn render(&mut self, item: &Item) -> Row {
        let rendered = match self.registry.configure(item) {
            Ok(size) => size,
            Err(err) => {
                debug!(kind = %item.kind, error = %err, "inserting row without renderer");
                Size::ZERO
            }
        };
        Row {
            item: item.clone(),
            rendered,
        }
    }

    fn check(&self, index: usize) -> ViewResult<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(ViewError::OutOfRange {
                index,
                len: self.rows.len(),
            })
        }
    }

    fn refresh(&mut self, operation: Operation, index: usize, item: &Item) -> ViewResult<()> {
        self.check(index)?;
        let rendered = self.registry.configure(item)?;
        self.rows[index] = Row {
            item: item.clone(),
            rendered,
        };
        self.log.push((operation, index));
        Ok(())
    }

    fn remove(&mut self, operation: Operation, index: usize) -> ViewResult<()> {
        self.check(index)?;
        self.rows.remove(index);
        self.log.push((operation, index));
        Ok(())
    }

    fn place(&mut self, operation: Operation, index: usize, item: &Item) -> ViewResult<()> {
        if index > self.rows.len() {
            return Err(ViewError::OutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let row = self.render(item);
        self.rows.insert(index, row);
        self.log.push((operation, index));
        Ok(())
    }
}

impl ViewCollection for InMemoryView {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn fingerprint(&self) -> Option<Fingerprint> {
        Some(Fingerprint::of_iter(
            self.rows.len(),
            self.rows.iter().map(|row| &row.item),
        ))
    }

    fn begin_updates(&mut self) {
        self.in_batch = true;
    }

    fn end_updates(&mut self) {
        if self.in_batch {
            self.in_batch = false;
            self.batches += 1;
        }
    }

    fn delete_row(&mut self, index: usize) -> ViewResult<()> {
        self.remove(Operation::Delete, index)
    }

    fn insert_row(&mut self, index: usize, item: &Item) -> ViewResult<()> {
        self.place(Operation::Insert, index, item)
    }

    fn move_out(&mut self, from: usize) -> ViewResult<()> {
        self.remove(Operation::MoveOut, from)
    }

    fn move_in(&mut self, _from: usize, to: usize, item: &Item) -> ViewResult<()> {
        self.place(Operation::MoveIn, to, item)
    }

    fn reload_row(&mut self, index: usize, item: &Item) -> ViewResult<()> {
        self.refresh(Operation::Reload, index, item)
    }

    fn update_row(&mut self, index: usize, item: &Item) -> ViewResult<()> {
        self.refresh(Operation::Update, index, item)
    }

    fn update_children(&mut self, index: usize, item: &Item) -> ViewResult<()> {
        self.refresh(Operation::ChildUpdate, index, item)
    }
}
