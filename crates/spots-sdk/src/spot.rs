use std::fmt;
use std::sync::Arc;

use spots_apply::{
    ApplyIssue, ApplyOutcome, ApplyReport, Applier, Operation, RendererRegistry, ViewCollection,
};
use spots_diff::{reconcile, KeyedMatch, Reconciler, Reconciliation};
use spots_store::ComponentCache;
use spots_types::{Component, Fingerprint, Item, Size};
use tracing::{debug, info, warn};

use crate::config::SpotsConfig;
use crate::error::{SdkError, SdkResult};

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// How a [`Spot`] correlates old and new items.
///
/// Cheap to clone and `Send`, so it can travel with a snapshot to a worker
/// thread.
#[derive(Clone, Debug, Default)]
pub enum Matching {
    #[default]
    Content,
    Keyed(Reconciler<KeyedMatch>),
}

impl Matching {
    pub fn keyed(meta_key: impl Into<String>) -> Self {
        Matching::Keyed(Reconciler::new(KeyedMatch::new(meta_key)))
    }

    pub fn reconcile(&self, old: &[Item], new: &[Item]) -> Reconciliation {
        match self {
            Matching::Content => reconcile(old, new),
            Matching::Keyed(reconciler) => reconciler.reconcile(old, new),
        }
    }
}

// ---------------------------------------------------------------------------
// Spot
// ---------------------------------------------------------------------------

/// Controller for one component shown in one view.
///
/// The spot owns the component model and remembers which snapshot the view
/// shows. Every mutation bumps the generation and stages a reconciliation
/// from the shown snapshot to the model; [`flush`](Spot::flush) applies it.
/// A reconciliation computed on another thread is handed back with
/// [`accept`](Spot::accept), which refuses it once the generation moved on.
pub struct Spot {
    component: Component,
    shown: Vec<Item>,
    matching: Matching,
    applier: Applier,
    generation: u64,
    pending: Option<Reconciliation>,
    cache: Option<(String, Arc<dyn ComponentCache>)>,
}

impl Spot {
    /// A spot whose view is still empty. The component's items are staged
    /// as insertions.
    pub fn new(component: Component) -> Self {
        Self::with_config(component, &SpotsConfig::default())
    }

    pub fn with_config(mut component: Component, config: &SpotsConfig) -> Self {
        component.reindex();
        let matching = match &config.match_key {
            Some(key) => Matching::keyed(key.as_str()),
            None => Matching::Content,
        };
        let mut spot = Self {
            component,
            shown: Vec::new(),
            matching,
            applier: Applier::new(config.apply.clone()),
            generation: 0,
            pending: None,
            cache: None,
        };
        spot.stage();
        spot
    }

    /// Attach a cache entry used by [`restore`](Spot::restore) and
    /// [`save`](Spot::save).
    pub fn with_cache(mut self, key: impl Into<String>, cache: Arc<dyn ComponentCache>) -> Self {
        self.cache = Some((key.into(), cache));
        self
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn items(&self) -> &[Item] {
        &self.component.items
    }

    pub fn len(&self) -> usize {
        self.component.len()
    }

    pub fn is_empty(&self) -> bool {
        self.component.is_empty()
    }

    /// The snapshot the view shows, as of the last successful flush.
    pub fn shown(&self) -> &[Item] {
        &self.shown
    }

    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    /// Counter bumped by every model mutation. Record it next to a snapshot
    /// sent to a worker and pass it back to [`accept`](Spot::accept).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The staged reconciliation, if the view is behind the model.
    pub fn pending(&self) -> Option<&Reconciliation> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    // -- mutations --------------------------------------------------------

    /// Replace every item.
    pub fn replace_items(&mut self, items: Vec<Item>) -> Option<&Reconciliation> {
        self.component.set_items(items);
        self.bump()
    }

    /// Add items after the last one.
    pub fn append(&mut self, items: Vec<Item>) -> Option<&Reconciliation> {
        self.component.items.extend(items);
        self.component.reindex();
        self.bump()
    }

    /// Add items before the first one.
    pub fn prepend(&mut self, items: Vec<Item>) -> Option<&Reconciliation> {
        self.component.items.splice(0..0, items);
        self.component.reindex();
        self.bump()
    }

    pub fn insert(&mut self, index: usize, item: Item) -> SdkResult<Option<&Reconciliation>> {
        let len = self.len();
        if index > len {
            return Err(SdkError::IndexOutOfRange { index, len });
        }
        self.component.items.insert(index, item);
        self.component.reindex();
        Ok(self.bump())
    }

    pub fn remove(&mut self, index: usize) -> SdkResult<Item> {
        let len = self.len();
        if index >= len {
            return Err(SdkError::IndexOutOfRange { index, len });
        }
        let item = self.component.items.remove(index);
        self.component.reindex();
        self.bump();
        Ok(item)
    }

    /// Replace the item at `index`.
    pub fn update(&mut self, index: usize, mut item: Item) -> SdkResult<Option<&Reconciliation>> {
        let len = self.len();
        let slot = self
            .component
            .item_mut(index)
            .ok_or(SdkError::IndexOutOfRange { index, len })?;
        item.index = index;
        *slot = item;
        Ok(self.bump())
    }

    /// Size every item that has no size yet.
    ///
    /// The renderer is chosen by the item's kind, falling back to the
    /// component's kind. A spanned component with a known width divides it
    /// evenly between its items. Items without a renderer keep a zero size.
    /// Returns the number of items that changed.
    pub fn prepare(&mut self, registry: &mut RendererRegistry) -> usize {
        let span_width = (self.component.span > 0.0 && self.component.size.width > 0.0)
            .then(|| self.component.size.width / self.component.span);

        let mut sized = 0;
        for index in 0..self.component.len() {
            let Some(identifier) = self.component.identifier(index).map(str::to_owned) else {
                continue;
            };
            let Some(item) = self.component.items.get_mut(index) else {
                continue;
            };
            if !item.size.is_zero() {
                continue;
            }
            let mut size = match registry.make(&identifier) {
                Ok(renderer) => renderer.configure(item),
                Err(err) => {
                    debug!(index, kind = %identifier, error = %err, "leaving item unsized");
                    continue;
                }
            };
            if let Some(width) = span_width {
                size.width = width;
            }
            if size != Size::ZERO {
                item.size = size;
                sized += 1;
            }
        }

        if sized > 0 {
            self.bump();
        }
        sized
    }

    // -- applying ---------------------------------------------------------

    /// Apply the staged reconciliation to `view`.
    ///
    /// Returns `None` when nothing was staged. A staged reconciliation is
    /// consumed, so a second flush is a no-op.
    ///
    /// [`shown`](Spot::shown) only advances to a snapshot the view is known
    /// to display. Rows whose refresh was skipped keep their previous item
    /// and are staged again. When the view drifted in a way the report does
    /// not account for, `shown` stays put and the host should
    /// [`resync`](Spot::resync).
    pub fn flush<V>(&mut self, view: &mut V) -> Option<ApplyReport>
    where
        V: ViewCollection + ?Sized,
    {
        let reconciliation = self.pending.take()?;
        let known_start = match view.fingerprint() {
            Some(fingerprint) => {
                fingerprint == reconciliation.base || fingerprint == reconciliation.target
            }
            None => view.len() == reconciliation.old_len,
        };

        let report = self
            .applier
            .apply(&reconciliation, &self.component.items, view);

        if report.outcome == ApplyOutcome::Rejected {
            warn!(generation = self.generation, rows = view.len(), "view rejected update");
            return Some(report);
        }

        let displayed = known_start
            .then(|| self.displayed_after(&report))
            .flatten()
            .filter(|rows| view.fingerprint().map_or(true, |f| f == Fingerprint::of(rows)));
        match displayed {
            Some(rows) => {
                self.shown = rows;
                if !report.is_clean() {
                    self.stage();
                }
                debug!(
                    generation = self.generation,
                    applied = report.applied,
                    issues = report.issues.len(),
                    "flushed"
                );
            }
            None => {
                warn!(
                    generation = self.generation,
                    rows = view.len(),
                    issues = report.issues.len(),
                    "view left an unknown snapshot; resync required"
                );
            }
        }
        Some(report)
    }

    /// Tell the spot what the view actually shows, and stage a
    /// reconciliation from there. Used to recover after a rejected flush.
    pub fn resync(&mut self, shown: Vec<Item>) -> Option<&Reconciliation> {
        self.shown = shown;
        self.stage();
        self.pending()
    }

    /// Adopt a reconciliation computed elsewhere.
    ///
    /// `generation` is the value of [`generation`](Spot::generation) when the
    /// worker took its snapshot; any mutation since then makes the result
    /// stale. `reconciliation` must also lead from [`shown`](Spot::shown) to
    /// `items`. On success `items` become the model and the reconciliation is
    /// staged.
    pub fn accept(
        &mut self,
        generation: u64,
        reconciliation: Reconciliation,
        items: Vec<Item>,
    ) -> SdkResult<()> {
        if generation != self.generation {
            return Err(SdkError::StaleReconciliation(format!(
                "computed at generation {generation}, spot is at {}",
                self.generation
            )));
        }
        let shown = Fingerprint::of(&self.shown);
        if reconciliation.base != shown {
            return Err(SdkError::StaleReconciliation(format!(
                "computed against {}, view shows {}",
                reconciliation.base.short_hex(),
                shown.short_hex()
            )));
        }
        let target = Fingerprint::of(&items);
        if reconciliation.target != target {
            return Err(SdkError::StaleReconciliation(format!(
                "leads to {}, items are {}",
                reconciliation.target.short_hex(),
                target.short_hex()
            )));
        }

        self.component.set_items(items);
        self.generation += 1;
        self.pending = (!reconciliation.is_empty()).then_some(reconciliation);
        Ok(())
    }

    // -- caching ----------------------------------------------------------

    /// Load the cached component, if any, and stage it for display.
    ///
    /// Returns `false` when no cache is attached or nothing is cached.
    pub fn restore(&mut self) -> SdkResult<bool> {
        let Some((key, cache)) = &self.cache else {
            return Ok(false);
        };
        let Some(cached) = cache.load(key)? else {
            return Ok(false);
        };
        info!(key = %key, items = cached.len(), "restored cached component");
        self.component = cached;
        self.component.reindex();
        self.bump();
        Ok(true)
    }

    /// Write the component to the attached cache.
    ///
    /// Returns `false` when no cache is attached.
    pub fn save(&self) -> SdkResult<bool> {
        let Some((key, cache)) = &self.cache else {
            return Ok(false);
        };
        cache.save(key, &self.component)?;
        debug!(key = %key, items = self.component.len(), "saved component");
        Ok(true)
    }

    // -- internals --------------------------------------------------------

    fn bump(&mut self) -> Option<&Reconciliation> {
        self.generation += 1;
        self.stage();
        self.pending()
    }

    fn stage(&mut self) {
        let reconciliation = self.matching.reconcile(&self.shown, &self.component.items);
        self.pending = (!reconciliation.is_empty()).then_some(reconciliation);
    }

    /// The rows a view started from the shown snapshot displays after
    /// `report`. Only skipped in-place refreshes can be accounted for: the
    /// row keeps the old item, which sits at the same index in both
    /// snapshots.
    fn displayed_after(&self, report: &ApplyReport) -> Option<Vec<Item>> {
        let mut rows = self.component.items.clone();
        for issue in &report.issues {
            match issue {
                ApplyIssue::MissingView {
                    operation: Operation::Reload | Operation::Update | Operation::ChildUpdate,
                    index,
                    ..
                } => *rows.get_mut(*index)? = self.shown.get(*index)?.clone(),
                _ => return None,
            }
        }
        Some(rows)
    }
}

impl fmt::Debug for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spot")
            .field("kind", &self.component.kind)
            .field("items", &self.component.len())
            .field("shown", &self.shown.len())
            .field("generation", &self.generation)
            .field("pending", &self.pending.is_some())
            .field("cache", &self.cache.as_ref().map(|(key, _)| key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spots_apply::{ApplyConfig, FixedSize, InMemoryView, Renderer};
    use spots_store::InMemoryComponentCache;

    fn registry() -> RendererRegistry {
        let mut registry = RendererRegistry::new();
        registry
            .register("text", || Renderer::row(FixedSize(Size::new(320.0, 44.0))))
            .register("image", || Renderer::row(FixedSize(Size::new(320.0, 200.0))));
        registry
    }

    fn text(title: &str) -> Item {
        Item::new(title).with_kind("text")
    }

    fn texts(titles: &[&str]) -> Vec<Item> {
        titles.iter().map(|t| text(t)).collect()
    }

    fn shown_titles(view: &InMemoryView) -> Vec<String> {
        view.rows().iter().map(|r| r.item.title.clone()).collect()
    }

    fn list(titles: &[&str]) -> Component {
        Component::new("list").with_items(texts(titles))
    }

    #[test]
    fn new_spot_stages_initial_insertions() {
        let mut spot = Spot::new(list(&["a", "b"]));
        let pending = spot.pending().expect("initial items staged");
        assert_eq!(pending.changes.insertions.len(), 2);

        let mut view = InMemoryView::new(registry());
        let report = spot.flush(&mut view).unwrap();
        assert!(report.is_applied());
        assert_eq!(shown_titles(&view), vec!["a", "b"]);
        assert_eq!(spot.shown().len(), 2);
    }

    #[test]
    fn empty_spot_has_nothing_staged() {
        let mut spot = Spot::new(Component::new("list"));
        assert!(!spot.has_pending());
        assert!(spot.flush(&mut InMemoryView::new(registry())).is_none());
    }

    #[test]
    fn second_flush_is_a_no_op() {
        let mut spot = Spot::new(list(&["a"]));
        let mut view = InMemoryView::new(registry());
        assert!(spot.flush(&mut view).is_some());
        assert!(spot.flush(&mut view).is_none());
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn append_and_prepend() {
        let mut spot = Spot::new(list(&["b"]));
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        let rec = spot.append(texts(&["c", "d"])).unwrap();
        assert_eq!(rec.changes.insertions.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        spot.flush(&mut view);

        spot.prepend(texts(&["a"]));
        let report = spot.flush(&mut view).unwrap();
        assert!(report.is_clean());
        assert_eq!(shown_titles(&view), vec!["a", "b", "c", "d"]);
        assert!(spot.items().iter().enumerate().all(|(i, item)| item.index == i));
    }

    #[test]
    fn mutations_without_flush_accumulate() {
        let mut spot = Spot::new(list(&["a", "b", "c"]));
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        spot.remove(0).unwrap();
        spot.insert(2, text("d")).unwrap();
        spot.update(0, text("B")).unwrap();
        let generation = spot.generation();

        // One flush covers every mutation since the last one.
        let report = spot.flush(&mut view).unwrap();
        assert!(report.is_clean());
        assert_eq!(shown_titles(&view), vec!["B", "c", "d"]);
        assert_eq!(spot.generation(), generation);
    }

    #[test]
    fn index_errors() {
        let mut spot = Spot::new(list(&["a"]));
        assert!(matches!(
            spot.insert(3, text("x")),
            Err(SdkError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(
            spot.remove(1),
            Err(SdkError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(
            spot.update(1, text("x")),
            Err(SdkError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn unchanged_replacement_stages_nothing() {
        let mut spot = Spot::new(list(&["a", "b"]));
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        assert!(spot.replace_items(texts(&["a", "b"])).is_none());
        assert!(!spot.has_pending());
    }

    #[test]
    fn off_thread_reconciliation_is_accepted() {
        let mut spot = Spot::new(list(&["a", "b", "c"]));
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        let matching = spot.matching().clone();
        let old = spot.shown().to_vec();
        let generation = spot.generation();
        let (rec, items) = std::thread::spawn(move || {
            let new = texts(&["c", "a", "b", "d"]);
            (matching.reconcile(&old, &new), new)
        })
        .join()
        .unwrap();

        spot.accept(generation, rec, items).unwrap();
        let report = spot.flush(&mut view).unwrap();
        assert!(report.is_clean());
        assert_eq!(shown_titles(&view), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn stale_off_thread_result_is_refused() {
        let mut spot = Spot::new(list(&["a"]));
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        let generation = spot.generation();
        let rec = spot.matching().reconcile(&texts(&["z"]), &texts(&["z", "y"]));
        let err = spot.accept(generation, rec, texts(&["z", "y"])).unwrap_err();
        assert!(matches!(err, SdkError::StaleReconciliation(_)));

        let rec = spot.matching().reconcile(&texts(&["a"]), &texts(&["a", "b"]));
        let err = spot.accept(generation, rec, texts(&["a", "c"])).unwrap_err();
        assert!(matches!(err, SdkError::StaleReconciliation(_)));
        assert_eq!(spot.len(), 1);
    }

    #[test]
    fn mutation_after_accept_supersedes_it() {
        let mut spot = Spot::new(list(&["a"]));
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        let new = texts(&["a", "b"]);
        let rec = spot.matching().reconcile(spot.shown(), &new);
        spot.accept(spot.generation(), rec, new).unwrap();
        spot.append(texts(&["c"]));

        spot.flush(&mut view).unwrap();
        assert_eq!(shown_titles(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn mutation_during_off_thread_work_refuses_the_result() {
        let mut spot = Spot::new(list(&["a"]));
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        let generation = spot.generation();
        let new = texts(&["a", "b"]);
        let rec = spot.matching().reconcile(spot.shown(), &new);

        // Same shown snapshot, so only the generation tells the result is outdated.
        spot.update(0, text("A")).unwrap();
        let err = spot.accept(generation, rec, new).unwrap_err();
        assert!(matches!(err, SdkError::StaleReconciliation(_)));
        assert_eq!(spot.items()[0].title, "A");

        spot.flush(&mut view).unwrap();
        assert_eq!(shown_titles(&view), vec!["A"]);
    }

    #[test]
    fn skipped_reload_does_not_block_later_flushes() {
        let mut registry = RendererRegistry::new();
        registry.register("text", || Renderer::row(FixedSize(Size::new(320.0, 44.0))));
        let mut spot = Spot::new(list(&["a", "b"]));
        let mut view = InMemoryView::new(registry);
        spot.flush(&mut view);

        spot.update(0, Item::new("a").with_kind("video")).unwrap();
        let report = spot.flush(&mut view).unwrap();
        assert_eq!(report.outcome, ApplyOutcome::Applied);
        assert!(matches!(
            report.issues.as_slice(),
            [ApplyIssue::MissingView { operation: Operation::Reload, index: 0, .. }]
        ));
        // The view still shows the text row, and the reload stays staged.
        assert_eq!(spot.shown()[0].kind, "text");
        assert!(spot.has_pending());

        spot.append(texts(&["c"]));
        let report = spot.flush(&mut view).unwrap();
        assert_eq!(report.outcome, ApplyOutcome::Applied);
        assert_eq!(shown_titles(&view), vec!["a", "b", "c"]);
        assert_eq!(view.rows()[0].item.kind, "text");
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn rejected_flush_can_resync() {
        let mut spot = Spot::new(list(&["a", "b"]));
        let mut view = InMemoryView::with_items(registry(), &texts(&["x"]));

        let report = spot.flush(&mut view).unwrap();
        assert_eq!(report.outcome, ApplyOutcome::Rejected);
        assert!(spot.shown().is_empty());

        spot.resync(view.items());
        let report = spot.flush(&mut view).unwrap();
        assert!(report.is_applied());
        assert_eq!(shown_titles(&view), vec!["a", "b"]);
    }

    #[test]
    fn keyed_config_tracks_edited_moves() {
        let config = SpotsConfig {
            match_key: Some("id".into()),
            ..Default::default()
        };
        let with_id = |title: &str, id: i64| text(title).with_meta("id", serde_json::json!(id));
        let mut spot = Spot::with_config(
            Component::new("list").with_items(vec![with_id("one", 1), with_id("two", 2)]),
            &config,
        );
        let mut view = InMemoryView::new(registry());
        spot.flush(&mut view);

        let rec = spot
            .replace_items(vec![with_id("two!", 2), with_id("one", 1)])
            .unwrap();
        assert_eq!(rec.changes.moved.len(), 2);
        assert!(rec.changes.insertions.is_empty());

        spot.flush(&mut view);
        assert_eq!(shown_titles(&view), vec!["two!", "one"]);
    }

    #[test]
    fn lenient_config_applies_to_a_drifted_view() {
        let config = SpotsConfig {
            apply: ApplyConfig::lenient(),
            ..Default::default()
        };
        let mut spot = Spot::with_config(list(&["a"]), &config);
        let mut view = InMemoryView::with_items(registry(), &texts(&["x"]));

        let report = spot.flush(&mut view).unwrap();
        assert!(report.is_applied());
        assert_eq!(shown_titles(&view), vec!["a", "x"]);
        // The view matches neither snapshot, so nothing is assumed about it.
        assert!(spot.shown().is_empty());
        assert!(!spot.has_pending());

        spot.resync(view.items());
        let report = spot.flush(&mut view).unwrap();
        assert_eq!(report.outcome, ApplyOutcome::Applied);
        assert_eq!(shown_titles(&view), vec!["a"]);
        assert_eq!(spot.shown().len(), 1);
    }

    #[test]
    fn prepare_sizes_unsized_items() {
        let mut component = Component::new("text").with_items(vec![
            Item::new("a"),
            Item::new("b").with_kind("image"),
            Item::new("c").with_size(Size::new(10.0, 10.0)),
            Item::new("d").with_kind("video"),
        ]);
        component.size = Size::new(400.0, 0.0);
        let mut spot = Spot::new(component);
        let generation = spot.generation();

        let sized = spot.prepare(&mut registry());
        assert_eq!(sized, 2);
        assert_eq!(spot.items()[0].size, Size::new(320.0, 44.0));
        assert_eq!(spot.items()[1].size, Size::new(320.0, 200.0));
        assert_eq!(spot.items()[2].size, Size::new(10.0, 10.0));
        assert_eq!(spot.items()[3].size, Size::ZERO);
        assert!(spot.generation() > generation);

        assert_eq!(spot.prepare(&mut registry()), 0);
    }

    #[test]
    fn prepare_divides_width_by_span() {
        let mut component = Component::new("text")
            .with_span(2.0)
            .with_items(vec![Item::new("a"), Item::new("b")]);
        component.size = Size::new(300.0, 0.0);
        let mut spot = Spot::new(component);

        spot.prepare(&mut registry());
        assert!(spot.items().iter().all(|i| i.size == Size::new(150.0, 44.0)));
    }

    #[test]
    fn cache_round_trip() {
        let cache: Arc<dyn ComponentCache> = Arc::new(InMemoryComponentCache::new());

        let spot = Spot::new(list(&["a", "b"])).with_cache("feed", Arc::clone(&cache));
        assert!(spot.save().unwrap());

        let mut restored = Spot::new(Component::new("list")).with_cache("feed", cache);
        assert!(restored.restore().unwrap());
        assert_eq!(restored.len(), 2);

        let mut view = InMemoryView::new(registry());
        restored.flush(&mut view);

        // Fresh data diffs against the cached snapshot.
        let rec = restored.replace_items(texts(&["a", "b", "c"])).unwrap();
        assert_eq!(rec.changes.insertions.len(), 1);
    }

    #[test]
    fn without_cache_save_and_restore_are_no_ops() {
        let mut spot = Spot::new(list(&["a"]));
        assert!(!spot.save().unwrap());
        assert!(!spot.restore().unwrap());
    }

    #[test]
    fn spot_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Spot>();
        assert_send::<Matching>();
    }
}
