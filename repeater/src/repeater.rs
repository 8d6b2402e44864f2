use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use crate::delta;
use crate::key::{ItemKey, KeyMap};
use crate::pacer::ChunkPacer;
use crate::sort::try_stable_sort;
use crate::{
    Change, Comparator, Delta, Error, FieldPath, Filter, InstanceId, RepeaterOptions, Result,
    Selection, Stage,
};

#[derive(Clone, Debug)]
struct ItemRecord<K> {
    id: InstanceId,
    key: K,
    /// Needs its filter re-evaluated on the next render.
    dirty: bool,
    /// Result of the last committed filter evaluation.
    visible: bool,
    view_index: Option<usize>,
    rendered: bool,
}

#[derive(Clone, Copy, Debug)]
struct PendingRender {
    first_seen_ms: Option<u64>,
}

/// A headless list projection engine.
///
/// The engine does not own items. The caller keeps the source collection, reports each mutation
/// through [`Repeater::notify_change`] and passes the current slice to [`Repeater::render`] and
/// [`Repeater::tick`]. In return it maintains a filtered, stably sorted view of stable
/// [`InstanceId`]s and reports every change as an ordered [`Delta`].
///
/// Nothing is re-filtered or re-sorted until a render runs: either synchronously via `render`,
/// or on a later `tick` after `schedule_render`.
pub struct Repeater<T, K> {
    options: RepeaterOptions<T, K>,
    records: Vec<ItemRecord<K>>,
    view: Vec<InstanceId>,
    next_id: u64,
    all_dirty: bool,
    pending_render: Option<PendingRender>,
    tick_requested: bool,
    pacer: ChunkPacer,
    selection: Selection<K>,
}

impl<T, K: ItemKey> Repeater<T, K> {
    pub fn new(options: RepeaterOptions<T, K>) -> Self {
        rdebug!(
            filtered = options.filter.is_some(),
            sorted = options.sort.is_some(),
            observed = options.observe.len(),
            "Repeater::new"
        );
        Self {
            pacer: ChunkPacer::new(options.budget.initial_count.unwrap_or(1)),
            selection: Selection::default(),
            options,
            records: Vec::new(),
            view: Vec::new(),
            next_id: 0,
            all_dirty: true,
            pending_render: None,
            tick_requested: false,
        }
    }

    /// Creates an engine already tracking `items`. Nothing is rendered yet.
    pub fn with_source(options: RepeaterOptions<T, K>, items: &[T]) -> Self {
        let mut r = Self::new(options);
        r.records = items.iter().map(|item| r.new_record(item)).collect();
        r
    }

    pub fn options(&self) -> &RepeaterOptions<T, K> {
        &self.options
    }

    /// Replaces the options, marking everything dirty and scheduling a render when the
    /// projection strategies changed.
    ///
    /// A new `key_of` takes effect on the next render, which re-keys every record.
    pub fn set_options(&mut self, options: RepeaterOptions<T, K>) -> Result<()> {
        let filter_changed = !same_strategy(&self.options.filter, &options.filter, Filter::ptr_eq);
        let sort_changed = !same_strategy(&self.options.sort, &options.sort, Comparator::ptr_eq);
        let key_changed = !Arc::ptr_eq(&self.options.key_of, &options.key_of);
        let budget_changed = self.options.budget != options.budget;
        self.options = options;
        rtrace!(filter_changed, sort_changed, key_changed, budget_changed, "Repeater::set_options");

        if budget_changed {
            self.pacer = ChunkPacer::new(self.options.budget.initial_count.unwrap_or(1));
        }
        if filter_changed || sort_changed || key_changed {
            self.all_dirty = true;
            self.schedule_render()?;
        }
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut RepeaterOptions<T, K>)) -> Result<()> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    pub fn set_filter(&mut self, filter: Option<Filter<T>>) -> Result<()> {
        self.options.filter = filter;
        self.all_dirty = true;
        self.schedule_render()
    }

    pub fn set_sort(&mut self, sort: Option<Comparator<T>>) -> Result<()> {
        self.options.sort = sort;
        self.all_dirty = true;
        self.schedule_render()
    }

    pub fn set_observe(&mut self, observe: Vec<FieldPath>) {
        self.options.observe = observe;
    }

    pub fn set_on_delta(&mut self, on_delta: Option<impl Fn(&Delta) + Send + Sync + 'static>) {
        self.options.on_delta = on_delta.map(|f| Arc::new(f) as _);
    }

    /// Replaces the tracked collection.
    ///
    /// Every record is discarded (instances get fresh ids), the selection is cleared, and any
    /// pending scheduled render or in-flight chunking is cancelled before a new render is
    /// scheduled.
    pub fn set_source(&mut self, items: &[T]) -> Result<()> {
        rdebug!(len = items.len(), previous = self.records.len(), "set_source");
        self.pending_render = None;
        self.pacer = ChunkPacer::new(self.options.budget.initial_count.unwrap_or(1));
        self.records = items.iter().map(|item| self.new_record(item)).collect();
        self.selection.clear();
        self.all_dirty = true;
        self.schedule_render()
    }

    /// Applies a change descriptor for a mutation the caller already made.
    ///
    /// Records are added or discarded, and observed path mutations mark their record dirty. Filter
    /// and sort are not re-run. Keys of discarded records leave the selection here.
    pub fn notify_change(&mut self, change: Change<'_, T>) -> Result<()> {
        let len = self.records.len();
        match change {
            Change::Added { index, item } => {
                check_index("item-added", index, len, true)?;
                let rec = self.new_record(item);
                rtrace!(index, id = rec.id.0, "notify_change: added");
                self.records.insert(index, rec);
            }
            Change::Removed { index } => {
                check_index("item-removed", index, len, false)?;
                let rec = self.records.remove(index);
                rtrace!(index, id = rec.id.0, "notify_change: removed");
                self.release(rec);
            }
            Change::Replaced { index, item } => {
                check_index("item-replaced", index, len, false)?;
                let key = (self.options.key_of)(item);
                if self.records[index].key == key {
                    self.records[index].dirty = true;
                } else {
                    let rec = self.new_record_keyed(key);
                    let old = mem::replace(&mut self.records[index], rec);
                    self.release(old);
                }
            }
            Change::Splice {
                start,
                removed,
                added,
            } => {
                check_index("splice", start, len, true)?;
                if removed > len - start {
                    return Err(Error::InvalidState {
                        op: "splice",
                        index: start.saturating_add(removed),
                        len,
                    });
                }
                rtrace!(start, removed, added = added.len(), "notify_change: splice");
                let mut gone: Vec<ItemRecord<K>> =
                    self.records.drain(start..start + removed).collect();
                let mut fresh = Vec::with_capacity(added.len());
                for item in added {
                    let key = (self.options.key_of)(item);
                    // Items moved within one splice keep their instance.
                    let rec = match gone.iter().position(|r| r.key == key) {
                        Some(i) => {
                            let mut rec = gone.remove(i);
                            rec.dirty = true;
                            rec
                        }
                        None => self.new_record_keyed(key),
                    };
                    fresh.push(rec);
                }
                self.records.splice(start..start, fresh);
                for rec in gone {
                    self.release(rec);
                }
            }
            Change::PathMutated { index, path } => {
                check_index("path-mutated", index, len, false)?;
                if self.options.observes(path) {
                    rtrace!(index, path, "notify_change: observed path mutated");
                    self.records[index].dirty = true;
                }
            }
        }
        Ok(())
    }

    /// Re-derives the view synchronously and returns the delta against the previous one.
    ///
    /// Cancels a pending scheduled render. On [`Error::ProjectionFailure`] the previous view,
    /// dirty flags and chunking state are left as they were.
    pub fn render(&mut self, items: &[T]) -> Result<Delta> {
        if self.pending_render.take().is_some() {
            rtrace!("render: superseding scheduled render");
        }
        self.run_render(items)
    }

    /// Requests a render on a later [`Repeater::tick`]. Repeated requests coalesce.
    pub fn schedule_render(&mut self) -> Result<()> {
        if self.pending_render.is_some() {
            rtrace!("schedule_render: coalesced");
            return Ok(());
        }
        self.request_tick()?;
        self.pending_render = Some(PendingRender {
            first_seen_ms: None,
        });
        Ok(())
    }

    pub fn is_render_scheduled(&self) -> bool {
        self.pending_render.is_some()
    }

    /// Whether the host should keep ticking: a render is scheduled or instances are pending.
    pub fn needs_tick(&self) -> bool {
        self.pending_render.is_some() || self.pending_count() > 0
    }

    /// Runs one cooperative scheduler tick.
    ///
    /// A scheduled render runs once `delay_ms` has passed since the first tick that saw it.
    /// Otherwise one chunk of pending instances is stamped.
    pub fn tick(&mut self, items: &[T], now_ms: u64) -> Result<Delta> {
        self.tick_requested = false;

        if let Some(pending) = self.pending_render.as_mut() {
            let first = *pending.first_seen_ms.get_or_insert(now_ms);
            if now_ms.saturating_sub(first) >= self.options.delay_ms {
                self.pending_render = None;
                return self.run_render(items);
            }
            self.request_tick_quietly();
        }

        self.stamp_chunk(now_ms)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The committed view, in view order.
    pub fn view(&self) -> &[InstanceId] {
        &self.view
    }

    pub fn instance_at(&self, view_index: usize) -> Option<InstanceId> {
        self.view.get(view_index).copied()
    }

    /// Visits the committed view in order with `(view_index, instance, item)`.
    ///
    /// `items` must be the live collection. Instances whose item was removed since the last render
    /// are skipped.
    pub fn for_each_view_item<'a>(&self, items: &'a [T], mut f: impl FnMut(usize, InstanceId, &'a T)) {
        let mut slots: Vec<Option<usize>> = alloc::vec![None; self.view.len()];
        for (slot, rec) in self.records.iter().enumerate() {
            if let Some(v) = rec.view_index.filter(|&v| v < slots.len()) {
                slots[v] = Some(slot);
            }
        }
        for (view_index, slot) in slots.into_iter().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            if let Some(item) = items.get(slot) {
                f(view_index, self.records[slot].id, item);
            }
        }
    }

    pub fn instance_of(&self, item: &T) -> Option<InstanceId> {
        self.record_for(item).map(|r| r.id)
    }

    /// The item's current index in `items`, the live source collection.
    ///
    /// This is a linear scan by key; no secondary index is maintained.
    pub fn index_of(&self, items: &[T], item: &T) -> Option<usize> {
        let key = (self.options.key_of)(item);
        items.iter().position(|it| (self.options.key_of)(it) == key)
    }

    /// The item's position in the committed view, or `None` when absent.
    pub fn position_of(&self, item: &T) -> Option<usize> {
        self.record_for(item).and_then(|r| r.view_index)
    }

    pub fn source_index_of_instance(&self, id: InstanceId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn view_index_of_instance(&self, id: InstanceId) -> Option<usize> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| r.view_index)
    }

    pub fn is_rendered(&self, id: InstanceId) -> bool {
        self.records.iter().any(|r| r.id == id && r.rendered)
    }

    pub fn rendered_count(&self) -> usize {
        self.records.iter().filter(|r| r.rendered).count()
    }

    /// Instances in the view that are still waiting for a chunk pass.
    pub fn pending_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.view_index.is_some() && !r.rendered)
            .count()
    }

    pub fn chunk_size(&self) -> usize {
        self.pacer.chunk()
    }

    pub fn selection(&self) -> &Selection<K> {
        &self.selection
    }

    /// Direct access for mode changes. Keys selected this way are still pruned when their
    /// records are discarded.
    pub fn selection_mut(&mut self) -> &mut Selection<K> {
        &mut self.selection
    }

    /// Selects a tracked item. Untracked items are ignored and return `false`.
    pub fn select(&mut self, item: &T) -> bool {
        let key = (self.options.key_of)(item);
        if !self.records.iter().any(|r| r.key == key) {
            rwarn!("select: item is not part of the tracked collection");
            return false;
        }
        self.selection.select(key)
    }

    pub fn deselect(&mut self, item: &T) -> bool {
        let key = (self.options.key_of)(item);
        self.selection.deselect(&key)
    }

    pub fn select_index(&mut self, items: &[T], index: usize) -> Result<bool> {
        let item = items.get(index).ok_or(Error::InvalidState {
            op: "select-index",
            index,
            len: items.len(),
        })?;
        Ok(self.select(item))
    }

    pub fn deselect_index(&mut self, items: &[T], index: usize) -> Result<bool> {
        let item = items.get(index).ok_or(Error::InvalidState {
            op: "deselect-index",
            index,
            len: items.len(),
        })?;
        Ok(self.deselect(item))
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.selection.is_selected(&(self.options.key_of)(item))
    }

    pub fn is_index_selected(&self, items: &[T], index: usize) -> bool {
        items.get(index).is_some_and(|item| self.is_selected(item))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn run_render(&mut self, items: &[T]) -> Result<Delta> {
        self.revalidate(items);
        let delta = self.project(items)?;
        rdebug!(
            view = self.view.len(),
            ops = delta.ops.len(),
            stamped = delta.stamped.len(),
            pending = self.pending_count(),
            "render"
        );
        self.emit(&delta);
        Ok(delta)
    }

    /// Filters, sorts and commits. Nothing is written until both strategies succeeded.
    fn project(&mut self, items: &[T]) -> Result<Delta> {
        let mut visible = Vec::with_capacity(items.len());
        for (index, (rec, item)) in self.records.iter().zip(items).enumerate() {
            let keep = match &self.options.filter {
                None => true,
                Some(filter) if self.all_dirty || rec.dirty || !rec.visible => {
                    filter
                        .test(item)
                        .map_err(|source| Error::ProjectionFailure {
                            stage: Stage::Filter,
                            index,
                            source,
                        })?
                }
                Some(_) => rec.visible,
            };
            visible.push(keep);
        }

        let mut order: Vec<usize> = (0..visible.len()).filter(|&i| visible[i]).collect();
        if let Some(sort) = &self.options.sort {
            try_stable_sort(&mut order, |a, b| {
                sort.compare(&items[a], &items[b])
                    .map_err(|source| Error::ProjectionFailure {
                        stage: Stage::Sort,
                        index: a,
                        source,
                    })
            })?;
        }

        let next_view: Vec<InstanceId> = order.iter().map(|&i| self.records[i].id).collect();
        let ops = delta::diff(&self.view, &next_view);
        let was_absent: Vec<bool> = self.records.iter().map(|r| r.view_index.is_none()).collect();

        for (rec, keep) in self.records.iter_mut().zip(visible) {
            rec.dirty = false;
            rec.visible = keep;
            rec.view_index = None;
        }
        for (view_index, &slot) in order.iter().enumerate() {
            self.records[slot].view_index = Some(view_index);
        }
        for rec in &mut self.records {
            if rec.view_index.is_none() {
                rec.rendered = false;
            }
        }
        self.all_dirty = false;
        self.view = next_view;

        // Only records entering the view are stamped here; earlier pending ones wait for ticks.
        let entering: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&slot| was_absent[slot] && !self.records[slot].rendered)
            .collect();
        let limit = match self.options.budget.initial_count {
            Some(initial) if entering.len() > initial => initial,
            _ => entering.len(),
        };
        let mut stamped = Vec::with_capacity(limit);
        for &slot in &entering[..limit] {
            self.records[slot].rendered = true;
            stamped.push(self.records[slot].id);
        }
        if limit < entering.len() {
            rdebug!(stamped = limit, pending = entering.len() - limit, "render: chunking");
            self.pacer = ChunkPacer::new(self.options.budget.initial_count.unwrap_or(1));
            self.request_tick_quietly();
        }

        Ok(Delta { ops, stamped })
    }

    fn stamp_chunk(&mut self, now_ms: u64) -> Result<Delta> {
        let mut pending: Vec<(usize, usize)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.rendered)
            .filter_map(|(slot, r)| r.view_index.map(|v| (v, slot)))
            .collect();
        if pending.is_empty() {
            return Ok(Delta::default());
        }
        pending.sort_unstable();

        let target = self.options.budget.target_frame_ms();
        let batch = self.pacer.next_batch(now_ms, pending.len(), target);
        let mut stamped = Vec::with_capacity(batch);
        for &(_, slot) in &pending[..batch] {
            self.records[slot].rendered = true;
            stamped.push(self.records[slot].id);
        }
        rtrace!(batch, remaining = pending.len() - batch, now_ms, "tick: chunk");
        if batch < pending.len() {
            self.request_tick_quietly();
        }

        let delta = Delta {
            ops: Vec::new(),
            stamped,
        };
        self.emit(&delta);
        Ok(delta)
    }

    /// Re-keys records when the live slice drifted from the notified changes.
    fn revalidate(&mut self, items: &[T]) {
        let in_sync = items.len() == self.records.len()
            && items
                .iter()
                .zip(&self.records)
                .all(|(item, rec)| (self.options.key_of)(item) == rec.key);
        if in_sync {
            return;
        }
        rwarn!(
            live = items.len(),
            tracked = self.records.len(),
            "render: source drifted from notified changes; resynchronising by key"
        );

        let mut by_key: KeyMap<K, Vec<ItemRecord<K>>> = KeyMap::new();
        for rec in mem::take(&mut self.records).into_iter().rev() {
            by_key.entry(rec.key.clone()).or_default().push(rec);
        }
        let mut next = Vec::with_capacity(items.len());
        for item in items {
            let key = (self.options.key_of)(item);
            let rec = match by_key.get_mut(&key).and_then(Vec::pop) {
                Some(rec) => rec,
                None => self.new_record_keyed(key),
            };
            next.push(rec);
        }
        self.records = next;
        self.all_dirty = true;
        for rec in by_key.into_values().flatten() {
            self.release(rec);
        }
    }

    fn new_record(&mut self, item: &T) -> ItemRecord<K> {
        let key = (self.options.key_of)(item);
        self.new_record_keyed(key)
    }

    fn new_record_keyed(&mut self, key: K) -> ItemRecord<K> {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        ItemRecord {
            id,
            key,
            dirty: true,
            visible: false,
            view_index: None,
            rendered: false,
        }
    }

    /// Drops a discarded record's key from the selection unless another record still holds it.
    fn release(&mut self, rec: ItemRecord<K>) {
        if self.selection.is_selected(&rec.key) && !self.records.iter().any(|r| r.key == rec.key)
        {
            rtrace!(id = rec.id.0, "release: deselecting removed item");
            self.selection.deselect(&rec.key);
        }
    }

    fn record_for(&self, item: &T) -> Option<&ItemRecord<K>> {
        let key = (self.options.key_of)(item);
        self.records.iter().find(|r| r.key == key)
    }

    fn request_tick(&mut self) -> Result<()> {
        if self.tick_requested {
            return Ok(());
        }
        if let Some(request) = &self.options.request_tick {
            if !request() {
                return Err(Error::SchedulerUnavailable);
            }
            self.tick_requested = true;
        }
        Ok(())
    }

    /// Chunk continuations are best effort: a host without a working hook can still poll
    /// [`Repeater::needs_tick`].
    fn request_tick_quietly(&mut self) {
        if self.request_tick().is_err() {
            rwarn!("tick request refused; waiting for the host to tick");
        }
    }

    fn emit(&self, delta: &Delta) {
        if delta.is_empty() {
            return;
        }
        if let Some(cb) = &self.options.on_delta {
            cb(delta);
        }
    }
}

impl<T, K: core::fmt::Debug> core::fmt::Debug for Repeater<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Repeater")
            .field("options", &self.options)
            .field("len", &self.records.len())
            .field("view", &self.view)
            .field("render_scheduled", &self.pending_render.is_some())
            .field("pacer", &self.pacer)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

/// `allow_end` admits `index == len` (insertion at the end).
fn check_index(op: &'static str, index: usize, len: usize, allow_end: bool) -> Result<()> {
    if index < len || (allow_end && index == len) {
        return Ok(());
    }
    Err(Error::InvalidState { op, index, len })
}

fn same_strategy<S>(a: &Option<S>, b: &Option<S>, eq: impl Fn(&S, &S) -> bool) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => eq(a, b),
        _ => false,
    }
}
