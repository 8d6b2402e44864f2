use alloc::vec::Vec;
use core::mem;
use core::ops::Range;

use repeater::{
    Change, Comparator, Delta, Error, Filter, InstanceId, ItemKey, Repeater, RepeaterOptions,
    Result,
};

/// A framework-neutral controller that owns the source collection and keeps a
/// `repeater::Repeater` informed of every mutation.
///
/// This plays the part of a host's observable array: each mutating method updates the `Vec`,
/// then reports the matching [`Change`]. Adapters drive it by calling:
/// - `render()` when they need the view synchronously
/// - `tick(now_ms)` each frame/timer tick (scheduled renders, chunked stamping)
#[derive(Debug)]
pub struct Controller<T, K> {
    items: Vec<T>,
    r: Repeater<T, K>,
}

impl<T, K: ItemKey> Controller<T, K> {
    pub fn new(options: RepeaterOptions<T, K>, items: Vec<T>) -> Self {
        let r = Repeater::with_source(options, &items);
        Self { items, r }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn repeater(&self) -> &Repeater<T, K> {
        &self.r
    }

    /// Mutable access to the engine, e.g. for selection mode or options.
    pub fn repeater_mut(&mut self) -> &mut Repeater<T, K> {
        &mut self.r
    }

    pub fn into_parts(self) -> (Vec<T>, Repeater<T, K>) {
        (self.items, self.r)
    }

    /// Replaces the whole collection; the engine rebuilds from scratch.
    pub fn set_items(&mut self, items: Vec<T>) -> Result<Vec<T>> {
        let old = mem::replace(&mut self.items, items);
        self.r.set_source(&self.items)?;
        Ok(old)
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        self.insert(self.items.len(), item)
    }

    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.items.len() {
            return Err(out_of_bounds("item-added", index, self.items.len()));
        }
        self.items.insert(index, item);
        self.r.notify_change(Change::Added {
            index,
            item: &self.items[index],
        })
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(out_of_bounds("item-removed", index, self.items.len()));
        }
        let item = self.items.remove(index);
        self.r.notify_change(Change::Removed { index })?;
        Ok(item)
    }

    pub fn replace(&mut self, index: usize, item: T) -> Result<T> {
        let Some(slot) = self.items.get_mut(index) else {
            return Err(out_of_bounds("item-replaced", index, self.items.len()));
        };
        let old = mem::replace(slot, item);
        self.r.notify_change(Change::Replaced {
            index,
            item: &self.items[index],
        })?;
        Ok(old)
    }

    /// Replaces `range` with `added`, returning the removed items.
    pub fn splice(&mut self, range: Range<usize>, added: Vec<T>) -> Result<Vec<T>> {
        let len = self.items.len();
        if range.start > range.end || range.end > len {
            return Err(out_of_bounds("splice", range.end, len));
        }
        let start = range.start;
        let removed = range.len();
        let count = added.len();
        let old: Vec<T> = self.items.splice(range, added).collect();
        self.r.notify_change(Change::Splice {
            start,
            removed,
            added: &self.items[start..start + count],
        })?;
        Ok(old)
    }

    /// Mutates a sub-field of the item at `index` and reports it as a path mutation.
    ///
    /// Only paths listed in the engine's `observe` option re-run filter and sort.
    pub fn mutate(&mut self, index: usize, path: &str, f: impl FnOnce(&mut T)) -> Result<()> {
        let Some(item) = self.items.get_mut(index) else {
            return Err(out_of_bounds("path-mutated", index, self.items.len()));
        };
        f(item);
        self.r.notify_change(Change::PathMutated { index, path })
    }

    pub fn render(&mut self) -> Result<Delta> {
        self.r.render(&self.items)
    }

    pub fn schedule_render(&mut self) -> Result<()> {
        self.r.schedule_render()
    }

    /// Advances the engine by one scheduler tick.
    pub fn tick(&mut self, now_ms: u64) -> Result<Delta> {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "repeater_adapter", now_ms, "Controller::tick");
        self.r.tick(&self.items, now_ms)
    }

    pub fn needs_tick(&self) -> bool {
        self.r.needs_tick()
    }

    pub fn set_filter(&mut self, filter: Option<Filter<T>>) -> Result<()> {
        self.r.set_filter(filter)
    }

    pub fn set_sort(&mut self, sort: Option<Comparator<T>>) -> Result<()> {
        self.r.set_sort(sort)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.r.index_of(&self.items, item)
    }

    pub fn position_of(&self, item: &T) -> Option<usize> {
        self.r.position_of(item)
    }

    /// The item backing an instance, if it is still in the collection.
    pub fn item_for_instance(&self, id: InstanceId) -> Option<&T> {
        self.r
            .source_index_of_instance(id)
            .and_then(|i| self.items.get(i))
    }

    /// Items in committed view order.
    pub fn view_items(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.r.view().len());
        self.r.for_each_view_item(&self.items, |_, _, item| out.push(item));
        out
    }

    pub fn select(&mut self, index: usize) -> Result<bool> {
        self.r.select_index(&self.items, index)
    }

    pub fn deselect(&mut self, index: usize) -> Result<bool> {
        self.r.deselect_index(&self.items, index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.r.is_index_selected(&self.items, index)
    }

    /// Selected items in source order.
    pub fn selected_items(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.r.is_selected(item))
            .collect()
    }
}

fn out_of_bounds(op: &'static str, index: usize, len: usize) -> Error {
    Error::InvalidState { op, index, len }
}
