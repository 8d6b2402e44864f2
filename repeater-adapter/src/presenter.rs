use alloc::vec::Vec;

use repeater::{Delta, DeltaOp, InstanceId};

/// Something that mirrors the view: a widget list, a DOM container, a render tree.
///
/// Indexes follow the sequential semantics of [`Delta::ops`].
pub trait Presenter {
    fn insert(&mut self, index: usize, id: InstanceId);
    fn remove(&mut self, index: usize, id: InstanceId);
    /// `to` is the index after the element was taken out at `from`.
    fn move_item(&mut self, from: usize, to: usize, id: InstanceId);
    /// The instance's content should be materialized now.
    fn stamp(&mut self, _id: InstanceId) {}
}

/// Applies `delta` to `presenter`: ops first, in order, then stamps.
pub fn apply_delta(delta: &Delta, presenter: &mut impl Presenter) {
    for op in &delta.ops {
        match *op {
            DeltaOp::Remove { index, id } => presenter.remove(index, id),
            DeltaOp::Move { from, to, id } => presenter.move_item(from, to, id),
            DeltaOp::Insert { index, id } => presenter.insert(index, id),
        }
    }
    for &id in &delta.stamped {
        presenter.stamp(id);
    }
}

/// A plain mirror of the view.
impl Presenter for Vec<InstanceId> {
    fn insert(&mut self, index: usize, id: InstanceId) {
        Vec::insert(self, index, id);
    }

    fn remove(&mut self, index: usize, id: InstanceId) {
        let removed = Vec::remove(self, index);
        debug_assert_eq!(removed, id, "Presenter: mirror out of sync");
    }

    fn move_item(&mut self, from: usize, to: usize, id: InstanceId) {
        let moved = Vec::remove(self, from);
        debug_assert_eq!(moved, id, "Presenter: mirror out of sync");
        Vec::insert(self, to, moved);
    }
}
