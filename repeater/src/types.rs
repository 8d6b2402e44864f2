use alloc::vec::Vec;
use core::fmt;

/// Stable identity of a rendered instance.
///
/// Assigned the first time an item is observed and kept for as long as the item (by key) stays in
/// the source collection, regardless of filtering or reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mutation already applied to the caller-owned source collection.
///
/// Indexes refer to the collection as the engine last knew it, before this change.
#[derive(Clone, Copy, Debug)]
pub enum Change<'a, T> {
    Added { index: usize, item: &'a T },
    Removed { index: usize },
    Replaced { index: usize, item: &'a T },
    Splice {
        start: usize,
        removed: usize,
        added: &'a [T],
    },
    /// A sub-field of the item at `index` changed, e.g. `"manager.type"`.
    PathMutated { index: usize, path: &'a str },
}

/// One step of a view patch.
///
/// Indexes are positions in the view as it stands when the op is applied, so a consumer applies
/// [`Delta::ops`] strictly in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaOp {
    Remove {
        index: usize,
        id: InstanceId,
    },
    /// `to` is the index after the element has been taken out at `from`.
    Move {
        from: usize,
        to: usize,
        id: InstanceId,
    },
    Insert {
        index: usize,
        id: InstanceId,
    },
}

impl DeltaOp {
    pub fn id(&self) -> InstanceId {
        match *self {
            Self::Remove { id, .. } | Self::Move { id, .. } | Self::Insert { id, .. } => id,
        }
    }
}

/// The outcome of a render or chunk pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    /// View patch: removals (descending), then moves, then insertions (ascending).
    pub ops: Vec<DeltaOp>,
    /// Instances materialized by this pass, in view order.
    pub stamped: Vec<InstanceId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.stamped.is_empty()
    }
}

/// How many newly visible instances are materialized per pass.
///
/// `initial_count = None` stamps everything in the render that made it visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderBudget {
    pub initial_count: Option<usize>,
    /// Frame rate the adaptive chunk size aims for. `None` keeps the chunk size fixed.
    pub target_framerate: Option<u32>,
}

impl RenderBudget {
    pub fn chunked(initial_count: usize, target_framerate: u32) -> Self {
        Self {
            initial_count: Some(initial_count),
            target_framerate: Some(target_framerate),
        }
    }

    pub(crate) fn target_frame_ms(&self) -> Option<f64> {
        self.target_framerate
            .filter(|&fps| fps > 0)
            .map(|fps| 1000.0 / fps as f64)
    }
}
