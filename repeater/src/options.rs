use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{Comparator, Delta, FieldPath, Filter, RenderBudget};

/// Maps an item to its identity key.
pub type KeyOf<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// A callback fired after a render or chunk pass produced a non-empty [`Delta`].
pub type OnDeltaCallback = Arc<dyn Fn(&Delta) + Send + Sync>;

/// Asks the host to run [`crate::Repeater::tick`] on its next frame.
///
/// Returning `false` means the host cannot schedule work; `schedule_render` then fails with
/// [`crate::Error::SchedulerUnavailable`].
pub type RequestTick = Arc<dyn Fn() -> bool + Send + Sync>;

/// Configuration for [`crate::Repeater`].
///
/// Cheap to clone: closures live in `Arc`s, so hosts can tweak a field and call
/// `Repeater::set_options` without rebuilding them.
pub struct RepeaterOptions<T, K> {
    pub key_of: KeyOf<T, K>,
    pub filter: Option<Filter<T>>,
    pub sort: Option<Comparator<T>>,

    /// Sub-field paths whose mutation re-runs filter and sort for the mutated item.
    ///
    /// Mutations on other paths are ignored by the projection.
    pub observe: Vec<FieldPath>,

    pub budget: RenderBudget,

    /// Minimum time between the first tick that sees a scheduled render and the render itself.
    pub delay_ms: u64,

    pub on_delta: Option<OnDeltaCallback>,

    /// Optional hook used by `schedule_render`. Without it the host is expected to tick every frame.
    pub request_tick: Option<RequestTick>,
}

impl<T, K> Clone for RepeaterOptions<T, K> {
    fn clone(&self) -> Self {
        Self {
            key_of: Arc::clone(&self.key_of),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            observe: self.observe.clone(),
            budget: self.budget,
            delay_ms: self.delay_ms,
            on_delta: self.on_delta.clone(),
            request_tick: self.request_tick.clone(),
        }
    }
}

impl<T: Clone + 'static> RepeaterOptions<T, T> {
    /// Options for items that are their own identity (e.g. ids or interned handles).
    pub fn by_value() -> Self {
        Self::new_with_key(T::clone)
    }
}

impl<T, K> RepeaterOptions<T, K> {
    /// Creates options with a custom identity mapping.
    ///
    /// `key_of(item)` should be unique within the collection and stable while the item lives in
    /// it; instance identity and selection follow the key.
    pub fn new_with_key(key_of: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self {
            key_of: Arc::new(key_of),
            filter: None,
            sort: None,
            observe: Vec::new(),
            budget: RenderBudget::default(),
            delay_ms: 0,
            on_delta: None,
            request_tick: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<Filter<T>>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: Option<Comparator<T>>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets observed paths from a whitespace-separated list, e.g. `"type manager.type"`.
    pub fn with_observe(mut self, paths: &str) -> Self {
        self.observe = FieldPath::parse_list(paths);
        self
    }

    pub fn with_budget(mut self, budget: RenderBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_initial_count(mut self, initial_count: usize) -> Self {
        self.budget.initial_count = Some(initial_count);
        self
    }

    pub fn with_target_framerate(mut self, target_framerate: u32) -> Self {
        self.budget.target_framerate = Some(target_framerate);
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_on_delta(mut self, on_delta: Option<impl Fn(&Delta) + Send + Sync + 'static>) -> Self {
        self.on_delta = on_delta.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_request_tick(
        mut self,
        request_tick: Option<impl Fn() -> bool + Send + Sync + 'static>,
    ) -> Self {
        self.request_tick = request_tick.map(|f| Arc::new(f) as _);
        self
    }

    pub(crate) fn observes(&self, mutated: &str) -> bool {
        self.observe.iter().any(|p| p.is_affected_by(mutated))
    }
}

impl<T, K> core::fmt::Debug for RepeaterOptions<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RepeaterOptions")
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("observe", &self.observe)
            .field("budget", &self.budget)
            .field("delay_ms", &self.delay_ms)
            .finish_non_exhaustive()
    }
}
