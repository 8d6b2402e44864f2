use alloc::sync::Arc;
use core::cmp::Ordering;
use core::fmt;

use crate::StrategyError;

type FilterFn<T> = dyn Fn(&T) -> Result<bool, StrategyError> + Send + Sync;
type CompareFn<T> = dyn Fn(&T, &T) -> Result<Ordering, StrategyError> + Send + Sync;

/// A predicate deciding which items appear in the view.
///
/// Must be a pure function of the item; capture any outside state when constructing it.
/// Cloning is cheap, and [`crate::Repeater::set_options`] compares filters by pointer.
pub struct Filter<T>(Arc<FilterFn<T>>);

impl<T> Filter<T> {
    pub fn new(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(move |item| Ok(f(item))))
    }

    /// A filter that may fail. A failure aborts the render that evaluated it.
    pub fn fallible(f: impl Fn(&T) -> Result<bool, StrategyError> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn test(&self, item: &T) -> Result<bool, StrategyError> {
        (self.0)(item)
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Ordering of the view.
///
/// Sorting is stable: items comparing equal keep their source order. A comparator that is not a
/// total order is not detected.
pub struct Comparator<T>(Arc<CompareFn<T>>);

impl<T> Comparator<T> {
    pub fn new(f: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self(Arc::new(move |a, b| Ok(f(a, b))))
    }

    pub fn fallible(
        f: impl Fn(&T, &T) -> Result<Ordering, StrategyError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Sorts ascending by a derived key.
    pub fn by_key<V: Ord>(f: impl Fn(&T) -> V + Send + Sync + 'static) -> Self {
        Self::new(move |a, b| f(a).cmp(&f(b)))
    }

    pub(crate) fn compare(&self, a: &T, b: &T) -> Result<Ordering, StrategyError> {
        (self.0)(a, b)
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}
