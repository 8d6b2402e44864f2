use alloc::string::String;
use core::fmt;

/// Which strategy failed during a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Filter,
    Sort,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter => f.write_str("filter"),
            Self::Sort => f.write_str("sort"),
        }
    }
}

/// Error returned by a fallible [`crate::Filter`] or [`crate::Comparator`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StrategyError {
    pub message: String,
}

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A change descriptor does not fit the collection the engine is tracking.
    #[error("{op}: index {index} is out of bounds for {len} items")]
    InvalidState {
        op: &'static str,
        index: usize,
        len: usize,
    },
    /// The render was abandoned; the previous view is untouched.
    #[error("{stage} failed at source index {index}: {source}")]
    ProjectionFailure {
        stage: Stage,
        index: usize,
        source: StrategyError,
    },
    #[error("scheduler unavailable")]
    SchedulerUnavailable,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
