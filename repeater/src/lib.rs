//! A headless list projection engine.
//!
//! For host-side utilities (owned collections, delta presenters), see the `repeater-adapter`
//! crate.
//!
//! This crate maintains a derived view over a caller-owned collection: filtered, stably sorted,
//! and materialized in chunks. Every re-derivation is reported as an ordered patch of
//! insert/remove/move operations over stable instance ids, so a presentation layer can update
//! incrementally instead of rebuilding.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - the source items (as a slice) and a description of each mutation
//! - a periodic tick (e.g. a frame callback) for scheduled renders and chunked stamping
//! - something that consumes [`Delta`]s
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod delta;
mod error;
mod gate;
mod key;
mod options;
mod pacer;
mod path;
mod repeater;
mod selection;
mod sort;
mod strategy;
mod types;


pub use error::{Error, Result, Stage, StrategyError};
pub use gate::{Gate, GateAction, GateState};
pub use key::ItemKey;
pub use options::{KeyOf, OnDeltaCallback, RepeaterOptions, RequestTick};
pub use pacer::ChunkPacer;
pub use path::FieldPath;
pub use repeater::Repeater;
pub use selection::{Selection, SelectionMode};
pub use strategy::{Comparator, Filter};
pub use types::{Change, Delta, DeltaOp, InstanceId, RenderBudget};
