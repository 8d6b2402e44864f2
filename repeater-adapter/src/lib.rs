//! Host-side utilities for the `repeater` crate.
//!
//! The `repeater` crate is UI-agnostic and never owns items. This crate provides small,
//! framework-neutral helpers commonly needed by hosts:
//!
//! - [`Controller`]: owns the source `Vec<T>` and reports every mutation to the engine
//! - [`Presenter`] / [`apply_delta`]: patch a presentation layer from a [`repeater::Delta`]
//!
//! This crate is intentionally framework-agnostic (no DOM/ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod presenter;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use presenter::{Presenter, apply_delta};
