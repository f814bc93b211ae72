//! Native engine boundary for the Planar binding.
//!
//! This crate provides:
//! - [`NativeEngine`] - The trait modeling the native engine's entry points
//!   (the unchecked tier and the validity oracle)
//! - [`EngineEntity`] - Per-handle-kind dispatch so callers can be generic
//!   over worlds, bodies, and joints
//! - [`UserDataToken`] - The opaque machine word exchanged through the
//!   engine's user-data slots
//! - [`StubEngine`] - An in-memory engine reproducing the native allocator's
//!   observable slot semantics, for tests and engine-less embedding

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod api;
mod stub;

pub use api::{EngineEntity, NativeEngine, UserDataToken};
pub use stub::StubEngine;
