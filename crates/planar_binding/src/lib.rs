//! Object bridge, ownership index, and checked registry for Planar.
//!
//! This crate provides:
//! - [`ObjectBridge`] - Slot table associating native-held user-data tokens
//!   with caller-owned objects
//! - [`OwnershipIndex`] - Per-world registry of child handles, driving
//!   cascading destroy
//! - [`Binding`] - The checked orchestrator tying engine, bridge, and index
//!   together behind one lock

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bridge;
mod index;
mod registry;

pub use bridge::{ObjectBridge, UserData};
pub use index::{Children, OwnershipIndex};
pub use registry::Binding;
