//! Handle types and error taxonomy for the Planar physics binding.
//!
//! This crate provides:
//! - [`WorldId`], [`BodyId`], [`JointId`], [`ShapeId`] - Generational handles
//!   with layouts pinned to the native engine's ABI
//! - [`RawHandle`] / [`EntityKind`] - Kind-erased handle descriptors for
//!   diagnostics and error payloads
//! - [`Error`] / [`Result`] - The binding's error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod handle;

pub use error::{Error, ErrorKind, Result};
pub use handle::{BodyId, EntityKind, JointId, RawHandle, ShapeId, WorldId};
