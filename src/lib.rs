//! Planar - handle, user-data, and ownership layer for a native 2D physics
//! engine.
//!
//! This crate re-exports all layers of the Planar binding for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: planar_binding    - object bridge, ownership index, checked registry
//! Layer 1: planar_native     - native engine boundary, validity oracle, stub engine
//! Layer 0: planar_foundation - handle types and error taxonomy
//! ```

pub use planar_binding as binding;
pub use planar_foundation as foundation;
pub use planar_native as native;
