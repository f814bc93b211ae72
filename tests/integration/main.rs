//! Cross-layer integration tests for Planar
//!
//! End-to-end lifecycles through engine, bridge, and index together.

mod scenario;
