//! Integration tests for Layer 2: Binding
//!
//! Tests for the object bridge, the ownership index, and checked entity
//! lifecycles through the registry.

mod lifecycle;
