//! Integration tests for Layer 0: Foundation
//!
//! Tests for handle types, ABI layout, and the error taxonomy.

mod errors;
mod handles;
