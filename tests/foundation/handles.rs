//! Integration tests for handle semantics
//!
//! Handles are plain values: copyable, comparable, hashable, and silent
//! about whether their entity still exists.

use std::collections::HashSet;

use planar_foundation::{BodyId, EntityKind, JointId, RawHandle, ShapeId, WorldId};

// =============================================================================
// Equality
// =============================================================================

#[test]
fn equality_is_field_wise() {
    assert_eq!(WorldId::new(1, 2), WorldId::new(1, 2));
    assert_ne!(WorldId::new(1, 2), WorldId::new(1, 3));
    assert_ne!(WorldId::new(1, 2), WorldId::new(2, 2));

    assert_eq!(BodyId::new(4, 1, 0), BodyId::new(4, 1, 0));
    assert_ne!(BodyId::new(4, 1, 0), BodyId::new(4, 2, 0));
}

#[test]
fn equality_does_not_imply_validity() {
    // A handle is just bits; copies stay equal forever even though the
    // entity behind them may be long gone.
    let handle = BodyId::new(9, 1, 4);
    let copy = handle;
    let reconstructed = BodyId::new(9, 1, 4);

    assert_eq!(handle, copy);
    assert_eq!(handle, reconstructed);
}

#[test]
fn handles_work_as_hash_keys() {
    let mut set = HashSet::new();
    set.insert(BodyId::new(1, 1, 0));
    set.insert(BodyId::new(1, 1, 1));
    set.insert(BodyId::new(1, 1, 0)); // duplicate

    assert_eq!(set.len(), 2);
    assert!(set.contains(&BodyId::new(1, 1, 1)));
}

// =============================================================================
// Null sentinels
// =============================================================================

#[test]
fn index_zero_is_null_for_every_kind() {
    assert!(WorldId::NULL.is_null());
    assert!(BodyId::NULL.is_null());
    assert!(JointId::NULL.is_null());
    assert!(ShapeId::NULL.is_null());

    // Only the index decides nullness; stray generations do not.
    assert!(BodyId::new(0, 3, 7).is_null());
    assert!(!BodyId::new(1, 0, 0).is_null());
}

// =============================================================================
// Raw handle descriptors
// =============================================================================

#[test]
fn raw_handle_preserves_kind_and_fields() {
    let cases: Vec<(RawHandle, EntityKind)> = vec![
        (WorldId::new(2, 5).into(), EntityKind::World),
        (BodyId::new(3, 2, 1).into(), EntityKind::Body),
        (JointId::new(4, 2, 0).into(), EntityKind::Joint),
        (ShapeId::new(5, 2, 9).into(), EntityKind::Shape),
    ];

    for (raw, kind) in cases {
        assert_eq!(raw.kind, kind);
        assert!(raw.index1 > 0);
    }
}

#[test]
fn raw_handle_display_names_the_kind() {
    let raw: RawHandle = ShapeId::new(5, 2, 9).into();
    let text = format!("{raw}");
    assert!(text.contains("shape"));
    assert!(text.contains('5'));
}
