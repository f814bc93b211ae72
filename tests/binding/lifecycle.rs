//! Integration tests for checked entity lifecycles
//!
//! World/body/joint create and destroy through the registry, stale-handle
//! rejection, and double-destroy detection.

use std::collections::HashSet;

use planar_binding::Binding;
use planar_foundation::ErrorKind;
use planar_native::StubEngine;

fn binding() -> Binding<StubEngine> {
    Binding::new(StubEngine::new())
}

// =============================================================================
// Creation
// =============================================================================

#[test]
fn worlds_are_independent_containers() {
    let binding = binding();
    let w1 = binding.create_world().unwrap();
    let w2 = binding.create_world().unwrap();

    let b1 = binding.create_body(w1).unwrap();
    let _b2 = binding.create_body(w2).unwrap();

    assert_eq!(binding.body_count(w1).unwrap(), 1);
    assert_eq!(binding.body_count(w2).unwrap(), 1);

    binding.destroy_world(w1).unwrap();
    assert!(!binding.is_valid(b1));
    assert_eq!(binding.body_count(w2).unwrap(), 1);
}

#[test]
fn generation_pairs_never_repeat_across_churn() {
    let binding = binding();
    let w = binding.create_world().unwrap();
    let mut seen = HashSet::new();

    // Interleave creates and destroys so the free list gets exercised.
    let mut live = Vec::new();
    for round in 0..64 {
        let b = binding.create_body(w).unwrap();
        assert!(
            seen.insert((b.index1, b.generation)),
            "pair reused at round {round}"
        );
        live.push(b);
        if round % 3 == 0 {
            let victim = live.swap_remove(0);
            binding.destroy_body(victim).unwrap();
        }
    }
}

// =============================================================================
// Stale rejection
// =============================================================================

#[test]
fn destroyed_body_fails_every_checked_operation() {
    let binding = binding();
    let w = binding.create_world().unwrap();
    let b = binding.create_body(w).unwrap();
    binding.destroy_body(b).unwrap();

    assert!(!binding.is_valid(b));
    assert!(matches!(
        binding.user_data(b).unwrap_err().kind,
        ErrorKind::InvalidHandle(_)
    ));
    assert!(matches!(
        binding.detach_user_data(b).unwrap_err().kind,
        ErrorKind::InvalidHandle(_)
    ));
}

#[test]
fn handle_reuse_does_not_resurrect_old_handles() {
    let binding = binding();
    let w = binding.create_world().unwrap();
    let old = binding.create_body(w).unwrap();
    binding.destroy_body(old).unwrap();

    let new = binding.create_body(w).unwrap();
    assert_eq!(new.index1, old.index1); // slot reused
    assert_ne!(new, old); // but a different entity

    assert!(binding.is_valid(new));
    assert!(!binding.is_valid(old));
}

#[test]
fn null_handles_are_never_valid() {
    let binding = binding();
    let _ = binding.create_world().unwrap();

    assert!(!binding.is_valid(planar_foundation::WorldId::NULL));
    assert!(!binding.is_valid(planar_foundation::BodyId::NULL));
    assert!(!binding.is_valid(planar_foundation::JointId::NULL));
}

// =============================================================================
// Double destroy
// =============================================================================

#[test]
fn double_destroy_is_unknown_handle_not_a_native_crash() {
    let binding = binding();
    let w = binding.create_world().unwrap();
    let b = binding.create_body(w).unwrap();

    binding.destroy_body(b).unwrap();
    assert!(matches!(
        binding.destroy_body(b).unwrap_err().kind,
        ErrorKind::UnknownHandle(_)
    ));

    binding.destroy_world(w).unwrap();
    assert!(matches!(
        binding.destroy_world(w).unwrap_err().kind,
        ErrorKind::UnknownHandle(_)
    ));
}

// =============================================================================
// Joints
// =============================================================================

#[test]
fn joint_lifecycle_mirrors_bodies() {
    let binding = binding();
    let w = binding.create_world().unwrap();
    let a = binding.create_body(w).unwrap();
    let b = binding.create_body(w).unwrap();

    let j = binding.create_joint(w, a, b).unwrap();
    assert!(binding.is_valid(j));
    assert_eq!(binding.joints(w).unwrap(), vec![j]);

    binding.destroy_joint(j).unwrap();
    assert!(!binding.is_valid(j));
    assert!(binding.joints(w).unwrap().is_empty());
    assert!(matches!(
        binding.destroy_joint(j).unwrap_err().kind,
        ErrorKind::UnknownHandle(_)
    ));
}

#[test]
fn joint_creation_rejects_stale_bodies() {
    let binding = binding();
    let w = binding.create_world().unwrap();
    let a = binding.create_body(w).unwrap();
    let b = binding.create_body(w).unwrap();
    binding.destroy_body(b).unwrap();

    assert!(matches!(
        binding.create_joint(w, a, b).unwrap_err().kind,
        ErrorKind::InvalidHandle(_)
    ));
}

// =============================================================================
// Enumeration
// =============================================================================

#[test]
fn enumeration_reflects_explicit_destroys() {
    let binding = binding();
    let w = binding.create_world().unwrap();
    let bodies: Vec<_> = (0..5).map(|_| binding.create_body(w).unwrap()).collect();

    binding.destroy_body(bodies[1]).unwrap();
    binding.destroy_body(bodies[3]).unwrap();

    let listed: HashSet<_> = binding.bodies(w).unwrap().into_iter().collect();
    let expected: HashSet<_> = [bodies[0], bodies[2], bodies[4]].into_iter().collect();
    assert_eq!(listed, expected);
}
