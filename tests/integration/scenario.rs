//! The canonical end-to-end lifecycle
//!
//! One world, two bodies with attached objects, one explicit body destroy,
//! then a world cascade. Every release must happen exactly once and the
//! survivors must be untouched until their turn.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use planar::binding::{Binding, UserData};
use planar::native::StubEngine;

struct Guard(Arc<AtomicUsize>);

impl Drop for Guard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn guarded() -> (UserData, Arc<AtomicUsize>) {
    let drops = Arc::new(AtomicUsize::new(0));
    let object: UserData = Arc::new(Guard(Arc::clone(&drops)));
    (object, drops)
}

#[test]
fn explicit_destroy_then_world_cascade() {
    let binding = Binding::new(StubEngine::new());

    let world = binding.create_world().unwrap();
    let body1 = binding.create_body(world).unwrap();
    let (object1, drops1) = guarded();
    binding.attach_user_data(body1, object1).unwrap();

    let body2 = binding.create_body(world).unwrap();
    let (object2, drops2) = guarded();
    binding.attach_user_data(body2, object2).unwrap();

    // Destroy body1 explicitly: its object is released, body2 is untouched,
    // and the world now owns only body2.
    binding.destroy_body(body1).unwrap();

    assert_eq!(drops1.load(Ordering::SeqCst), 1);
    assert_eq!(drops2.load(Ordering::SeqCst), 0);
    assert!(!binding.is_valid(body1));
    assert!(binding.is_valid(body2));
    assert_eq!(binding.bodies(world).unwrap(), vec![body2]);
    let got = binding.user_data(body2).unwrap();
    assert!(got.is_some());

    // Destroy the world: body2's object is released, the container is gone,
    // and both surviving handles are stale.
    binding.destroy_world(world).unwrap();

    assert_eq!(drops1.load(Ordering::SeqCst), 1); // never re-released
    assert_eq!(drops2.load(Ordering::SeqCst), 1);
    assert_eq!(binding.attachment_count(), 0);
    assert_eq!(binding.world_count(), 0);
    assert!(!binding.is_valid(body2));
    assert!(!binding.is_valid(world));
}

#[test]
fn fresh_world_reuses_the_slot_without_inheriting_anything() {
    let binding = Binding::new(StubEngine::new());

    let old = binding.create_world().unwrap();
    binding.attach_user_data(old, Arc::new(1_i32)).unwrap();
    let old_body = binding.create_body(old).unwrap();
    binding.destroy_world(old).unwrap();

    let new = binding.create_world().unwrap();
    assert_eq!(new.index1, old.index1);
    assert_ne!(new, old);

    // The recycled world slot starts clean.
    assert!(binding.user_data(new).unwrap().is_none());
    assert_eq!(binding.body_count(new).unwrap(), 0);
    assert!(!binding.is_valid(old_body));

    // And the stale world handle stays rejected even though its container
    // id now belongs to the new world.
    assert!(binding.destroy_world(old).is_err());
    assert!(binding.is_valid(new));
}
