//! Integration tests for the error taxonomy

use planar_foundation::{BodyId, Error, ErrorKind, WorldId};

#[test]
fn invalid_handle_carries_the_offender() {
    let err = Error::invalid_handle(BodyId::new(5, 1, 2));

    let ErrorKind::InvalidHandle(raw) = err.kind else {
        panic!("expected InvalidHandle");
    };
    assert_eq!(raw.index1, 5);
    assert_eq!(raw.world0, 1);
    assert_eq!(raw.generation, 2);
}

#[test]
fn unknown_handle_message_is_readable() {
    let err = Error::unknown_handle(WorldId::new(3, 1));
    let msg = format!("{err}");
    assert!(msg.contains("unknown handle"));
    assert!(msg.contains("world 3v1"));
}

#[test]
fn foreign_call_passes_detail_through() {
    let err = Error::foreign_call("world_create", "world table exhausted");
    let msg = format!("{err}");
    assert!(msg.contains("world_create"));
    assert!(msg.contains("world table exhausted"));
}

#[test]
fn errors_are_std_errors() {
    fn takes_std_error(_: &dyn std::error::Error) {}
    takes_std_error(&Error::internal("x"));
}
