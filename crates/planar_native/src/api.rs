//! The native engine boundary.
//!
//! [`NativeEngine`] models the handle-bearing entry points of the native 2D
//! physics engine: create, destroy, validity, and the user-data word, for
//! each entity kind. Every method is a single atomic round-trip: it either
//! fully succeeds and the native slot is updated, or it is assumed not to
//! have happened.
//!
//! This is the *unchecked* tier of the binding. Apart from the `*_is_valid`
//! oracles, which must answer truthfully for any bit pattern, methods assume
//! the caller has already validated the handles they pass. The checked tier
//! lives in `planar_binding` and validates through the oracle before every
//! call.

use std::fmt;

use planar_foundation::{BodyId, JointId, RawHandle, Result, WorldId};

/// The opaque machine word stored in a native entity's user-data slot.
///
/// The engine stores and returns this word verbatim but never interprets,
/// dereferences, or frees it. On the managed side it is meaningful only as a
/// lookup key into the object bridge; it must never be treated as a pointer.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct UserDataToken(pub u64);

impl UserDataToken {
    /// The null token, meaning "no user data attached".
    pub const NULL: Self = Self(0);

    /// Returns true if this is the null token.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for UserDataToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "UserDataToken(null)")
        } else {
            write!(f, "UserDataToken({:#x})", self.0)
        }
    }
}

// The token crosses the boundary as one machine word.
const _: () = assert!(size_of::<UserDataToken>() == 8);
const _: () = assert!(align_of::<UserDataToken>() == 8);

/// Handle-bearing entry points of the native engine.
///
/// Implemented by [`StubEngine`](crate::StubEngine) in-process and by the
/// FFI shim when linking the real engine. The `*_is_valid` methods are the
/// validity oracle: safe on zeroed, garbage, or stale handles, they compare
/// the handle's generation against the live slot and never crash. The
/// user-data accessors are unchecked; reading through a stale handle yields
/// the null token, writing through one is ignored.
pub trait NativeEngine {
    /// Creates a new world.
    ///
    /// # Errors
    ///
    /// Returns a foreign-call error if the engine's world table is exhausted.
    fn create_world(&mut self) -> Result<WorldId>;

    /// Destroys a world and everything it owns on the native side.
    ///
    /// # Errors
    ///
    /// Returns an invalid-handle error if the handle is stale.
    fn destroy_world(&mut self, world: WorldId) -> Result<()>;

    /// Returns true if the world handle refers to a live world.
    fn world_is_valid(&self, world: WorldId) -> bool;

    /// Reads the world's user-data word. Null token if the handle is stale.
    fn world_user_data(&self, world: WorldId) -> UserDataToken;

    /// Writes the world's user-data word. Ignored if the handle is stale.
    fn set_world_user_data(&mut self, world: WorldId, token: UserDataToken);

    /// Creates a body in the given world.
    ///
    /// # Errors
    ///
    /// Returns an invalid-handle error if the world handle is stale.
    fn create_body(&mut self, world: WorldId) -> Result<BodyId>;

    /// Destroys a body.
    ///
    /// # Errors
    ///
    /// Returns an invalid-handle error if the handle is stale.
    fn destroy_body(&mut self, body: BodyId) -> Result<()>;

    /// Returns true if the body handle refers to a live body.
    fn body_is_valid(&self, body: BodyId) -> bool;

    /// Reads the body's user-data word. Null token if the handle is stale.
    fn body_user_data(&self, body: BodyId) -> UserDataToken;

    /// Writes the body's user-data word. Ignored if the handle is stale.
    fn set_body_user_data(&mut self, body: BodyId, token: UserDataToken);

    /// Creates a joint connecting two bodies of the given world.
    ///
    /// # Errors
    ///
    /// Returns an invalid-handle error if any handle is stale or the bodies
    /// do not belong to the world.
    fn create_joint(&mut self, world: WorldId, a: BodyId, b: BodyId) -> Result<JointId>;

    /// Destroys a joint.
    ///
    /// # Errors
    ///
    /// Returns an invalid-handle error if the handle is stale.
    fn destroy_joint(&mut self, joint: JointId) -> Result<()>;

    /// Returns true if the joint handle refers to a live joint.
    fn joint_is_valid(&self, joint: JointId) -> bool;

    /// Reads the joint's user-data word. Null token if the handle is stale.
    fn joint_user_data(&self, joint: JointId) -> UserDataToken;

    /// Writes the joint's user-data word. Ignored if the handle is stale.
    fn set_joint_user_data(&mut self, joint: JointId, token: UserDataToken);
}

/// Per-kind dispatch for handle-generic code.
///
/// User-data attachment and validity checking work identically for worlds,
/// bodies, and joints; this trait routes each to the matching engine entry
/// point so the bridge and registry can be written once.
pub trait EngineEntity: Copy + Into<RawHandle> {
    /// Returns true if this is the null sentinel.
    fn is_null(self) -> bool;

    /// Asks the validity oracle whether this handle is live.
    fn is_valid<E: NativeEngine + ?Sized>(self, engine: &E) -> bool;

    /// Reads this entity's user-data word.
    fn user_data<E: NativeEngine + ?Sized>(self, engine: &E) -> UserDataToken;

    /// Writes this entity's user-data word.
    fn set_user_data<E: NativeEngine + ?Sized>(self, engine: &mut E, token: UserDataToken);
}

macro_rules! engine_entity {
    ($ty:ident, $is_valid:ident, $user_data:ident, $set_user_data:ident) => {
        impl EngineEntity for $ty {
            fn is_null(self) -> bool {
                $ty::is_null(self)
            }

            fn is_valid<E: NativeEngine + ?Sized>(self, engine: &E) -> bool {
                engine.$is_valid(self)
            }

            fn user_data<E: NativeEngine + ?Sized>(self, engine: &E) -> UserDataToken {
                engine.$user_data(self)
            }

            fn set_user_data<E: NativeEngine + ?Sized>(
                self,
                engine: &mut E,
                token: UserDataToken,
            ) {
                engine.$set_user_data(self, token);
            }
        }
    };
}

engine_entity!(WorldId, world_is_valid, world_user_data, set_world_user_data);
engine_entity!(BodyId, body_is_valid, body_user_data, set_body_user_data);
engine_entity!(JointId, joint_is_valid, joint_user_data, set_joint_user_data);
