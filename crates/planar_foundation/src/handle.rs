//! Generational handles for native-owned entities.
//!
//! Every entity the native engine owns (worlds, bodies, joints, shapes) is
//! identified by a small copyable handle rather than a pointer. A handle
//! carries the entity's 1-based slot index, the id of its owning world where
//! one exists, and the slot's generation at the time the entity was created.
//! The generation lets the engine detect stale handles after a slot has been
//! recycled.
//!
//! # Layout
//!
//! These structs cross the FFI boundary by value, so their layouts must
//! match the native structs byte-for-byte. All four are `#[repr(C)]`, eight
//! bytes, four-byte aligned; the `const` assertions at the bottom of this
//! module pin size, alignment, and field offsets so a drifting layout fails
//! to compile rather than silently corrupting calls.
//!
//! # Staleness
//!
//! Equality is field-wise and says nothing about validity: a handle compares
//! equal to itself after its entity has been destroyed. Generations are 16
//! bits wide because the native slot counter is; after a slot has been
//! recycled 65 536 times an old handle aliases a new entity. That bounded
//! window is a property of the engine and is documented here rather than
//! papered over.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to a simulation world.
///
/// Worlds are top-level containers, so unlike the child handles there is no
/// owning-world field. The native struct has two trailing padding bytes;
/// they are never read.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct WorldId {
    /// 1-based slot index in the engine's world table. 0 is the null sentinel.
    pub index1: i32,
    /// Slot generation at creation time.
    pub generation: u16,
}

/// Handle to a rigid body owned by a world.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct BodyId {
    /// 1-based slot index in the owning world's body table. 0 is null.
    pub index1: i32,
    /// Id of the owning world.
    pub world0: u16,
    /// Slot generation at creation time.
    pub generation: u16,
}

/// Handle to a joint owned by a world.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct JointId {
    /// 1-based slot index in the owning world's joint table. 0 is null.
    pub index1: i32,
    /// Id of the owning world.
    pub world0: u16,
    /// Slot generation at creation time.
    pub generation: u16,
}

/// Handle to a collision shape owned by a body.
///
/// Shape lifecycle belongs to the accessor surface of the binding; this
/// crate only defines the handle so that surface has a layout-checked type
/// to traffic in.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct ShapeId {
    /// 1-based slot index in the owning world's shape table. 0 is null.
    pub index1: i32,
    /// Id of the owning world.
    pub world0: u16,
    /// Slot generation at creation time.
    pub generation: u16,
}

impl WorldId {
    /// The null world handle.
    pub const NULL: Self = Self {
        index1: 0,
        generation: 0,
    };

    /// Creates a handle from its parts.
    #[must_use]
    pub const fn new(index1: i32, generation: u16) -> Self {
        Self { index1, generation }
    }

    /// Returns true if this is the null sentinel.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index1 == 0
    }
}

macro_rules! child_handle {
    ($ty:ident) => {
        impl $ty {
            /// The null handle.
            pub const NULL: Self = Self {
                index1: 0,
                world0: 0,
                generation: 0,
            };

            /// Creates a handle from its parts.
            #[must_use]
            pub const fn new(index1: i32, world0: u16, generation: u16) -> Self {
                Self {
                    index1,
                    world0,
                    generation,
                }
            }

            /// Returns true if this is the null sentinel.
            #[must_use]
            pub const fn is_null(self) -> bool {
                self.index1 == 0
            }
        }
    };
}

child_handle!(BodyId);
child_handle!(JointId);
child_handle!(ShapeId);

impl fmt::Debug for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "WorldId(null)")
        } else {
            write!(f, "WorldId({}v{})", self.index1, self.generation)
        }
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "World(null)")
        } else {
            write!(f, "World({})", self.index1)
        }
    }
}

macro_rules! child_handle_fmt {
    ($ty:ident, $debug:literal, $display:literal) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_null() {
                    write!(f, concat!($debug, "(null)"))
                } else {
                    write!(
                        f,
                        concat!($debug, "({}v{}@w{})"),
                        self.index1, self.generation, self.world0
                    )
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_null() {
                    write!(f, concat!($display, "(null)"))
                } else {
                    write!(f, concat!($display, "({})"), self.index1)
                }
            }
        }
    };
}

child_handle_fmt!(BodyId, "BodyId", "Body");
child_handle_fmt!(JointId, "JointId", "Joint");
child_handle_fmt!(ShapeId, "ShapeId", "Shape");

/// The kind of native entity a handle refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EntityKind {
    /// A simulation world.
    World,
    /// A rigid body.
    Body,
    /// A joint.
    Joint,
    /// A collision shape.
    Shape,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::World => "world",
            Self::Body => "body",
            Self::Joint => "joint",
            Self::Shape => "shape",
        };
        write!(f, "{name}")
    }
}

/// Kind-erased handle descriptor, used in error payloads and diagnostics.
///
/// Unlike the typed handles this never crosses the FFI boundary, so its
/// layout is unconstrained.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawHandle {
    /// Which entity table the handle indexes.
    pub kind: EntityKind,
    /// 1-based slot index.
    pub index1: i32,
    /// Owning world id; 0 for world handles.
    pub world0: u16,
    /// Slot generation at creation time.
    pub generation: u16,
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawHandle({} {}v{}@w{})",
            self.kind, self.index1, self.generation, self.world0
        )
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index1 == 0 {
            write!(f, "null {} handle", self.kind)
        } else {
            write!(
                f,
                "{} {}v{} (world {})",
                self.kind, self.index1, self.generation, self.world0
            )
        }
    }
}

impl From<WorldId> for RawHandle {
    fn from(id: WorldId) -> Self {
        Self {
            kind: EntityKind::World,
            index1: id.index1,
            world0: 0,
            generation: id.generation,
        }
    }
}

macro_rules! raw_from_child {
    ($ty:ident, $kind:expr) => {
        impl From<$ty> for RawHandle {
            fn from(id: $ty) -> Self {
                Self {
                    kind: $kind,
                    index1: id.index1,
                    world0: id.world0,
                    generation: id.generation,
                }
            }
        }
    };
}

raw_from_child!(BodyId, EntityKind::Body);
raw_from_child!(JointId, EntityKind::Joint);
raw_from_child!(ShapeId, EntityKind::Shape);

// Layout pins. The native structs are 8 bytes, 4-aligned; `WorldId` carries
// two trailing padding bytes, the child handles are padding-free. A change
// that shifts any field breaks the build instead of the ABI.
const _: () = assert!(size_of::<WorldId>() == 8);
const _: () = assert!(align_of::<WorldId>() == 4);
const _: () = assert!(core::mem::offset_of!(WorldId, index1) == 0);
const _: () = assert!(core::mem::offset_of!(WorldId, generation) == 4);

const _: () = assert!(size_of::<BodyId>() == 8);
const _: () = assert!(align_of::<BodyId>() == 4);
const _: () = assert!(core::mem::offset_of!(BodyId, index1) == 0);
const _: () = assert!(core::mem::offset_of!(BodyId, world0) == 4);
const _: () = assert!(core::mem::offset_of!(BodyId, generation) == 6);

const _: () = assert!(size_of::<JointId>() == 8);
const _: () = assert!(align_of::<JointId>() == 4);
const _: () = assert!(core::mem::offset_of!(JointId, world0) == 4);
const _: () = assert!(core::mem::offset_of!(JointId, generation) == 6);

const _: () = assert!(size_of::<ShapeId>() == 8);
const _: () = assert!(align_of::<ShapeId>() == 4);
const _: () = assert!(core::mem::offset_of!(ShapeId, world0) == 4);
const _: () = assert!(core::mem::offset_of!(ShapeId, generation) == 6);
