//! In-memory engine with the native allocator's slot semantics.
//!
//! `StubEngine` reproduces exactly the parts of the native engine that the
//! handle layer can observe: 1-based slot indices, free-list reuse, 16-bit
//! generations bumped when a slot is freed, and per-world child tables that
//! vanish with their world. No physics happens here; it exists so the
//! lifetime layer can be exercised (and embedded) without linking the native
//! library.

// Allow i32/usize casts - slot indices are bounded well below i32::MAX
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use planar_foundation::{BodyId, Error, JointId, Result, WorldId};

use crate::api::{NativeEngine, UserDataToken};

/// One native slot: its current generation, liveness, and user-data word.
#[derive(Debug, Clone)]
struct Slot {
    generation: u16,
    live: bool,
    user_data: UserDataToken,
}

/// A native entity table: slots plus a free list.
///
/// Indices are 1-based; index 0 is reserved for the null handle. The
/// generation is incremented when a slot is *freed*, so a live slot's
/// generation equals the generation baked into the handles that refer to it.
/// Generations wrap at 16 bits: after 65 536 reuses of one slot an old
/// handle aliases the new occupant. That window is the native engine's and
/// is preserved here deliberately.
#[derive(Debug, Clone, Default)]
struct SlotTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live_count: usize,
}

impl SlotTable {
    /// Allocates a slot, reusing the free list first.
    /// Returns the 1-based index and the slot's current generation.
    fn allocate(&mut self) -> (i32, u16) {
        self.live_count += 1;

        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx];
            slot.live = true;
            slot.user_data = UserDataToken::NULL;
            (idx as i32 + 1, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                live: true,
                user_data: UserDataToken::NULL,
            });
            (self.slots.len() as i32, 0)
        }
    }

    /// Frees the slot a live handle refers to. Returns false for a stale,
    /// null, or out-of-range handle.
    fn release(&mut self, index1: i32, generation: u16) -> bool {
        let Some(slot) = self.slot_mut(index1, generation) else {
            return false;
        };
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.user_data = UserDataToken::NULL;
        self.free.push(index1 as usize - 1);
        self.live_count -= 1;
        true
    }

    /// The validity oracle. Total over all bit patterns.
    fn is_live(&self, index1: i32, generation: u16) -> bool {
        if index1 <= 0 {
            return false;
        }
        let Some(slot) = self.slots.get(index1 as usize - 1) else {
            return false;
        };
        slot.live && slot.generation == generation
    }

    fn slot(&self, index1: i32, generation: u16) -> Option<&Slot> {
        if !self.is_live(index1, generation) {
            return None;
        }
        self.slots.get(index1 as usize - 1)
    }

    fn slot_mut(&mut self, index1: i32, generation: u16) -> Option<&mut Slot> {
        if !self.is_live(index1, generation) {
            return None;
        }
        self.slots.get_mut(index1 as usize - 1)
    }

    fn len(&self) -> usize {
        self.live_count
    }
}

/// Child tables of one world slot.
#[derive(Debug, Clone, Default)]
struct WorldTables {
    bodies: SlotTable,
    joints: SlotTable,
}

/// In-memory [`NativeEngine`] with the native allocator's observable
/// contract.
///
/// World indices are capped at `u16::MAX` so that a world id always fits the
/// `world0` field of child handles; exceeding the cap fails the create call
/// the way an exhausted native table would.
#[derive(Debug, Clone, Default)]
pub struct StubEngine {
    worlds: SlotTable,
    /// Child tables, parallel to `worlds.slots`.
    tables: Vec<WorldTables>,
}

impl StubEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live worlds.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Number of live bodies in the given world, or `None` if the handle is
    /// stale.
    #[must_use]
    pub fn body_count(&self, world: WorldId) -> Option<usize> {
        self.world_tables(world).map(|t| t.bodies.len())
    }

    /// Number of live joints in the given world, or `None` if the handle is
    /// stale.
    #[must_use]
    pub fn joint_count(&self, world: WorldId) -> Option<usize> {
        self.world_tables(world).map(|t| t.joints.len())
    }

    fn world_tables(&self, world: WorldId) -> Option<&WorldTables> {
        if !self.worlds.is_live(world.index1, world.generation) {
            return None;
        }
        self.tables.get(world.index1 as usize - 1)
    }

    fn world_tables_mut(&mut self, world: WorldId) -> Option<&mut WorldTables> {
        if !self.worlds.is_live(world.index1, world.generation) {
            return None;
        }
        self.tables.get_mut(world.index1 as usize - 1)
    }

    /// Resolves a child handle's world slot by its `world0` field alone.
    /// Used by body/joint calls, which carry no world generation.
    fn tables_by_world0(&self, world0: u16) -> Option<&WorldTables> {
        if world0 == 0 {
            return None;
        }
        let idx = world0 as usize - 1;
        if !self.worlds.slots.get(idx)?.live {
            return None;
        }
        self.tables.get(idx)
    }

    fn tables_by_world0_mut(&mut self, world0: u16) -> Option<&mut WorldTables> {
        if world0 == 0 {
            return None;
        }
        let idx = world0 as usize - 1;
        if !self.worlds.slots.get(idx)?.live {
            return None;
        }
        self.tables.get_mut(idx)
    }
}

impl NativeEngine for StubEngine {
    fn create_world(&mut self) -> Result<WorldId> {
        // A new slot would get index `len + 1`, which must fit `world0`.
        if self.worlds.free.is_empty() && self.worlds.slots.len() >= usize::from(u16::MAX) {
            return Err(Error::foreign_call("world_create", "world table exhausted"));
        }

        let (index1, generation) = self.worlds.allocate();
        if self.tables.len() < index1 as usize {
            self.tables.push(WorldTables::default());
        }
        Ok(WorldId::new(index1, generation))
    }

    fn destroy_world(&mut self, world: WorldId) -> Result<()> {
        if !self.worlds.is_live(world.index1, world.generation) {
            return Err(Error::invalid_handle(world));
        }
        // The native engine frees every child slot with the world.
        self.tables[world.index1 as usize - 1] = WorldTables::default();
        self.worlds.release(world.index1, world.generation);
        Ok(())
    }

    fn world_is_valid(&self, world: WorldId) -> bool {
        self.worlds.is_live(world.index1, world.generation)
    }

    fn world_user_data(&self, world: WorldId) -> UserDataToken {
        self.worlds
            .slot(world.index1, world.generation)
            .map_or(UserDataToken::NULL, |s| s.user_data)
    }

    fn set_world_user_data(&mut self, world: WorldId, token: UserDataToken) {
        if let Some(slot) = self.worlds.slot_mut(world.index1, world.generation) {
            slot.user_data = token;
        }
    }

    fn create_body(&mut self, world: WorldId) -> Result<BodyId> {
        let world0 = world.index1 as u16;
        let Some(tables) = self.world_tables_mut(world) else {
            return Err(Error::invalid_handle(world));
        };
        let (index1, generation) = tables.bodies.allocate();
        Ok(BodyId::new(index1, world0, generation))
    }

    fn destroy_body(&mut self, body: BodyId) -> Result<()> {
        let Some(tables) = self.tables_by_world0_mut(body.world0) else {
            return Err(Error::invalid_handle(body));
        };
        if !tables.bodies.release(body.index1, body.generation) {
            return Err(Error::invalid_handle(body));
        }
        Ok(())
    }

    fn body_is_valid(&self, body: BodyId) -> bool {
        self.tables_by_world0(body.world0)
            .is_some_and(|t| t.bodies.is_live(body.index1, body.generation))
    }

    fn body_user_data(&self, body: BodyId) -> UserDataToken {
        self.tables_by_world0(body.world0)
            .and_then(|t| t.bodies.slot(body.index1, body.generation))
            .map_or(UserDataToken::NULL, |s| s.user_data)
    }

    fn set_body_user_data(&mut self, body: BodyId, token: UserDataToken) {
        if let Some(slot) = self
            .tables_by_world0_mut(body.world0)
            .and_then(|t| t.bodies.slot_mut(body.index1, body.generation))
        {
            slot.user_data = token;
        }
    }

    fn create_joint(&mut self, world: WorldId, a: BodyId, b: BodyId) -> Result<JointId> {
        if !self.body_is_valid(a) || a.world0 != world.index1 as u16 {
            return Err(Error::invalid_handle(a));
        }
        if !self.body_is_valid(b) || b.world0 != world.index1 as u16 {
            return Err(Error::invalid_handle(b));
        }
        let world0 = world.index1 as u16;
        let Some(tables) = self.world_tables_mut(world) else {
            return Err(Error::invalid_handle(world));
        };
        let (index1, generation) = tables.joints.allocate();
        Ok(JointId::new(index1, world0, generation))
    }

    fn destroy_joint(&mut self, joint: JointId) -> Result<()> {
        let Some(tables) = self.tables_by_world0_mut(joint.world0) else {
            return Err(Error::invalid_handle(joint));
        };
        if !tables.joints.release(joint.index1, joint.generation) {
            return Err(Error::invalid_handle(joint));
        }
        Ok(())
    }

    fn joint_is_valid(&self, joint: JointId) -> bool {
        self.tables_by_world0(joint.world0)
            .is_some_and(|t| t.joints.is_live(joint.index1, joint.generation))
    }

    fn joint_user_data(&self, joint: JointId) -> UserDataToken {
        self.tables_by_world0(joint.world0)
            .and_then(|t| t.joints.slot(joint.index1, joint.generation))
            .map_or(UserDataToken::NULL, |s| s.user_data)
    }

    fn set_joint_user_data(&mut self, joint: JointId, token: UserDataToken) {
        if let Some(slot) = self
            .tables_by_world0_mut(joint.world0)
            .and_then(|t| t.joints.slot_mut(joint.index1, joint.generation))
        {
            slot.user_data = token;
        }
    }
}
