//! The ownership index.
//!
//! The native engine offers no enumeration primitive cheap enough to drive
//! teardown, and it has no idea which managed objects hang off its entities.
//! This side index records, per world, every child handle the binding has
//! created and not yet destroyed, so that destroying a world can visit each
//! child exactly once. An entry exists if and only if the child is live;
//! explicit child destroys remove their entry immediately, which is what
//! keeps a later world destroy from double-freeing them.

use std::collections::HashMap;

use planar_foundation::{BodyId, Error, JointId, Result, WorldId};

/// The child handles registered under one world.
#[derive(Debug)]
pub struct Children {
    owner: WorldId,
    bodies: HashMap<i32, BodyId>,
    joints: HashMap<i32, JointId>,
}

impl Children {
    fn new(owner: WorldId) -> Self {
        Self {
            owner,
            bodies: HashMap::new(),
            joints: HashMap::new(),
        }
    }

    /// The world these children belong to.
    #[must_use]
    pub fn owner(&self) -> WorldId {
        self.owner
    }

    /// Iterates over the registered body handles. Order is unspecified.
    pub fn bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.values().copied()
    }

    /// Iterates over the registered joint handles. Order is unspecified.
    pub fn joints(&self) -> impl Iterator<Item = JointId> + '_ {
        self.joints.values().copied()
    }

    /// Number of registered bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of registered joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Returns true if no children are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.joints.is_empty()
    }

    /// Returns true if exactly this body handle is registered.
    #[must_use]
    pub fn contains_body(&self, body: BodyId) -> bool {
        self.bodies.get(&body.index1) == Some(&body)
    }

    /// Returns true if exactly this joint handle is registered.
    #[must_use]
    pub fn contains_joint(&self, joint: JointId) -> bool {
        self.joints.get(&joint.index1) == Some(&joint)
    }
}

/// Per-world registry of child handles.
///
/// Keyed by the world's container id (its slot index, which also appears in
/// every child handle's `world0` field). Insert/remove mirror child
/// create/destroy one-to-one; removal of an absent entry is the
/// double-destroy signal and fails with `UnknownHandle`.
#[derive(Debug, Default)]
pub struct OwnershipIndex {
    containers: HashMap<u16, Children>,
}

impl OwnershipIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an empty child record for a freshly created world.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the container is already registered;
    /// the engine never hands out the same live world twice.
    pub fn register(&mut self, world: WorldId) -> Result<()> {
        let container = container_of(world);
        if self.containers.contains_key(&container) {
            return Err(Error::internal(format!(
                "container {container} already registered"
            )));
        }
        self.containers.insert(container, Children::new(world));
        Ok(())
    }

    /// Removes a world's child record and hands it to the caller, who is
    /// responsible for draining it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownHandle` if the container is not registered (world
    /// already destroyed, or never created through this binding), or
    /// `InvalidHandle` if the container slot is now owned by a different
    /// world generation.
    pub fn remove_container(&mut self, world: WorldId) -> Result<Children> {
        self.verify_container(world)?;
        self.containers
            .remove(&container_of(world))
            .ok_or_else(|| Error::unknown_handle(world))
    }

    /// Returns true if exactly this world's container is registered.
    #[must_use]
    pub fn contains_container(&self, world: WorldId) -> bool {
        self.containers
            .get(&container_of(world))
            .is_some_and(|c| c.owner == world)
    }

    /// Checks that this world's container is registered, without touching it.
    ///
    /// # Errors
    ///
    /// `UnknownHandle` if the container is absent, `InvalidHandle` if the
    /// slot is registered to a different world generation.
    pub fn verify_container(&self, world: WorldId) -> Result<()> {
        match self.containers.get(&container_of(world)) {
            None => Err(Error::unknown_handle(world)),
            Some(children) if children.owner != world => Err(Error::invalid_handle(world)),
            Some(_) => Ok(()),
        }
    }

    /// Looks up a world's children.
    ///
    /// # Errors
    ///
    /// Same contract as [`verify_container`](Self::verify_container).
    pub fn children_of(&self, world: WorldId) -> Result<&Children> {
        let children = self
            .containers
            .get(&container_of(world))
            .ok_or_else(|| Error::unknown_handle(world))?;
        if children.owner != world {
            return Err(Error::invalid_handle(world));
        }
        Ok(children)
    }

    /// Looks up a container's children by id.
    #[must_use]
    pub fn get(&self, container: u16) -> Option<&Children> {
        self.containers.get(&container)
    }

    /// Records a freshly created body under its world.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the container is missing or the slot is
    /// already occupied; both mean create/destroy sequencing is broken.
    pub fn insert_body(&mut self, body: BodyId) -> Result<()> {
        let children = self.containers.get_mut(&body.world0).ok_or_else(|| {
            Error::internal(format!("body registered under unknown container: {body}"))
        })?;
        if children.bodies.insert(body.index1, body).is_some() {
            return Err(Error::internal(format!("duplicate body slot: {body}")));
        }
        Ok(())
    }

    /// Records a freshly created joint under its world.
    ///
    /// # Errors
    ///
    /// Returns an internal error on a missing container or occupied slot.
    pub fn insert_joint(&mut self, joint: JointId) -> Result<()> {
        let children = self.containers.get_mut(&joint.world0).ok_or_else(|| {
            Error::internal(format!("joint registered under unknown container: {joint}"))
        })?;
        if children.joints.insert(joint.index1, joint).is_some() {
            return Err(Error::internal(format!("duplicate joint slot: {joint}")));
        }
        Ok(())
    }

    /// Removes a body's entry at destroy time.
    ///
    /// # Errors
    ///
    /// Returns `UnknownHandle` if no entry exists (double destroy), or
    /// `InvalidHandle` if the slot is occupied by a different generation
    /// (a stale handle presented after the slot was recycled).
    pub fn remove_body(&mut self, body: BodyId) -> Result<()> {
        let children = self
            .containers
            .get_mut(&body.world0)
            .ok_or_else(|| Error::unknown_handle(body))?;
        match children.bodies.get(&body.index1) {
            None => Err(Error::unknown_handle(body)),
            Some(registered) if *registered != body => Err(Error::invalid_handle(body)),
            Some(_) => {
                children.bodies.remove(&body.index1);
                Ok(())
            }
        }
    }

    /// Removes a joint's entry at destroy time.
    ///
    /// # Errors
    ///
    /// Same contract as [`remove_body`](Self::remove_body).
    pub fn remove_joint(&mut self, joint: JointId) -> Result<()> {
        let children = self
            .containers
            .get_mut(&joint.world0)
            .ok_or_else(|| Error::unknown_handle(joint))?;
        match children.joints.get(&joint.index1) {
            None => Err(Error::unknown_handle(joint)),
            Some(registered) if *registered != joint => Err(Error::invalid_handle(joint)),
            Some(_) => {
                children.joints.remove(&joint.index1);
                Ok(())
            }
        }
    }

    /// Checks that exactly this body handle is registered, without removing
    /// it. Used before a destroy sequence so the bridge release only happens
    /// for a handle that will actually be destroyed.
    ///
    /// # Errors
    ///
    /// Same contract as [`remove_body`](Self::remove_body).
    pub fn verify_body(&self, body: BodyId) -> Result<()> {
        let children = self
            .containers
            .get(&body.world0)
            .ok_or_else(|| Error::unknown_handle(body))?;
        match children.bodies.get(&body.index1) {
            None => Err(Error::unknown_handle(body)),
            Some(registered) if *registered != body => Err(Error::invalid_handle(body)),
            Some(_) => Ok(()),
        }
    }

    /// Checks that exactly this joint handle is registered.
    ///
    /// # Errors
    ///
    /// Same contract as [`remove_joint`](Self::remove_joint).
    pub fn verify_joint(&self, joint: JointId) -> Result<()> {
        let children = self
            .containers
            .get(&joint.world0)
            .ok_or_else(|| Error::unknown_handle(joint))?;
        match children.joints.get(&joint.index1) {
            None => Err(Error::unknown_handle(joint)),
            Some(registered) if *registered != joint => Err(Error::invalid_handle(joint)),
            Some(_) => Ok(()),
        }
    }

    /// Number of registered containers.
    #[must_use]
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Returns true if no containers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// A world's container id is its slot index; child handles carry it in
/// `world0`. World indices never exceed `u16::MAX` (the engine caps its
/// world table), so the narrowing is lossless.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn container_of(world: WorldId) -> u16 {
    world.index1 as u16
}
