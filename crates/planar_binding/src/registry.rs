//! The checked registry tying engine, bridge, and index together.
//!
//! [`Binding`] is the surface the rest of the binding talks to. Every
//! operation here is *checked*: the handle goes through the validity oracle
//! first and a stale one fails with `InvalidHandle` before any state is
//! touched. The unchecked tier is the bare [`NativeEngine`] trait, reserved
//! for hot-path consumers that hold a handle they have already validated.
//!
//! Destroy paths honor one ordering contract throughout: the bridge entry is
//! released *before* the native destroy call recycles the slot. Done the
//! other way around, a later read through the recycled slot could resolve a
//! token minted for the previous occupant, or the entry would simply become
//! unreachable and leak.

use parking_lot::Mutex;

use planar_foundation::{BodyId, Error, JointId, Result, WorldId};
use planar_native::{EngineEntity, NativeEngine, UserDataToken};

use crate::bridge::{ObjectBridge, UserData};
use crate::index::OwnershipIndex;

/// Mutable state of the binding: the engine plus the two side tables.
///
/// Held behind one mutex. Every operation is a bounded, synchronous batch of
/// table work plus at most one native call per entity touched, so a single
/// lock keeps create/destroy/attach races out of contract without
/// per-container bookkeeping.
struct State<E> {
    engine: E,
    bridge: ObjectBridge,
    index: OwnershipIndex,
}

/// The checked handle registry for one embedded engine instance.
///
/// Constructor-injected rather than process-wide: tests and multi-engine
/// hosts build isolated bindings around isolated engines. Methods take
/// `&self`; all mutation is serialized behind the internal lock, and
/// validity checks go through the same lock (the engine's generation reads
/// are not assumed atomic).
pub struct Binding<E: NativeEngine> {
    state: Mutex<State<E>>,
}

impl<E: NativeEngine> Binding<E> {
    /// Wraps an engine instance.
    pub fn new(engine: E) -> Self {
        Self {
            state: Mutex::new(State {
                engine,
                bridge: ObjectBridge::new(),
                index: OwnershipIndex::new(),
            }),
        }
    }

    /// Tears the binding down and returns the engine.
    ///
    /// Attachments and index entries are dropped as-is; callers who need the
    /// leak-free path destroy their worlds first.
    pub fn into_engine(self) -> E {
        self.state.into_inner().engine
    }

    // -------------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------------

    /// Creates a world and opens its (empty) ownership record.
    ///
    /// # Errors
    ///
    /// Propagates native failure (`ForeignCall`) verbatim.
    pub fn create_world(&self) -> Result<WorldId> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let world = state.engine.create_world()?;
        state.index.register(world)?;
        Ok(world)
    }

    /// Creates a body under a world and records it in the ownership index.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the world handle is stale; native failures pass
    /// through.
    pub fn create_body(&self, world: WorldId) -> Result<BodyId> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !world.is_valid(&state.engine) {
            return Err(Error::invalid_handle(world));
        }
        let body = state.engine.create_body(world)?;
        state.index.insert_body(body)?;
        Ok(body)
    }

    /// Creates a joint between two bodies of a world and records it.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if any of the three handles is stale; native failures
    /// pass through.
    pub fn create_joint(&self, world: WorldId, a: BodyId, b: BodyId) -> Result<JointId> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !world.is_valid(&state.engine) {
            return Err(Error::invalid_handle(world));
        }
        if !a.is_valid(&state.engine) {
            return Err(Error::invalid_handle(a));
        }
        if !b.is_valid(&state.engine) {
            return Err(Error::invalid_handle(b));
        }
        let joint = state.engine.create_joint(world, a, b)?;
        state.index.insert_joint(joint)?;
        Ok(joint)
    }

    // -------------------------------------------------------------------------
    // Destroy
    // -------------------------------------------------------------------------

    /// Destroys a body: bridge release, native destroy, index removal.
    ///
    /// # Errors
    ///
    /// `UnknownHandle` if the body is not in the ownership index (double
    /// destroy); `InvalidHandle` if the slot is registered to a different
    /// generation.
    pub fn destroy_body(&self, body: BodyId) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.index.verify_body(body)?;
        release_attachment(&mut state.engine, &mut state.bridge, body);
        state.engine.destroy_body(body)?;
        state.index.remove_body(body)
    }

    /// Destroys a joint: bridge release, native destroy, index removal.
    ///
    /// # Errors
    ///
    /// Same contract as [`destroy_body`](Self::destroy_body).
    pub fn destroy_joint(&self, joint: JointId) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.index.verify_joint(joint)?;
        release_attachment(&mut state.engine, &mut state.bridge, joint);
        state.engine.destroy_joint(joint)?;
        state.index.remove_joint(joint)
    }

    /// Destroys a world and everything registered under it.
    ///
    /// Living children are the expected case, not an error: every joint,
    /// then every body, goes through the full per-entity sequence (bridge
    /// release, native destroy), then the world's own attachment is released
    /// and the native world destroy runs last. Order among siblings of one
    /// kind is unspecified.
    ///
    /// # Errors
    ///
    /// `UnknownHandle` on double destroy, `InvalidHandle` for a stale handle
    /// whose container slot now belongs to a newer world.
    pub fn destroy_world(&self, world: WorldId) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let children = state.index.remove_container(world)?;

        // Joints before bodies: a joint's native slot refers to its bodies.
        for joint in children.joints() {
            release_attachment(&mut state.engine, &mut state.bridge, joint);
            state.engine.destroy_joint(joint)?;
        }
        for body in children.bodies() {
            release_attachment(&mut state.engine, &mut state.bridge, body);
            state.engine.destroy_body(body)?;
        }

        release_attachment(&mut state.engine, &mut state.bridge, world);
        state.engine.destroy_world(world)
    }

    // -------------------------------------------------------------------------
    // Validity
    // -------------------------------------------------------------------------

    /// Asks the validity oracle whether a handle is live.
    ///
    /// Total over any bit pattern: null, garbage, and stale handles answer
    /// `false`.
    pub fn is_valid<H: EngineEntity>(&self, handle: H) -> bool {
        handle.is_valid(&self.state.lock().engine)
    }

    // -------------------------------------------------------------------------
    // User data
    // -------------------------------------------------------------------------

    /// Attaches an object to an entity, replacing any existing attachment.
    ///
    /// The old bridge entry, if any, is released exactly once before the new
    /// one is installed; the new token is then written into the native
    /// user-data slot. Replacement is not an error.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the handle is stale; nothing is attached then.
    pub fn attach_user_data<H: EngineEntity>(&self, handle: H, object: UserData) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !handle.is_valid(&state.engine) {
            return Err(Error::invalid_handle(handle));
        }
        let old = handle.user_data(&state.engine);
        if !old.is_null() {
            drop(state.bridge.remove(old));
        }
        let token = state.bridge.insert(object);
        handle.set_user_data(&mut state.engine, token);
        Ok(())
    }

    /// Reads the object attached to an entity.
    ///
    /// `Ok(None)` when nothing is attached - an expected steady state.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the handle is stale.
    pub fn user_data<H: EngineEntity>(&self, handle: H) -> Result<Option<UserData>> {
        let guard = self.state.lock();
        let state = &*guard;
        if !handle.is_valid(&state.engine) {
            return Err(Error::invalid_handle(handle));
        }
        let token = handle.user_data(&state.engine);
        Ok(state.bridge.get(token))
    }

    /// Detaches and releases an entity's attachment, if any.
    ///
    /// Idempotent: detaching an entity with nothing attached is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the handle is stale.
    pub fn detach_user_data<H: EngineEntity>(&self, handle: H) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !handle.is_valid(&state.engine) {
            return Err(Error::invalid_handle(handle));
        }
        release_attachment(&mut state.engine, &mut state.bridge, handle);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Enumeration
    // -------------------------------------------------------------------------

    /// Snapshot of the bodies currently registered under a world.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the world handle is stale.
    pub fn bodies(&self, world: WorldId) -> Result<Vec<BodyId>> {
        let guard = self.state.lock();
        let state = &*guard;
        if !world.is_valid(&state.engine) {
            return Err(Error::invalid_handle(world));
        }
        Ok(state.index.children_of(world)?.bodies().collect())
    }

    /// Snapshot of the joints currently registered under a world.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the world handle is stale.
    pub fn joints(&self, world: WorldId) -> Result<Vec<JointId>> {
        let guard = self.state.lock();
        let state = &*guard;
        if !world.is_valid(&state.engine) {
            return Err(Error::invalid_handle(world));
        }
        Ok(state.index.children_of(world)?.joints().collect())
    }

    /// Number of bodies registered under a world.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the world handle is stale.
    pub fn body_count(&self, world: WorldId) -> Result<usize> {
        let guard = self.state.lock();
        let state = &*guard;
        if !world.is_valid(&state.engine) {
            return Err(Error::invalid_handle(world));
        }
        Ok(state.index.children_of(world)?.body_count())
    }

    /// Number of live bridge entries across all entities. Zero once every
    /// world is destroyed - the leak check.
    pub fn attachment_count(&self) -> usize {
        self.state.lock().bridge.len()
    }

    /// Number of registered worlds.
    pub fn world_count(&self) -> usize {
        self.state.lock().index.container_count()
    }
}

impl<E: NativeEngine> std::fmt::Debug for Binding<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.state.lock();
        let state = &*guard;
        f.debug_struct("Binding")
            .field("worlds", &state.index.container_count())
            .field("attachments", &state.bridge.len())
            .finish()
    }
}

/// Releases an entity's bridge entry and resets its native word to null.
///
/// Runs before the native destroy on every destroy path, so the bridge entry
/// can never survive its entity or resolve through a recycled slot.
fn release_attachment<E: NativeEngine, H: EngineEntity>(
    engine: &mut E,
    bridge: &mut ObjectBridge,
    entity: H,
) {
    let token = entity.user_data(engine);
    if !token.is_null() {
        drop(bridge.remove(token));
        entity.set_user_data(engine, UserDataToken::NULL);
    }
}
