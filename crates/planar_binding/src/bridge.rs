//! The managed-object bridge.
//!
//! The native engine stores one opaque machine word per entity and never
//! looks inside it. The bridge turns that word into an owning association:
//! each attached object lives in a slot here, and the token written into the
//! native side encodes the slot plus a bridge-local generation. Because the
//! engine cannot participate in any form of collection, the bridge holds the
//! only strong reference from attach until an explicit release; losing track
//! of that reference on a destroy path is the leak this layer exists to
//! prevent.

// Allow u64/usize casts - slot indices fit 32 bits by construction
#![allow(clippy::cast_possible_truncation)]

use std::any::Any;
use std::sync::Arc;

use planar_native::UserDataToken;

/// The caller-owned object attached to a native entity.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// One bridge slot. The generation is bumped when the slot is freed, so a
/// token minted for a previous occupant can never resolve the next one.
struct BridgeSlot {
    generation: u32,
    object: Option<UserData>,
}

/// Slot table mapping user-data tokens to owned objects.
///
/// Tokens pack the slot's generation in the high 32 bits and the 1-based
/// slot index in the low 32, so the null word (0) is never a live token and
/// a recycled slot invalidates outstanding tokens. Lookups are total: a
/// dead, null, or garbage token resolves to `None` rather than an error,
/// which is what makes detach idempotent.
#[derive(Default)]
pub struct ObjectBridge {
    slots: Vec<BridgeSlot>,
    free: Vec<u32>,
    live_count: usize,
}

impl ObjectBridge {
    /// Creates an empty bridge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an object and mints the token to store natively.
    ///
    /// The bridge now owns a strong reference; it is dropped only by
    /// [`remove`](Self::remove).
    pub fn insert(&mut self, object: UserData) -> UserDataToken {
        self.live_count += 1;

        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.object = Some(object);
            Self::encode(idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(BridgeSlot {
                generation: 0,
                object: Some(object),
            });
            Self::encode(idx, 0)
        }
    }

    /// Resolves a token to the attached object.
    ///
    /// Returns `None` for the null token, a freed slot, or a stale
    /// generation; "nothing attached" is a steady state, not an error.
    #[must_use]
    pub fn get(&self, token: UserDataToken) -> Option<UserData> {
        let (idx, generation) = Self::decode(token)?;
        let slot = self.slots.get(idx)?;
        if slot.generation != generation {
            return None;
        }
        slot.object.clone()
    }

    /// Frees the slot a token refers to and returns the object it owned.
    ///
    /// This is the release point: the returned value carries the bridge's
    /// strong reference. A dead token is a no-op returning `None`, so
    /// callers may remove twice without double-releasing.
    pub fn remove(&mut self, token: UserDataToken) -> Option<UserData> {
        let (idx, generation) = Self::decode(token)?;
        let slot = self.slots.get_mut(idx)?;
        if slot.generation != generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx as u32);
        self.live_count -= 1;
        Some(object)
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if no entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    fn encode(idx: u32, generation: u32) -> UserDataToken {
        UserDataToken((u64::from(generation) << 32) | u64::from(idx + 1))
    }

    fn decode(token: UserDataToken) -> Option<(usize, u32)> {
        if token.is_null() {
            return None;
        }
        let index1 = (token.0 & 0xffff_ffff) as u32;
        if index1 == 0 {
            return None;
        }
        let generation = (token.0 >> 32) as u32;
        Some((index1 as usize - 1, generation))
    }
}

impl std::fmt::Debug for ObjectBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectBridge")
            .field("live", &self.live_count)
            .field("capacity", &self.slots.len())
            .finish()
    }
}
