//! Slot instances
//!
//! One `SlotInstance` per pool index, reused across create/destroy
//! cycles. The slot records identity and ownership, slot-scoped user
//! metadata (shared by every reference to the slot, as opposed to each
//! reference's private metadata), the kind-specific fields, and the
//! lifecycle signals every kind carries.

use std::cell::Cell;
use std::rc::Rc;

use crate::entity::EntitySpec;
use crate::guard::LockFlags;
use crate::signal::Signal;

/// Opaque script-side value attached to slots and references. The
/// scripting layer marshals its own types in and out; the core only
/// stores and forwards it.
pub type ScriptValue = serde_json::Value;

/// Arguments of every lifecycle signal: entity id, caller-supplied
/// header, caller-supplied payload.
pub type EventArgs = (u32, i32, ScriptValue);

/// The lifecycle signals every kind emits, both per slot and globally
/// per pool.
#[derive(Default)]
pub struct CoreEvents {
    pub created: Signal<EventArgs>,
    pub destroyed: Signal<EventArgs>,
    pub custom: Signal<EventArgs>,
}

impl CoreEvents {
    pub fn clear(&mut self) {
        self.created.clear();
        self.destroyed.clear();
        self.custom.clear();
    }
}

/// Bookkeeping record for one pool index.
pub struct SlotInstance<S: EntitySpec> {
    /// Current id. `None` is the unused sentinel; while active it always
    /// equals the slot's own array index.
    pub(crate) id: Option<u32>,
    /// Head record index of this slot's reference chain in the arena.
    /// Pure association; the arena owns the records.
    pub(crate) root: Option<u32>,
    /// Whether this manager created the external object, as opposed to
    /// merely tracking one created elsewhere.
    pub owned: bool,
    /// Purge tag/data on the next activation. True until first use.
    pub(crate) fresh: bool,
    /// Slot-scoped user tag, shared by all references to this slot.
    pub tag: String,
    /// Slot-scoped user data, shared by all references to this slot.
    pub data: ScriptValue,
    /// Kind-specific fields and domain signals.
    pub fields: S::Fields,
    /// Lifecycle signals local to this slot.
    pub events: CoreEvents,
    /// Circular-emission lock mask, one bit per event category.
    pub(crate) locks: Rc<Cell<LockFlags>>,
}

impl<S: EntitySpec> SlotInstance<S> {
    pub(crate) fn new() -> Self {
        Self {
            id: None,
            root: None,
            owned: false,
            fresh: true,
            tag: String::new(),
            data: ScriptValue::Null,
            fields: S::Fields::default(),
            events: CoreEvents::default(),
            locks: Rc::new(Cell::new(LockFlags::empty())),
        }
    }

    /// Current id, or `None` while inactive.
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl<S: EntitySpec> Default for SlotInstance<S> {
    fn default() -> Self {
        Self::new()
    }
}
