//! Circular-emission guard
//!
//! Property setters read the current value, write the new one, then emit
//! a change signal. A listener of that signal calling the same setter
//! again would recurse and double-fire. Each slot carries a per-instance
//! bitmask with one bit per event category; the bit is taken immediately
//! before a change emission and released when the guard drops, on every
//! exit path. A setter finding its bit already held suppresses the
//! nested call entirely: no write, no emission.
//!
//! The mask is per (instance, category), so independent property changes
//! on the same instance still fire back to back.

use bitflags::bitflags;
use std::cell::Cell;
use std::rc::Rc;

bitflags! {
    /// Event categories a change emission can lock.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LockFlags: u32 {
        const WORLD     = 1 << 0;
        const ALPHA     = 1 << 1;
        const POSITION  = 1 << 2;
        const ROTATION  = 1 << 3;
        const COLOR     = 1 << 4;
        const REPORT    = 1 << 5;
        const RADIUS    = 1 << 6;
        const TEXT      = 1 << 7;
    }
}

/// Scoped hold of one or more category bits on a slot's lock mask.
pub struct CircularGuard {
    locks: Rc<Cell<LockFlags>>,
    bits: LockFlags,
}

impl CircularGuard {
    /// Take `bits` on the mask. Returns `None` when any requested bit is
    /// already held, which is the signal to suppress the nested emission.
    pub fn acquire(locks: Rc<Cell<LockFlags>>, bits: LockFlags) -> Option<Self> {
        let held = locks.get();
        if held.intersects(bits) {
            return None;
        }
        locks.set(held | bits);
        Some(Self { locks, bits })
    }
}

impl Drop for CircularGuard {
    fn drop(&mut self) {
        self.locks.set(self.locks.get() - self.bits);
    }
}
