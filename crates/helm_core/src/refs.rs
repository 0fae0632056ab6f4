//! Reference arena and handles
//!
//! Scripts and subsystems hold lightweight, caller-owned references to
//! slots. All records live in a generation-checked arena inside the
//! manager; the records of one slot are linked into an index-based
//! doubly linked chain whose head the slot stores. The chain records
//! association only, never ownership.
//!
//! Chain discipline: insertion is always at the head, the root never has
//! a `prev`, and every walk (deactivation, resurrection, counting)
//! starts at the root and follows `next`. Most-recently-bound references
//! are therefore visited first.
//!
//! A persistent record survives its slot's deactivation: it stays in the
//! chain with its target reset to the sentinel ("dormant") and is
//! resurrected, local state untouched, if the same slot index becomes
//! active again.

use crate::slot::ScriptValue;

/// Generation-checked address of a reference record.
///
/// The generation detects handles that outlived their record: once the
/// record is freed and the arena index reused, stale keys stop
/// resolving instead of aliasing the new occupant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RefKey {
    index: u32,
    generation: u32,
}

impl RefKey {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Serialize to a 64-bit integer (script FFI stores handles as ints).
    pub fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Deserialize from a 64-bit integer.
    pub fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

/// Caller-owned handle to a slot.
///
/// Deliberately not `Copy`/`Clone`: a duplicate is a new, independent
/// chain member and must be minted through the manager (`clone_ref`).
#[derive(Debug)]
pub struct Reference {
    key: RefKey,
}

impl Reference {
    /// Rebuild a handle from a key previously round-tripped through the
    /// script layer. Validity is still generation-checked on every use.
    pub fn from_key(key: RefKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> RefKey {
        self.key
    }
}

/// Arena-internal state of one reference.
pub(crate) struct RefRecord {
    /// Target slot id; meaningful only while it passes `verify`. `None`
    /// is the sentinel: dormant (persistent) or simply invalid.
    pub target: Option<u32>,
    /// Slot index whose chain this record is linked into. Dormant
    /// persistent records stay chained while their slot is inactive.
    pub chain: Option<u32>,
    /// Survive slot deactivation in a dormant state.
    pub persistent: bool,
    /// Metadata private to this handle, independent of the slot's.
    pub tag: String,
    pub data: ScriptValue,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl RefRecord {
    pub(crate) fn unbound() -> Self {
        Self {
            target: None,
            chain: None,
            persistent: false,
            tag: String::new(),
            data: ScriptValue::Null,
            prev: None,
            next: None,
        }
    }
}

struct RefEntry {
    generation: u32,
    record: Option<RefRecord>,
}

/// Storage for every outstanding reference of one pool, with free-list
/// index recycling.
pub(crate) struct RefArena {
    entries: Vec<RefEntry>,
    free: Vec<u32>,
}

impl RefArena {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, record: RefRecord) -> RefKey {
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.record = Some(record);
            RefKey::new(index, entry.generation)
        } else {
            let index = self.entries.len() as u32;
            self.entries.push(RefEntry {
                generation: 0,
                record: Some(record),
            });
            RefKey::new(index, 0)
        }
    }

    /// Free the record and bump the generation so stale keys stop
    /// resolving. Returns the record for final inspection.
    pub fn free(&mut self, key: RefKey) -> Option<RefRecord> {
        let entry = self.entries.get_mut(key.index as usize)?;
        if entry.generation != key.generation || entry.record.is_none() {
            return None;
        }
        entry.generation += 1;
        self.free.push(key.index);
        entry.record.take()
    }

    pub fn get(&self, key: RefKey) -> Option<&RefRecord> {
        let entry = self.entries.get(key.index as usize)?;
        if entry.generation != key.generation {
            return None;
        }
        entry.record.as_ref()
    }

    pub fn get_mut(&mut self, key: RefKey) -> Option<&mut RefRecord> {
        let entry = self.entries.get_mut(key.index as usize)?;
        if entry.generation != key.generation {
            return None;
        }
        entry.record.as_mut()
    }

    /// Chain-internal access by raw index. Chain links only ever point
    /// at live records.
    pub fn record(&self, index: u32) -> &RefRecord {
        self.entries[index as usize]
            .record
            .as_ref()
            .expect("chain link points at a freed record")
    }

    pub fn record_mut(&mut self, index: u32) -> &mut RefRecord {
        self.entries[index as usize]
            .record
            .as_mut()
            .expect("chain link points at a freed record")
    }

    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.record.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_keys_stop_resolving_after_index_reuse() {
        let mut arena = RefArena::new();
        let first = arena.alloc(RefRecord::unbound());
        assert!(arena.free(first).is_some());

        let second = arena.alloc(RefRecord::unbound());
        assert_eq!(second.index(), first.index());
        assert!(arena.get(first).is_none());
        assert!(arena.get(second).is_some());
        assert!(arena.free(first).is_none());
    }

    #[test]
    fn key_bits_round_trip() {
        let key = RefKey::new(42, 7);
        assert_eq!(RefKey::from_bits(key.to_bits()), key);
    }

    #[test]
    fn live_count_tracks_alloc_and_free() {
        let mut arena = RefArena::new();
        let a = arena.alloc(RefRecord::unbound());
        let _b = arena.alloc(RefRecord::unbound());
        assert_eq!(arena.live_count(), 2);
        arena.free(a);
        assert_eq!(arena.live_count(), 1);
    }
}
