//! Entity manager
//!
//! One `EntityManager` per entity kind: it owns the fixed slot array,
//! the reference arena, and the pool-global lifecycle signals, and it
//! orchestrates create/activate/deactivate against the external
//! simulation. An explicit, constructed-once context object; the host
//! decides where it lives.
//!
//! Everything here runs on the single logical thread that drives the
//! simulation tick. No operation suspends or blocks.

use std::rc::Rc;

use helm_metrics::Counter;

use crate::entity::{EntitySpec, SimApi};
use crate::error::LifecycleError;
use crate::guard::{CircularGuard, LockFlags};
use crate::refs::{RefArena, RefRecord, Reference};
use crate::slot::{CoreEvents, ScriptValue, SlotInstance};

pub struct EntityManager<S: EntitySpec> {
    slots: Vec<SlotInstance<S>>,
    refs: RefArena,
    /// Pool-global lifecycle signals, fired after the slot-local ones.
    pub events: CoreEvents,
    counters: Counter,
}

impl<S: EntitySpec> EntityManager<S> {
    /// Build a pool with an explicit capacity. Slots are allocated once,
    /// here; activation never allocates.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, SlotInstance::new);
        Self {
            slots,
            refs: RefArena::new(),
            events: CoreEvents::default(),
            counters: Counter::new(),
        }
    }

    /// Build a pool with the kind's default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(S::KIND.capacity())
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The validity check every consumer goes through: in range and
    /// currently active. An active slot's id always equals its index.
    pub fn verify(&self, id: u32) -> bool {
        self.slots
            .get(id as usize)
            .map_or(false, |slot| slot.id == Some(id))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    /// Number of outstanding references across the whole pool,
    /// dormant and unbound ones included. Diagnostic only.
    pub fn reference_count(&self) -> usize {
        self.refs.live_count()
    }

    pub fn slot(&self, id: u32) -> Option<&SlotInstance<S>> {
        if !self.verify(id) {
            return None;
        }
        self.slots.get(id as usize)
    }

    pub fn slot_mut(&mut self, id: u32) -> Option<&mut SlotInstance<S>> {
        if !self.verify(id) {
            return None;
        }
        self.slots.get_mut(id as usize)
    }

    pub fn counters(&self) -> &Counter {
        &self.counters
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create an external object and activate its slot.
    ///
    /// Returns `None` on failure. If the external creation succeeded but
    /// activation failed, the external object is destroyed immediately
    /// so no live entity is left untracked.
    pub fn create(
        &mut self,
        api: &mut impl SimApi<S>,
        header: i32,
        payload: ScriptValue,
        notify: bool,
        args: S::CreateArgs,
    ) -> Option<u32> {
        let Some(id) = api.create(&args) else {
            tracing::error!(kind = %S::KIND, "external create failed");
            return None;
        };
        if let Err(err) = self.activate(id, true, Some(&args)) {
            tracing::error!(kind = %S::KIND, id, %err, "create rolled back");
            api.destroy(id);
            return None;
        }
        self.counters.increment("created", 1);
        if notify {
            let event = (id, header, payload);
            self.slots[id as usize].events.created.emit(&event);
            self.events.created.emit(&event);
        }
        Some(id)
    }

    /// Mark an existing slot active and initialize its kind fields.
    ///
    /// Resurrects every dormant persistent reference already chained to
    /// the slot (root-then-forward walk). Fails, logged, on an
    /// out-of-range id or an already-active slot; no state is touched.
    pub fn activate(
        &mut self,
        id: u32,
        owned: bool,
        args: Option<&S::CreateArgs>,
    ) -> Result<(), LifecycleError> {
        let capacity = self.slots.len();
        if id as usize >= capacity {
            let err = LifecycleError::IdOutOfRange {
                kind: S::KIND,
                id,
                capacity,
            };
            tracing::error!(%err, "activate refused");
            return Err(err);
        }
        if self.slots[id as usize].is_active() {
            let err = LifecycleError::AlreadyActive { kind: S::KIND, id };
            tracing::error!(%err, "activate refused");
            return Err(err);
        }

        let mut resurrected = 0u64;
        let mut cursor = self.slots[id as usize].root;
        while let Some(index) = cursor {
            let record = self.refs.record_mut(index);
            if record.persistent && record.target.is_none() {
                record.target = Some(id);
                resurrected += 1;
            }
            cursor = record.next;
        }
        self.counters.increment("resurrected", resurrected);

        let slot = &mut self.slots[id as usize];
        slot.id = Some(id);
        slot.owned = owned;
        if slot.fresh {
            slot.tag.clear();
            slot.data = ScriptValue::Null;
            slot.fresh = false;
        }
        match args {
            Some(args) => S::init(&mut slot.fields, args),
            None => S::init_default(&mut slot.fields),
        }
        tracing::debug!(kind = %S::KIND, id, owned, resurrected, "slot activated");
        Ok(())
    }

    /// Deactivate a slot: notify listeners, settle the reference chain,
    /// destroy the external object, reset the slot.
    ///
    /// The destroyed signal fires before any state is torn down.
    /// Persistent references go dormant in place; non-persistent ones
    /// are unlinked from the chain (their owners keep the now-invalid
    /// handle objects).
    pub fn deactivate(
        &mut self,
        api: &mut impl SimApi<S>,
        id: u32,
        header: i32,
        payload: ScriptValue,
        notify: bool,
    ) -> Result<(), LifecycleError> {
        let capacity = self.slots.len();
        if id as usize >= capacity {
            let err = LifecycleError::IdOutOfRange {
                kind: S::KIND,
                id,
                capacity,
            };
            tracing::error!(%err, "deactivate refused");
            return Err(err);
        }
        if !self.verify(id) {
            let err = LifecycleError::NotActive { kind: S::KIND, id };
            tracing::error!(%err, "deactivate refused");
            return Err(err);
        }

        if notify {
            let event = (id, header, payload);
            self.slots[id as usize].events.destroyed.emit(&event);
            self.events.destroyed.emit(&event);
        }

        // Root-then-forward walk; grab `next` before any unlinking.
        let mut cursor = self.slots[id as usize].root;
        while let Some(index) = cursor {
            cursor = self.refs.record(index).next;
            if self.refs.record(index).persistent {
                self.refs.record_mut(index).target = None;
            } else {
                self.chain_remove(index);
                self.refs.record_mut(index).target = None;
            }
        }

        api.destroy(id);

        let slot = &mut self.slots[id as usize];
        slot.id = None;
        slot.owned = false;
        S::deinit(&mut slot.fields);
        slot.events.clear();
        self.counters.increment("destroyed", 1);
        tracing::debug!(kind = %S::KIND, id, "slot deactivated");
        Ok(())
    }

    /// Fire the custom lifecycle signal, slot-local then global.
    pub fn emit_custom(
        &mut self,
        id: u32,
        header: i32,
        payload: ScriptValue,
    ) -> Result<(), LifecycleError> {
        if !self.verify(id) {
            let err = LifecycleError::NotActive { kind: S::KIND, id };
            tracing::error!(%err, "custom event refused");
            return Err(err);
        }
        let event = (id, header, payload);
        self.slots[id as usize].events.custom.emit(&event);
        self.events.custom.emit(&event);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Circular-emission guard
    // ------------------------------------------------------------------

    /// Hold category bits on a slot's lock mask for the guard's
    /// lifetime. `None` when the slot is invalid or a bit is held.
    pub fn lock_events(&self, id: u32, bits: LockFlags) -> Option<CircularGuard> {
        if !self.verify(id) {
            return None;
        }
        CircularGuard::acquire(Rc::clone(&self.slots[id as usize].locks), bits)
    }

    /// Run a property-change emission under the category guard.
    ///
    /// Returns `false` without invoking `fire` when the slot is invalid
    /// or the category bit is already held: the nested call performs no
    /// write and no emission. `true` means only that `fire` ran with the
    /// bit held; whether it wrote or emitted anything is up to `fire`.
    pub fn emit_change<F>(&mut self, id: u32, bits: LockFlags, fire: F) -> bool
    where
        F: FnOnce(&mut SlotInstance<S>),
    {
        if !self.verify(id) {
            tracing::warn!(kind = %S::KIND, id, "change emission on invalid slot");
            return false;
        }
        let locks = Rc::clone(&self.slots[id as usize].locks);
        let Some(_guard) = CircularGuard::acquire(locks, bits) else {
            tracing::debug!(kind = %S::KIND, id, ?bits, "nested change emission suppressed");
            return false;
        };
        fire(&mut self.slots[id as usize]);
        true
    }

    // ------------------------------------------------------------------
    // Slot-scoped tag/data (shared by every reference to the slot)
    // ------------------------------------------------------------------

    /// Slot tag; logs and returns an empty string on an invalid id
    /// (read paths favor availability).
    pub fn tag(&self, id: u32) -> String {
        match self.slot(id) {
            Some(slot) => slot.tag.clone(),
            None => {
                tracing::warn!(kind = %S::KIND, id, "tag read on invalid slot");
                String::new()
            }
        }
    }

    pub fn set_tag(&mut self, id: u32, tag: impl Into<String>) -> Result<(), LifecycleError> {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.tag = tag.into();
                Ok(())
            }
            None => Err(LifecycleError::NotActive { kind: S::KIND, id }),
        }
    }

    /// Slot data; logs and returns `Null` on an invalid id.
    pub fn data(&self, id: u32) -> ScriptValue {
        match self.slot(id) {
            Some(slot) => slot.data.clone(),
            None => {
                tracing::warn!(kind = %S::KIND, id, "data read on invalid slot");
                ScriptValue::Null
            }
        }
    }

    pub fn set_data(&mut self, id: u32, data: ScriptValue) -> Result<(), LifecycleError> {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.data = data;
                Ok(())
            }
            None => Err(LifecycleError::NotActive { kind: S::KIND, id }),
        }
    }

    // ------------------------------------------------------------------
    // References
    // ------------------------------------------------------------------

    /// Bind a new reference to `id`. An id failing `verify` yields a
    /// handle that starts out invalid and joins no chain.
    pub fn bind(&mut self, id: u32) -> Reference {
        let target = if self.verify(id) { Some(id) } else { None };
        let key = self.refs.alloc(RefRecord {
            target,
            ..RefRecord::unbound()
        });
        if let Some(slot_index) = target {
            self.chain_push(slot_index, key.index());
        }
        Reference::from_key(key)
    }

    /// Release a reference: unlink it from its chain and free its
    /// record. Safe to call with a stale handle (logged, no effect).
    pub fn unbind(&mut self, reference: Reference) {
        let key = reference.key();
        let chained = self.refs.get(key).map(|record| record.chain.is_some());
        match chained {
            Some(chained) => {
                if chained {
                    self.chain_remove(key.index());
                }
                self.refs.free(key);
            }
            None => {
                tracing::warn!(kind = %S::KIND, "unbind of a stale reference");
            }
        }
    }

    /// Duplicate a reference: same target, persistence and local
    /// metadata, fresh chain links. The clone is an independent chain
    /// member.
    pub fn clone_ref(&mut self, reference: &Reference) -> Reference {
        let Some(source) = self.refs.get(reference.key()) else {
            tracing::warn!(kind = %S::KIND, "clone of a stale reference");
            return Reference::from_key(self.refs.alloc(RefRecord::unbound()));
        };
        let record = RefRecord {
            target: source.target,
            persistent: source.persistent,
            tag: source.tag.clone(),
            data: source.data.clone(),
            ..RefRecord::unbound()
        };
        let chain = source.chain;
        let key = self.refs.alloc(record);
        if let Some(slot_index) = chain {
            self.chain_push(slot_index, key.index());
        }
        Reference::from_key(key)
    }

    /// Retarget a reference: unlink from the old chain, then bind to the
    /// new id exactly as construction would.
    pub fn set_id(&mut self, reference: &Reference, id: u32) -> bool {
        let key = reference.key();
        if self.refs.get(key).is_none() {
            tracing::warn!(kind = %S::KIND, "set_id on a stale reference");
            return false;
        }
        if self.refs.record(key.index()).chain.is_some() {
            self.chain_remove(key.index());
        }
        let target = if self.verify(id) { Some(id) } else { None };
        self.refs.record_mut(key.index()).target = target;
        if let Some(slot_index) = target {
            self.chain_push(slot_index, key.index());
        }
        true
    }

    /// Whether the handle currently resolves to an active slot.
    pub fn is_valid(&self, reference: &Reference) -> bool {
        self.refs
            .get(reference.key())
            .and_then(|record| record.target)
            .map_or(false, |id| self.verify(id))
    }

    /// The handle's target id; `None` while dormant or invalid.
    pub fn ref_id(&self, reference: &Reference) -> Option<u32> {
        self.refs.get(reference.key()).and_then(|record| record.target)
    }

    pub fn persistent(&self, reference: &Reference) -> bool {
        self.refs
            .get(reference.key())
            .map_or(false, |record| record.persistent)
    }

    pub fn set_persistent(&mut self, reference: &Reference, persistent: bool) -> bool {
        match self.refs.get_mut(reference.key()) {
            Some(record) => {
                record.persistent = persistent;
                true
            }
            None => {
                tracing::warn!(kind = %S::KIND, "set_persistent on a stale reference");
                false
            }
        }
    }

    /// Handle-local tag; logs and returns an empty string on a stale
    /// handle.
    pub fn local_tag(&self, reference: &Reference) -> String {
        match self.refs.get(reference.key()) {
            Some(record) => record.tag.clone(),
            None => {
                tracing::warn!(kind = %S::KIND, "tag read on a stale reference");
                String::new()
            }
        }
    }

    pub fn set_local_tag(&mut self, reference: &Reference, tag: impl Into<String>) -> bool {
        match self.refs.get_mut(reference.key()) {
            Some(record) => {
                record.tag = tag.into();
                true
            }
            None => {
                tracing::warn!(kind = %S::KIND, "tag write on a stale reference");
                false
            }
        }
    }

    /// Handle-local data; logs and returns `Null` on a stale handle.
    pub fn local_data(&self, reference: &Reference) -> ScriptValue {
        match self.refs.get(reference.key()) {
            Some(record) => record.data.clone(),
            None => {
                tracing::warn!(kind = %S::KIND, "data read on a stale reference");
                ScriptValue::Null
            }
        }
    }

    pub fn set_local_data(&mut self, reference: &Reference, data: ScriptValue) -> bool {
        match self.refs.get_mut(reference.key()) {
            Some(record) => {
                record.data = data;
                true
            }
            None => {
                tracing::warn!(kind = %S::KIND, "data write on a stale reference");
                false
            }
        }
    }

    /// Destroy the referenced entity through the normal deactivation
    /// path (listeners notified). A stale or dormant handle is a
    /// script-visible error.
    pub fn destroy(
        &mut self,
        api: &mut impl SimApi<S>,
        reference: &Reference,
        header: i32,
        payload: ScriptValue,
    ) -> Result<(), LifecycleError> {
        let target = self
            .refs
            .get(reference.key())
            .and_then(|record| record.target);
        match target {
            Some(id) if self.verify(id) => self.deactivate(api, id, header, payload, true),
            _ => {
                let err = LifecycleError::StaleReference { kind: S::KIND };
                tracing::warn!(%err, "destroy refused");
                Err(err)
            }
        }
    }

    /// Number of references chained to a slot, dormant ones included.
    pub fn count_refs(&self, id: u32) -> usize {
        self.walk_chain(id, |_| true)
    }

    /// Number of persistent references chained to a slot.
    pub fn count_persistent_refs(&self, id: u32) -> usize {
        self.walk_chain(id, |record| record.persistent)
    }

    fn walk_chain(&self, id: u32, keep: impl Fn(&RefRecord) -> bool) -> usize {
        let Some(slot) = self.slots.get(id as usize) else {
            return 0;
        };
        let mut count = 0;
        let mut cursor = slot.root;
        while let Some(index) = cursor {
            let record = self.refs.record(index);
            if keep(record) {
                count += 1;
            }
            cursor = record.next;
        }
        count
    }

    // ------------------------------------------------------------------
    // Chain surgery
    // ------------------------------------------------------------------

    fn chain_push(&mut self, slot_index: u32, index: u32) {
        let old_root = self.slots[slot_index as usize].root;
        if let Some(old) = old_root {
            self.refs.record_mut(old).prev = Some(index);
        }
        let record = self.refs.record_mut(index);
        record.prev = None;
        record.next = old_root;
        record.chain = Some(slot_index);
        self.slots[slot_index as usize].root = Some(index);
    }

    fn chain_remove(&mut self, index: u32) {
        let (chain, prev, next) = {
            let record = self.refs.record_mut(index);
            let links = (record.chain, record.prev, record.next);
            record.chain = None;
            record.prev = None;
            record.next = None;
            links
        };
        match prev {
            Some(prev) => self.refs.record_mut(prev).next = next,
            None => {
                if let Some(slot_index) = chain {
                    self.slots[slot_index as usize].root = next;
                }
            }
        }
        if let Some(next) = next {
            self.refs.record_mut(next).prev = prev;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::player::{self, PlayerArgs, PlayerSpec};
    use std::cell::RefCell;

    /// External API stub handing out the lowest free id, the way the
    /// simulation allocates. Records every destroy call.
    struct StubApi {
        live: Vec<bool>,
        destroyed: Vec<u32>,
    }

    impl StubApi {
        fn new(capacity: usize) -> Self {
            Self {
                live: vec![false; capacity],
                destroyed: Vec::new(),
            }
        }
    }

    impl SimApi<PlayerSpec> for StubApi {
        fn create(&mut self, _args: &PlayerArgs) -> Option<u32> {
            let index = self.live.iter().position(|live| !live)?;
            self.live[index] = true;
            Some(index as u32)
        }

        fn destroy(&mut self, id: u32) {
            self.destroyed.push(id);
            if let Some(live) = self.live.get_mut(id as usize) {
                *live = false;
            }
        }
    }

    /// External API that hands back an id the pool cannot hold.
    struct BadApi {
        hands_out: u32,
        destroyed: Vec<u32>,
    }

    impl SimApi<PlayerSpec> for BadApi {
        fn create(&mut self, _args: &PlayerArgs) -> Option<u32> {
            Some(self.hands_out)
        }

        fn destroy(&mut self, id: u32) {
            self.destroyed.push(id);
        }
    }

    fn pool(capacity: usize) -> (EntityManager<PlayerSpec>, StubApi) {
        (EntityManager::new(capacity), StubApi::new(capacity))
    }

    fn spawn(manager: &mut EntityManager<PlayerSpec>, api: &mut StubApi) -> u32 {
        manager
            .create(api, 0, ScriptValue::Null, false, PlayerArgs::default())
            .expect("create should succeed")
    }

    #[test]
    fn pool_exhaustion_and_slot_reuse() {
        let (mut manager, mut api) = pool(3);

        assert_eq!(spawn(&mut manager, &mut api), 0);
        assert_eq!(spawn(&mut manager, &mut api), 1);
        assert_eq!(spawn(&mut manager, &mut api), 2);

        // Fourth create fails and no external destroy leaks from it.
        let overflow = manager.create(&mut api, 0, ScriptValue::Null, false, PlayerArgs::default());
        assert_eq!(overflow, None);
        assert!(api.destroyed.is_empty());

        // The core reflects whatever id the external API hands back.
        manager
            .deactivate(&mut api, 1, 0, ScriptValue::Null, false)
            .unwrap();
        assert_eq!(spawn(&mut manager, &mut api), 1);
    }

    #[test]
    fn deactivate_invalidates_verify() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);
        assert!(manager.verify(id));

        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();
        assert!(!manager.verify(id));
        assert_eq!(api.destroyed, vec![id]);
    }

    #[test]
    fn persistent_reference_goes_dormant_and_resurrects() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let reference = manager.bind(id);
        manager.set_persistent(&reference, true);
        manager.set_local_tag(&reference, "sticky");
        manager.set_local_data(&reference, ScriptValue::from(42));

        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();
        assert!(!manager.is_valid(&reference));
        assert_eq!(manager.ref_id(&reference), None);

        // Reactivating the same index restores the handle untouched,
        // with no action from the handle's owner.
        manager.activate(id, true, None).unwrap();
        assert!(manager.is_valid(&reference));
        assert_eq!(manager.ref_id(&reference), Some(id));
        assert_eq!(manager.local_tag(&reference), "sticky");
        assert_eq!(manager.local_data(&reference), ScriptValue::from(42));
    }

    #[test]
    fn non_persistent_reference_is_unlinked_but_survives() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let transient = manager.bind(id);
        manager.set_local_tag(&transient, "mine");
        let keeper = manager.bind(id);
        manager.set_persistent(&keeper, true);
        assert_eq!(manager.count_refs(id), 2);

        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();

        // Chain now holds only the dormant persistent member.
        assert_eq!(manager.count_refs(id), 1);
        assert_eq!(manager.count_persistent_refs(id), 1);

        // The caller still owns the transient handle; it merely reads
        // as invalid, local state intact.
        assert!(!manager.is_valid(&transient));
        assert_eq!(manager.local_tag(&transient), "mine");
    }

    #[test]
    fn set_id_round_trip_preserves_chain_membership() {
        let (mut manager, mut api) = pool(3);
        let first = spawn(&mut manager, &mut api);
        let second = spawn(&mut manager, &mut api);

        let reference = manager.bind(first);
        let before = manager.count_refs(first);

        assert!(manager.set_id(&reference, second));
        assert_eq!(manager.count_refs(first), before - 1);
        assert_eq!(manager.count_refs(second), 1);

        assert!(manager.set_id(&reference, first));
        assert_eq!(manager.count_refs(first), before);
        assert_eq!(manager.count_refs(second), 0);
        assert_eq!(manager.ref_id(&reference), Some(first));
    }

    #[test]
    fn clone_ref_is_an_independent_chain_member() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let original = manager.bind(id);
        manager.set_local_tag(&original, "shared");
        let copy = manager.clone_ref(&original);
        assert_eq!(manager.count_refs(id), 2);
        assert_eq!(manager.local_tag(&copy), "shared");

        // Diverge the copy's local state; the original is untouched.
        manager.set_local_tag(&copy, "mine");
        assert_eq!(manager.local_tag(&original), "shared");

        manager.unbind(original);
        assert_eq!(manager.count_refs(id), 1);
        assert!(manager.is_valid(&copy));
    }

    #[test]
    fn destroy_through_stale_reference_is_an_error() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let reference = manager.bind(id);
        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();

        let result = manager.destroy(&mut api, &reference, 0, ScriptValue::Null);
        assert!(matches!(result, Err(LifecycleError::StaleReference { .. })));
        // The failed destroy must not reach the external API again.
        assert_eq!(api.destroyed, vec![id]);
    }

    #[test]
    fn destroy_through_valid_reference_deactivates() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let reference = manager.bind(id);
        manager
            .destroy(&mut api, &reference, 0, ScriptValue::Null)
            .unwrap();
        assert!(!manager.verify(id));
        assert_eq!(api.destroyed, vec![id]);
    }

    #[test]
    fn double_activation_and_double_deactivation_are_rejected() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let again = manager.activate(id, true, None);
        assert!(matches!(again, Err(LifecycleError::AlreadyActive { .. })));

        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();
        let twice = manager.deactivate(&mut api, id, 0, ScriptValue::Null, false);
        assert!(matches!(twice, Err(LifecycleError::NotActive { .. })));
        assert_eq!(api.destroyed, vec![id]);

        let out_of_range = manager.activate(99, true, None);
        assert!(matches!(out_of_range, Err(LifecycleError::IdOutOfRange { .. })));
    }

    #[test]
    fn create_rollback_destroys_the_orphaned_external_object() {
        let mut manager = EntityManager::<PlayerSpec>::new(3);
        let mut api = BadApi {
            hands_out: 7,
            destroyed: Vec::new(),
        };

        let id = manager.create(&mut api, 0, ScriptValue::Null, false, PlayerArgs::default());
        assert_eq!(id, None);
        assert_eq!(api.destroyed, vec![7]);
    }

    #[test]
    fn destroyed_signal_fires_slot_local_then_global() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let order = Rc::new(RefCell::new(Vec::new()));
        let local = Rc::clone(&order);
        manager
            .slot_mut(id)
            .unwrap()
            .events
            .destroyed
            .connect(move |_| local.borrow_mut().push("slot"));
        let global = Rc::clone(&order);
        manager
            .events
            .destroyed
            .connect(move |_| global.borrow_mut().push("global"));

        manager
            .deactivate(&mut api, id, 9, ScriptValue::from("bye"), true)
            .unwrap();
        assert_eq!(*order.borrow(), vec!["slot", "global"]);
    }

    #[test]
    fn slot_signals_cannot_fire_against_a_reused_index() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let hits = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&hits);
        manager
            .slot_mut(id)
            .unwrap()
            .events
            .custom
            .connect(move |_| *seen.borrow_mut() += 1);

        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();
        assert_eq!(spawn(&mut manager, &mut api), id);

        manager.emit_custom(id, 0, ScriptValue::Null).unwrap();
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn slot_tag_and_data_are_sticky_across_reactivation() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        manager.set_tag(id, "base").unwrap();
        manager.set_data(id, ScriptValue::from(7)).unwrap();

        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();
        manager.activate(id, true, None).unwrap();

        // The fresh purge happened on first activation only.
        assert_eq!(manager.tag(id), "base");
        assert_eq!(manager.data(id), ScriptValue::from(7));
    }

    #[test]
    fn reads_on_invalid_slots_default_instead_of_failing() {
        let (manager, _api) = pool(3);
        assert_eq!(manager.tag(99), "");
        assert_eq!(manager.data(99), ScriptValue::Null);
        assert_eq!(manager.count_refs(99), 0);
    }

    #[test]
    fn nested_property_change_is_suppressed_by_the_guard() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let emissions = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&emissions);
        manager
            .slot_mut(id)
            .unwrap()
            .fields
            .world_changed
            .connect(move |_| *seen.borrow_mut() += 1);

        assert!(player::set_world(&mut manager, id, 5));
        assert_eq!(manager.slot(id).unwrap().fields.world, 5);
        assert_eq!(*emissions.borrow(), 1);

        // While the WORLD bit is held (an emission in flight), a nested
        // call performs no write and no emission.
        let guard = manager.lock_events(id, LockFlags::WORLD).unwrap();
        assert!(!player::set_world(&mut manager, id, 9));
        assert_eq!(manager.slot(id).unwrap().fields.world, 5);
        assert_eq!(*emissions.borrow(), 1);

        drop(guard);
        assert!(player::set_world(&mut manager, id, 9));
        assert_eq!(*emissions.borrow(), 2);
    }

    #[test]
    fn unchanged_property_runs_unsuppressed_without_firing() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let emissions = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&emissions);
        manager
            .slot_mut(id)
            .unwrap()
            .fields
            .world_changed
            .connect(move |_| *seen.borrow_mut() += 1);

        assert!(player::set_world(&mut manager, id, 5));
        assert_eq!(*emissions.borrow(), 1);

        // Setting the current value is not a suppression: the setter
        // runs under the guard, skips the write, and fires nothing.
        assert!(player::set_world(&mut manager, id, 5));
        assert_eq!(manager.slot(id).unwrap().fields.world, 5);
        assert_eq!(*emissions.borrow(), 1);
    }

    #[test]
    fn stale_keys_do_not_alias_recycled_records() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let reference = manager.bind(id);
        let stale_key = reference.key();
        manager.unbind(reference);

        // The arena recycles the index for the next binding.
        let replacement = manager.bind(id);
        assert_eq!(replacement.key().index(), stale_key.index());

        let stale = Reference::from_key(stale_key);
        assert!(!manager.is_valid(&stale));
        assert!(!manager.set_persistent(&stale, true));
        assert_eq!(manager.local_tag(&stale), "");
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn lifecycle_counters_track_transitions() {
        let (mut manager, mut api) = pool(3);
        let id = spawn(&mut manager, &mut api);

        let reference = manager.bind(id);
        manager.set_persistent(&reference, true);
        manager
            .deactivate(&mut api, id, 0, ScriptValue::Null, false)
            .unwrap();
        manager.activate(id, true, None).unwrap();

        assert_eq!(manager.counters().get("created"), 1);
        assert_eq!(manager.counters().get("destroyed"), 1);
        assert_eq!(manager.counters().get("resurrected"), 1);
    }
}
