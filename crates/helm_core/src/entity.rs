//! Static policy and external-simulation seams
//!
//! Each entity kind supplies an [`EntitySpec`]: its kind tag, the struct
//! of kind-specific fields (including that kind's domain-event signals),
//! the construction arguments, and the init/deinit hooks that populate
//! and tear those fields down. The manager itself stays generic over the
//! policy and never inspects kind fields.
//!
//! The true lifetime of every entity is owned by the external simulation.
//! [`SimApi`] is the whole contract the core consumes from it: a creation
//! call that hands back an externally-assigned id (or nothing on
//! failure), and a destruction call.

use crate::kind::EntityKind;

/// Per-kind static policy.
pub trait EntitySpec: Sized {
    const KIND: EntityKind;

    /// Kind-specific slot fields, including the kind's domain signals.
    type Fields: Default;

    /// Arguments forwarded from `create` to the external API and `init`.
    type CreateArgs;

    /// Populate kind fields from construction arguments.
    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs);

    /// Default-initialize kind fields (activation without arguments,
    /// e.g. when tracking an entity created elsewhere).
    fn init_default(fields: &mut Self::Fields);

    /// Tear kind fields down. Must clear every kind signal so stale
    /// subscriptions cannot fire against a future occupant of the slot.
    fn deinit(fields: &mut Self::Fields);
}

/// The external simulation's create/destroy contract for one kind.
pub trait SimApi<S: EntitySpec> {
    /// Create the external object; `None` is the failure sentinel. The
    /// returned id is assigned by the simulation, not by this core.
    fn create(&mut self, args: &S::CreateArgs) -> Option<u32>;

    /// Destroy the external object.
    fn destroy(&mut self, id: u32);
}
