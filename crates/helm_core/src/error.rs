use crate::kind::EntityKind;
use thiserror::Error;

/// Errors surfaced by lifecycle bookkeeping.
///
/// Violations inside the manager (bad index, double (de)activation) are
/// logged and returned, never panicked, so a misbehaving script cannot
/// unwind the simulation tick. Stale-handle operations invoked directly
/// by a script propagate as errors for the script layer to surface.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{kind} id {id} out of range (pool capacity {capacity})")]
    IdOutOfRange {
        kind: EntityKind,
        id: u32,
        capacity: usize,
    },

    #[error("{kind} slot {id} is already active")]
    AlreadyActive { kind: EntityKind, id: u32 },

    #[error("{kind} slot {id} is not active")]
    NotActive { kind: EntityKind, id: u32 },

    #[error("{kind} reference is stale or targets an inactive slot")]
    StaleReference { kind: EntityKind },
}
