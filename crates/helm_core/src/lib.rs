//! Helm Entity Core
//!
//! Contains the lifecycle systems of the scripting host:
//! - Typed signal bus (multicast callbacks for lifecycle and domain events)
//! - Fixed-capacity slot pools, one per entity kind
//! - Caller-owned references with persistence and resurrection
//! - The entity manager orchestrating create/activate/deactivate

pub mod entity;
pub mod error;
pub mod guard;
pub mod kind;
pub mod kinds;
pub mod manager;
pub mod refs;
pub mod signal;
pub mod slot;

pub use entity::{EntitySpec, SimApi};
pub use error::LifecycleError;
pub use guard::{CircularGuard, LockFlags};
pub use kind::EntityKind;
pub use manager::EntityManager;
pub use refs::{RefKey, Reference};
pub use signal::{ListenerId, Signal};
pub use slot::{CoreEvents, EventArgs, ScriptValue, SlotInstance};

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
