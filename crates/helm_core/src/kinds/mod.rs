//! Per-kind static policies
//!
//! One [`EntitySpec`](crate::entity::EntitySpec) implementation per
//! entity kind: the kind's slot fields, its domain-event signals, and
//! the init/deinit hooks the manager drives. The exhaustive 1:1
//! property surface of the external API does not live here; these
//! fields are the bookkeeping the lifecycle core itself needs.

pub mod hud;
pub mod keybind;
pub mod player;
pub mod props;
pub mod vehicle;
pub mod zones;

pub use hud::{BlipSpec, SpriteSpec, TextdrawSpec};
pub use keybind::KeybindSpec;
pub use player::PlayerSpec;
pub use props::{ObjectSpec, PickupSpec};
pub use vehicle::VehicleSpec;
pub use zones::{CheckpointSpec, SphereSpec};
