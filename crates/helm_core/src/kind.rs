//! Entity kinds
//!
//! The closed set of entity categories the host tracks. Every kind has a
//! fixed default pool capacity; capacities can be overridden when a pool
//! is constructed but never change afterwards.

use std::fmt;

/// One of the entity categories the server tracks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Blip,
    Checkpoint,
    Keybind,
    Object,
    Pickup,
    Player,
    Sphere,
    Sprite,
    Textdraw,
    Vehicle,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Blip,
        EntityKind::Checkpoint,
        EntityKind::Keybind,
        EntityKind::Object,
        EntityKind::Pickup,
        EntityKind::Player,
        EntityKind::Sphere,
        EntityKind::Sprite,
        EntityKind::Textdraw,
        EntityKind::Vehicle,
    ];

    /// Default pool capacity for this kind. Slot ids live in
    /// `[0, capacity)`.
    pub const fn capacity(self) -> usize {
        match self {
            EntityKind::Blip => 128,
            EntityKind::Checkpoint => 2000,
            EntityKind::Keybind => 256,
            EntityKind::Object => 3000,
            EntityKind::Pickup => 2000,
            EntityKind::Player => 150,
            EntityKind::Sphere => 2000,
            EntityKind::Sprite => 128,
            EntityKind::Textdraw => 128,
            EntityKind::Vehicle => 1000,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Blip => "blip",
            EntityKind::Checkpoint => "checkpoint",
            EntityKind::Keybind => "keybind",
            EntityKind::Object => "object",
            EntityKind::Pickup => "pickup",
            EntityKind::Player => "player",
            EntityKind::Sphere => "sphere",
            EntityKind::Sprite => "sprite",
            EntityKind::Textdraw => "textdraw",
            EntityKind::Vehicle => "vehicle",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_nonzero_capacity() {
        for kind in EntityKind::ALL {
            assert!(kind.capacity() > 0, "{kind} has an empty pool");
        }
    }
}
