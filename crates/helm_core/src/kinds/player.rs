//! Player kind
//!
//! Players are created by the simulation when a client connects; the
//! manager usually tracks them with `owned = false`. The kind carries
//! the densest event set of any entity.

use glam::Vec3;

use crate::entity::EntitySpec;
use crate::guard::LockFlags;
use crate::kind::EntityKind;
use crate::manager::EntityManager;
use crate::signal::Signal;

#[derive(Default)]
pub struct PlayerFields {
    pub name: String,
    pub position: Vec3,
    pub world: i32,
    pub team: i32,
    pub skin: i32,
    /// (player, old world, new world)
    pub world_changed: Signal<(u32, i32, i32)>,
    /// (player, key slot)
    pub key_press: Signal<(u32, i32)>,
    /// (shooter, target, weapon)
    pub shot: Signal<(u32, u32, i32)>,
    /// (player,)
    pub spawned: Signal<(u32,)>,
}

pub struct PlayerSpec;

#[derive(Debug, Clone, Default)]
pub struct PlayerArgs {
    pub name: String,
    pub position: Vec3,
    pub world: i32,
}

impl EntitySpec for PlayerSpec {
    const KIND: EntityKind = EntityKind::Player;
    type Fields = PlayerFields;
    type CreateArgs = PlayerArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.name = args.name.clone();
        fields.position = args.position;
        fields.world = args.world;
        fields.team = 0;
        fields.skin = 0;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = PlayerFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.world_changed.clear();
        fields.key_press.clear();
        fields.shot.clear();
        fields.spawned.clear();
    }
}

/// Change a player's world and fire `world_changed`, under the WORLD
/// category guard: a listener re-entering this setter is suppressed
/// before anything is written.
///
/// The return value reports the guard only: `false` means the call was
/// suppressed (or the slot is invalid), `true` that it ran — a no-op
/// write to the current world still returns `true` without firing.
pub fn set_world(manager: &mut EntityManager<PlayerSpec>, id: u32, world: i32) -> bool {
    manager.emit_change(id, LockFlags::WORLD, |slot| {
        let previous = slot.fields.world;
        if previous == world {
            return;
        }
        slot.fields.world = world;
        slot.fields.world_changed.emit(&(id, previous, world));
    })
}
