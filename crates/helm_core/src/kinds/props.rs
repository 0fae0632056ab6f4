//! World prop kinds: objects and pickups

use glam::Vec3;

use crate::entity::EntitySpec;
use crate::kind::EntityKind;
use crate::signal::Signal;

#[derive(Default)]
pub struct ObjectFields {
    pub model: i32,
    pub position: Vec3,
    pub world: i32,
    pub alpha: i32,
    /// (object, player, weapon)
    pub shot: Signal<(u32, u32, i32)>,
    /// (object, player)
    pub touched: Signal<(u32, u32)>,
}

pub struct ObjectSpec;

#[derive(Debug, Clone, Default)]
pub struct ObjectArgs {
    pub model: i32,
    pub position: Vec3,
    pub world: i32,
    pub alpha: i32,
}

impl EntitySpec for ObjectSpec {
    const KIND: EntityKind = EntityKind::Object;
    type Fields = ObjectFields;
    type CreateArgs = ObjectArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.model = args.model;
        fields.position = args.position;
        fields.world = args.world;
        fields.alpha = args.alpha;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = ObjectFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.shot.clear();
        fields.touched.clear();
    }
}

#[derive(Default)]
pub struct PickupFields {
    pub model: i32,
    pub quantity: i32,
    pub position: Vec3,
    pub world: i32,
    pub automatic: bool,
    /// (pickup, player)
    pub claimed: Signal<(u32, u32)>,
    /// (pickup, player)
    pub collected: Signal<(u32, u32)>,
    /// (pickup,)
    pub respawned: Signal<(u32,)>,
}

pub struct PickupSpec;

#[derive(Debug, Clone, Default)]
pub struct PickupArgs {
    pub model: i32,
    pub quantity: i32,
    pub position: Vec3,
    pub world: i32,
    pub automatic: bool,
}

impl EntitySpec for PickupSpec {
    const KIND: EntityKind = EntityKind::Pickup;
    type Fields = PickupFields;
    type CreateArgs = PickupArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.model = args.model;
        fields.quantity = args.quantity;
        fields.position = args.position;
        fields.world = args.world;
        fields.automatic = args.automatic;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = PickupFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.claimed.clear();
        fields.collected.clear();
        fields.respawned.clear();
    }
}
