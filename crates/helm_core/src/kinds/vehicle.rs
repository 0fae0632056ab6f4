//! Vehicle kind

use glam::Vec3;

use crate::entity::EntitySpec;
use crate::kind::EntityKind;
use crate::signal::Signal;

#[derive(Default)]
pub struct VehicleFields {
    pub model: i32,
    pub position: Vec3,
    pub angle: f32,
    pub world: i32,
    pub primary_color: i32,
    pub secondary_color: i32,
    /// (vehicle, player)
    pub entered: Signal<(u32, u32)>,
    /// (vehicle, player)
    pub exited: Signal<(u32, u32)>,
    /// (vehicle,)
    pub respawned: Signal<(u32,)>,
}

pub struct VehicleSpec;

#[derive(Debug, Clone, Default)]
pub struct VehicleArgs {
    pub model: i32,
    pub position: Vec3,
    pub angle: f32,
    pub world: i32,
    pub primary_color: i32,
    pub secondary_color: i32,
}

impl EntitySpec for VehicleSpec {
    const KIND: EntityKind = EntityKind::Vehicle;
    type Fields = VehicleFields;
    type CreateArgs = VehicleArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.model = args.model;
        fields.position = args.position;
        fields.angle = args.angle;
        fields.world = args.world;
        fields.primary_color = args.primary_color;
        fields.secondary_color = args.secondary_color;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = VehicleFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.entered.clear();
        fields.exited.clear();
        fields.respawned.clear();
    }
}
