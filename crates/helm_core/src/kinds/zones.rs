//! Radius-triggered zone kinds: checkpoints and spheres
//!
//! Both report players crossing their boundary; a checkpoint is
//! player-scoped and rendered on the ground, a sphere is a world-space
//! trigger volume.

use glam::{Vec3, Vec4};

use crate::entity::EntitySpec;
use crate::kind::EntityKind;
use crate::signal::Signal;

#[derive(Default)]
pub struct CheckpointFields {
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec4,
    pub world: i32,
    /// (checkpoint, player)
    pub entered: Signal<(u32, u32)>,
    /// (checkpoint, player)
    pub exited: Signal<(u32, u32)>,
}

pub struct CheckpointSpec;

#[derive(Debug, Clone, Default)]
pub struct CheckpointArgs {
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec4,
    pub world: i32,
}

impl EntitySpec for CheckpointSpec {
    const KIND: EntityKind = EntityKind::Checkpoint;
    type Fields = CheckpointFields;
    type CreateArgs = CheckpointArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.position = args.position;
        fields.radius = args.radius;
        fields.color = args.color;
        fields.world = args.world;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = CheckpointFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.entered.clear();
        fields.exited.clear();
    }
}

#[derive(Default)]
pub struct SphereFields {
    pub position: Vec3,
    pub radius: f32,
    pub world: i32,
    /// (sphere, player)
    pub entered: Signal<(u32, u32)>,
    /// (sphere, player)
    pub exited: Signal<(u32, u32)>,
}

pub struct SphereSpec;

#[derive(Debug, Clone, Default)]
pub struct SphereArgs {
    pub position: Vec3,
    pub radius: f32,
    pub world: i32,
}

impl EntitySpec for SphereSpec {
    const KIND: EntityKind = EntityKind::Sphere;
    type Fields = SphereFields;
    type CreateArgs = SphereArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.position = args.position;
        fields.radius = args.radius;
        fields.world = args.world;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = SphereFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.entered.clear();
        fields.exited.clear();
    }
}
