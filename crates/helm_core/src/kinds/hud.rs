//! HUD kinds: blips, sprites and textdraws
//!
//! Screen-space elements with small event sets; visibility toward a
//! given player is the only thing they report.

use glam::{Vec2, Vec3};

use crate::entity::EntitySpec;
use crate::kind::EntityKind;
use crate::signal::Signal;

#[derive(Default)]
pub struct BlipFields {
    pub position: Vec3,
    pub world: i32,
    pub scale: i32,
    pub sprite_id: i32,
    pub color: u32,
}

pub struct BlipSpec;

#[derive(Debug, Clone, Default)]
pub struct BlipArgs {
    pub position: Vec3,
    pub world: i32,
    pub scale: i32,
    pub sprite_id: i32,
    pub color: u32,
}

impl EntitySpec for BlipSpec {
    const KIND: EntityKind = EntityKind::Blip;
    type Fields = BlipFields;
    type CreateArgs = BlipArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.position = args.position;
        fields.world = args.world;
        fields.scale = args.scale;
        fields.sprite_id = args.sprite_id;
        fields.color = args.color;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = BlipFields::default();
    }

    fn deinit(_fields: &mut Self::Fields) {
        // Blips carry no kind signals.
    }
}

#[derive(Default)]
pub struct SpriteFields {
    pub path: String,
    pub position: Vec2,
    pub rotation: f32,
    pub alpha: u8,
    /// (sprite, player)
    pub shown: Signal<(u32, u32)>,
    /// (sprite, player)
    pub hidden: Signal<(u32, u32)>,
}

pub struct SpriteSpec;

#[derive(Debug, Clone, Default)]
pub struct SpriteArgs {
    pub path: String,
    pub position: Vec2,
    pub rotation: f32,
    pub alpha: u8,
}

impl EntitySpec for SpriteSpec {
    const KIND: EntityKind = EntityKind::Sprite;
    type Fields = SpriteFields;
    type CreateArgs = SpriteArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.path = args.path.clone();
        fields.position = args.position;
        fields.rotation = args.rotation;
        fields.alpha = args.alpha;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = SpriteFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.shown.clear();
        fields.hidden.clear();
    }
}

#[derive(Default)]
pub struct TextdrawFields {
    pub text: String,
    pub position: Vec2,
    pub color: u32,
    pub relative: bool,
    /// (textdraw, player)
    pub shown: Signal<(u32, u32)>,
    /// (textdraw, player)
    pub hidden: Signal<(u32, u32)>,
}

pub struct TextdrawSpec;

#[derive(Debug, Clone, Default)]
pub struct TextdrawArgs {
    pub text: String,
    pub position: Vec2,
    pub color: u32,
    pub relative: bool,
}

impl EntitySpec for TextdrawSpec {
    const KIND: EntityKind = EntityKind::Textdraw;
    type Fields = TextdrawFields;
    type CreateArgs = TextdrawArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.text = args.text.clone();
        fields.position = args.position;
        fields.color = args.color;
        fields.relative = args.relative;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = TextdrawFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.shown.clear();
        fields.hidden.clear();
    }
}
