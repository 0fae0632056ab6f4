//! Keybind kind

use crate::entity::EntitySpec;
use crate::kind::EntityKind;
use crate::signal::Signal;

#[derive(Default)]
pub struct KeybindFields {
    pub primary: i32,
    pub secondary: i32,
    pub alternative: i32,
    pub on_release: bool,
    /// (keybind, player)
    pub pressed: Signal<(u32, u32)>,
    /// (keybind, player)
    pub released: Signal<(u32, u32)>,
}

pub struct KeybindSpec;

#[derive(Debug, Clone, Default)]
pub struct KeybindArgs {
    pub primary: i32,
    pub secondary: i32,
    pub alternative: i32,
    pub on_release: bool,
}

impl EntitySpec for KeybindSpec {
    const KIND: EntityKind = EntityKind::Keybind;
    type Fields = KeybindFields;
    type CreateArgs = KeybindArgs;

    fn init(fields: &mut Self::Fields, args: &Self::CreateArgs) {
        fields.primary = args.primary;
        fields.secondary = args.secondary;
        fields.alternative = args.alternative;
        fields.on_release = args.on_release;
    }

    fn init_default(fields: &mut Self::Fields) {
        *fields = KeybindFields::default();
    }

    fn deinit(fields: &mut Self::Fields) {
        fields.pressed.clear();
        fields.released.clear();
    }
}
