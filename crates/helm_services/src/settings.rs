//! Settings management
//!
//! Per-kind pool capacities, overridable from a JSON file. Defaults
//! mirror the compile-time kind capacities; a pool's capacity is fixed
//! the moment the manager is constructed from these values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use helm_core::EntityKind;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Host settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pools: PoolSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub blips: usize,
    pub checkpoints: usize,
    pub keybinds: usize,
    pub objects: usize,
    pub pickups: usize,
    pub players: usize,
    pub spheres: usize,
    pub sprites: usize,
    pub textdraws: usize,
    pub vehicles: usize,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            blips: EntityKind::Blip.capacity(),
            checkpoints: EntityKind::Checkpoint.capacity(),
            keybinds: EntityKind::Keybind.capacity(),
            objects: EntityKind::Object.capacity(),
            pickups: EntityKind::Pickup.capacity(),
            players: EntityKind::Player.capacity(),
            spheres: EntityKind::Sphere.capacity(),
            sprites: EntityKind::Sprite.capacity(),
            textdraws: EntityKind::Textdraw.capacity(),
            vehicles: EntityKind::Vehicle.capacity(),
        }
    }
}

impl PoolSettings {
    pub fn capacity(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Blip => self.blips,
            EntityKind::Checkpoint => self.checkpoints,
            EntityKind::Keybind => self.keybinds,
            EntityKind::Object => self.objects,
            EntityKind::Pickup => self.pickups,
            EntityKind::Player => self.players,
            EntityKind::Sphere => self.spheres,
            EntityKind::Sprite => self.sprites,
            EntityKind::Textdraw => self.textdraws,
            EntityKind::Vehicle => self.vehicles,
        }
    }
}

impl Settings {
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
