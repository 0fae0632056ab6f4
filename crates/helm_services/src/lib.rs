//! Helm Services Layer
//!
//! Host-facing configuration for the entity pools.

pub mod settings;

pub use settings::{PoolSettings, Settings, SettingsError};

/// Service initialization (placeholder)
pub fn init_services() {
    tracing::debug!("services initialized");
}
