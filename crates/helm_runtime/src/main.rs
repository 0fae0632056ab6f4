//! Helm Runtime
//!
//! Minimal binary that wires the entity pools to a local simulation
//! stand-in and walks one create/bind/destroy cycle. The real host
//! embeds the managers next to its scripting layer instead.

mod sim;

use anyhow::Result;
use glam::Vec3;

use helm_core::kinds::player::{self, PlayerArgs, PlayerSpec};
use helm_core::kinds::vehicle::{VehicleArgs, VehicleSpec};
use helm_core::{EntityManager, EventArgs, ScriptValue};
use helm_services::Settings;
use sim::LocalSim;

const SETTINGS_PATH: &str = "helm.settings.json";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Helm v{}", helm_core::VERSION);
    helm_services::init_services();

    let settings = match Settings::load_from(SETTINGS_PATH) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::info!(%err, "no settings file, using defaults");
            Settings::default()
        }
    };

    let mut players = EntityManager::<PlayerSpec>::new(settings.pools.players);
    let mut player_sim = LocalSim::new(settings.pools.players);
    let mut vehicles = EntityManager::<VehicleSpec>::new(settings.pools.vehicles);
    let mut vehicle_sim = LocalSim::new(settings.pools.vehicles);

    players.events.created.connect(|event: &EventArgs| {
        tracing::info!(id = event.0, "player joined");
    });
    players.events.destroyed.connect(|event: &EventArgs| {
        tracing::info!(id = event.0, "player left");
    });

    let driver = players
        .create(
            &mut player_sim,
            0,
            ScriptValue::Null,
            true,
            PlayerArgs {
                name: "driver".into(),
                position: Vec3::ZERO,
                world: 1,
            },
        )
        .ok_or_else(|| anyhow::anyhow!("player pool exhausted at boot"))?;
    player::set_world(&mut players, driver, 2);

    let ride = vehicles
        .create(
            &mut vehicle_sim,
            0,
            ScriptValue::Null,
            true,
            VehicleArgs {
                model: 191,
                position: Vec3::new(4.0, 2.0, 0.0),
                world: 2,
                ..VehicleArgs::default()
            },
        )
        .ok_or_else(|| anyhow::anyhow!("vehicle pool exhausted at boot"))?;

    // A persistent script binding survives the vehicle's respawn cycle.
    let binding = vehicles.bind(ride);
    vehicles.set_persistent(&binding, true);
    vehicles.set_local_tag(&binding, "mission-car");

    vehicles.deactivate(&mut vehicle_sim, ride, 0, ScriptValue::Null, true)?;
    tracing::info!(valid = vehicles.is_valid(&binding), "binding while dormant");
    vehicles.activate(ride, true, None)?;
    tracing::info!(
        valid = vehicles.is_valid(&binding),
        tag = %vehicles.local_tag(&binding),
        "binding resurrected"
    );
    vehicles.unbind(binding);

    players.deactivate(&mut player_sim, driver, 0, ScriptValue::Null, true)?;

    for (name, value) in players.counters().iter() {
        tracing::info!(pool = "players", name, value, "lifecycle counter");
    }
    for (name, value) in vehicles.counters().iter() {
        tracing::info!(pool = "vehicles", name, value, "lifecycle counter");
    }
    tracing::info!(
        players = players.active_count(),
        vehicles = vehicles.active_count(),
        bindings = players.reference_count() + vehicles.reference_count(),
        external = player_sim.live_count() + vehicle_sim.live_count(),
        "shutdown"
    );
    Ok(())
}
