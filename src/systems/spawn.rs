//! Spawn request system.
//!
//! Drains the [`SpawnBridge`] channel and turns each [`SpawnCmd`] into an
//! entity. Spawned entities get a controller of their own, so what they do
//! is again driven by [`action_system`](crate::systems::action::action_system)
//! starting next frame.

use bevy_ecs::prelude::*;
use log::debug;

use crate::action::controller::ActionController;
use crate::components::animation::Animation;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::ttl::Ttl;
use crate::components::zindex::ZIndex;
use crate::events::spawn::SpawnCmd;
use crate::resources::actionconfig::ActionConfig;
use crate::resources::spawnbridge::SpawnBridge;

/// Spawn every entity requested since the last frame.
pub fn spawn_system(
    bridge: Option<Res<SpawnBridge>>,
    config: Option<Res<ActionConfig>>,
    mut commands: Commands,
) {
    let Some(bridge) = bridge else {
        return;
    };
    let curve = config.map(|c| c.curve_settings()).unwrap_or_default();

    for cmd in bridge.rx_cmd.try_iter() {
        let position = cmd.position();
        let base = (
            MapPosition::new(position.x, position.y),
            ZIndex(position.z),
        );
        match cmd {
            SpawnCmd::Projectile {
                direction,
                speed,
                ttl,
                ..
            } => {
                let mut controller = ActionController::manual();
                controller.set_manual_move(direction, speed);
                let entity = commands
                    .spawn((base, Rotation { degrees: direction }, controller))
                    .insert_if(Ttl::new(ttl.unwrap_or(0.0)), || ttl.is_some())
                    .id();
                debug!(
                    "Spawned projectile {:?} at {} heading {} at {}",
                    entity, position, direction, speed
                );
            }
            SpawnCmd::Scripted {
                script, sequence, ..
            } => {
                let name = script.name().to_string();
                let controller = ActionController::manual()
                    .with_curve_settings(curve)
                    .with_script(script, sequence);
                let entity = commands
                    .spawn((base, Rotation::default(), Animation::default(), controller))
                    .id();
                debug!(
                    "Spawned '{}'[{}] as {:?} at {}",
                    name, sequence, entity, position
                );
            }
        }
    }
}
