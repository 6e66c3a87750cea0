//! Spawn requests sent by generators.
//!
//! Generators run inside [`ActionController::update`] with no access to the
//! world, so they describe the entities they want as [`SpawnCmd`]s and push
//! them through the [`SpawnBridge`] channel. The
//! [`spawn_system`](crate::systems::spawn::spawn_system) drains the channel
//! every frame.
//!
//! [`ActionController::update`]: crate::action::controller::ActionController::update
//! [`SpawnBridge`]: crate::resources::spawnbridge::SpawnBridge

use std::sync::Arc;

use glam::Vec3;

use crate::action::script::ScriptSet;

/// Commands sent *to* the spawn system.
#[derive(Debug, Clone)]
pub enum SpawnCmd {
    /// Straight-flying entity driven by a manual controller.
    Projectile {
        position: Vec3,
        /// Degrees, 0 along +X and 90 up the screen.
        direction: f32,
        speed: f32,
        ttl: Option<f32>,
    },
    /// Entity playing a sequence of a script.
    Scripted {
        position: Vec3,
        script: Arc<ScriptSet>,
        sequence: usize,
    },
}

impl SpawnCmd {
    pub fn position(&self) -> Vec3 {
        match self {
            SpawnCmd::Projectile { position, .. } | SpawnCmd::Scripted { position, .. } => {
                *position
            }
        }
    }
}
