//! ECS resource that bridges generators with the world.
//!
//! Use [`setup_spawning`] once during initialization to create the channel
//! and insert the [`SpawnBridge`] resource. Generators get their own sender
//! through [`SpawnBridge::sender`].

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::events::spawn::SpawnCmd;

/// Shared channel between generators and the spawn system.
#[derive(Resource)]
pub struct SpawnBridge {
    /// Sender for [`SpawnCmd`] messages (generators -> ECS).
    pub tx_cmd: Sender<SpawnCmd>,
    /// Receiver drained by [`spawn_system`](crate::systems::spawn::spawn_system).
    pub rx_cmd: Receiver<SpawnCmd>,
}

impl SpawnBridge {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<SpawnCmd>();
        Self { tx_cmd, rx_cmd }
    }

    /// A sender to move into a generator closure.
    pub fn sender(&self) -> Sender<SpawnCmd> {
        self.tx_cmd.clone()
    }
}

impl Default for SpawnBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the spawn channel and register the bridge resource.
///
/// Returns a sender for generators built before the first frame.
pub fn setup_spawning(world: &mut World) -> Sender<SpawnCmd> {
    let bridge = SpawnBridge::new();
    let tx = bridge.sender();
    world.insert_resource(bridge);
    tx
}
