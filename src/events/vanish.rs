//! Vanish event and a simple observer.
//!
//! [`action_system`](crate::systems::action::action_system) triggers
//! [`ActionVanishedEvent`] once when an entity's script reaches a `Delete`
//! step. What happens next is up to the game: recycle the entity into a pool,
//! play an effect, or just despawn it with [`observe_despawn_on_vanish`].
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

/// Event fired when an entity's action script vanishes it.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActionVanishedEvent {
    pub entity: Entity,
}

/// Global observer that despawns the vanished entity.
pub fn observe_despawn_on_vanish(trigger: On<ActionVanishedEvent>, mut commands: Commands) {
    let entity = trigger.event().entity;
    debug!("Despawning vanished entity {:?}", entity);
    commands.entity(entity).try_despawn();
}
