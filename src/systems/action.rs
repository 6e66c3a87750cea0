//! Action script system.
//!
//! Drives every entity carrying an
//! [`ActionController`](crate::action::controller::ActionController) by the
//! scaled frame delta of [`WorldTime`].
//!
//! # Entity mapping
//!
//! The controller sees the entity through [`EntityTarget`]:
//!
//! - position `x`/`y` come from [`MapPosition`], `z` from [`ZIndex`] (0 when
//!   absent)
//! - rotation from [`Rotation`] (writes are dropped when absent)
//! - animation switches go to [`Animation`] (dropped when absent)
//!
//! # Vanishing
//!
//! When a controller reaches a `Delete` step the entity gets the
//! [`Vanished`] marker and an [`ActionVanishedEvent`] is triggered, once. The
//! marker is removed if the controller is later rebound to a live sequence.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::action::controller::{ActionController, ActionTarget};
use crate::components::animation::Animation;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::vanished::Vanished;
use crate::components::zindex::ZIndex;
use crate::events::vanish::ActionVanishedEvent;
use crate::resources::worldtime::WorldTime;

/// [`ActionTarget`] view over an entity's components.
pub struct EntityTarget<'a> {
    pub position: Mut<'a, MapPosition>,
    pub depth: Option<Mut<'a, ZIndex>>,
    pub rotation: Option<Mut<'a, Rotation>>,
    pub animation: Option<Mut<'a, Animation>>,
}

impl ActionTarget for EntityTarget<'_> {
    fn position(&self) -> Vec3 {
        let z = self.depth.as_ref().map_or(0.0, |d| d.0);
        self.position.pos.extend(z)
    }

    fn set_position(&mut self, position: Vec3) {
        self.position.pos = position.truncate();
        if let Some(depth) = self.depth.as_mut() {
            if depth.0 != position.z {
                depth.0 = position.z;
            }
        }
    }

    fn rotation(&self) -> f32 {
        self.rotation.as_ref().map_or(0.0, |r| r.degrees)
    }

    fn set_rotation(&mut self, degrees: f32) {
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.degrees = degrees;
        }
    }

    fn set_animation(&mut self, sequence: usize) {
        if let Some(animation) = self.animation.as_mut() {
            animation.switch_to(sequence);
        }
    }
}

type ActionQueryData = (
    Entity,
    &'static mut ActionController,
    &'static mut MapPosition,
    Option<&'static mut ZIndex>,
    Option<&'static mut Rotation>,
    Option<&'static mut Animation>,
    Has<Vanished>,
);

/// Advance all action controllers by the frame delta.
///
/// Skipped while time is frozen: generators read a zero delta as their
/// activation call.
pub fn action_system(
    time: Res<WorldTime>,
    mut query: Query<ActionQueryData>,
    mut commands: Commands,
) {
    let dt = time.delta; // delta is already scaled
    if dt <= 0.0 {
        return;
    }
    for (entity, mut controller, position, depth, rotation, animation, was_vanished) in
        query.iter_mut()
    {
        let mut target = EntityTarget {
            position,
            depth,
            rotation,
            animation,
        };
        controller.update(dt, &mut target);

        match (controller.is_deletable(), was_vanished) {
            (true, false) => {
                commands.entity(entity).insert(Vanished);
                commands.trigger(ActionVanishedEvent { entity });
            }
            (false, true) => {
                commands.entity(entity).remove::<Vanished>();
            }
            _ => {}
        }
    }
}
