//! Vanished marker component.
//!
//! Inserted by [`action_system`](crate::systems::action::action_system) when
//! an entity's [`ActionController`](crate::action::controller::ActionController)
//! reaches a `Delete` step, and removed again if the controller is rebound.
//! Entities keep it until something recycles them.

use bevy_ecs::prelude::Component;

/// Tag component for entities whose script has finished with a `Delete` step.
#[derive(Component, Clone, Copy, Debug)]
pub struct Vanished;
