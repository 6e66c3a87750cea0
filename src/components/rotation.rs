use bevy_ecs::prelude::Component;

/// Rotation in degrees, 0 along +X and 90 up the screen.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}
