//! World-space position of an entity.
//!
//! The action systems read and write this pivot directly; depth lives in
//! [`ZIndex`](crate::components::zindex::ZIndex).

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// 2D world position in screen orientation (Y grows downwards).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }

    pub fn from_vec(pos: Vec2) -> Self {
        Self { pos }
    }
}
