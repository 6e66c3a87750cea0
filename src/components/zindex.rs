//! Depth component.
//!
//! The [`ZIndex`] component carries the third coordinate of an entity's
//! position. Script motion is planar, so controllers read it and write it
//! back unchanged; spawned entities inherit their parent's value.

use bevy_ecs::prelude::Component;

/// Depth of an entity, used as the `z` of its action position.
///
/// Higher values are drawn later (on top) by renderers that sort by it.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ZIndex(pub f32);
