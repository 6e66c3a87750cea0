//! Aberred Actions library.
//!
//! Data-driven motion scripting for 2D entities: JSON scripts of timed steps
//! (move, accelerate, wait, follow a curve, spawn, switch animation, vanish)
//! interpreted per entity, plus the bevy_ecs components, resources, systems
//! and events that run them inside a world.

pub mod action;
pub mod components;
pub mod events;
pub mod generators;
pub mod resources;
pub mod systems;
