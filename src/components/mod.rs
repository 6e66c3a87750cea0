//! ECS components for scripted entities.
//!
//! The [`ActionController`](crate::action::controller::ActionController) is a
//! component too; the types here are the entity state it reads and writes.
//!
//! Submodules overview:
//! - [`animation`] – selected animation sequence and playback progress
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rotation`] – rotation angle in degrees
//! - [`ttl`] – countdown after which the entity is despawned
//! - [`vanished`] – marker for entities whose script reached `Delete`
//! - [`zindex`] – depth, the third coordinate of an action position

pub mod animation;
pub mod mapposition;
pub mod rotation;
pub mod ttl;
pub mod vanished;
pub mod zindex;
