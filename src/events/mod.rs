//! Event types and observers.
//!
//! Submodules:
//! - [`spawn`] – spawn requests sent by generators through the spawn bridge
//! - [`vanish`] – notification that a script vanished its entity, with a
//!   despawning observer
pub mod spawn;
pub mod vanish;
