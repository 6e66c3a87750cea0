//! Action systems.
//!
//! Submodules overview
//! - [`action`] – advance every action controller and report vanished entities
//! - [`spawn`] – turn generator spawn requests into entities
//! - [`time`] – update simulation time and delta
//! - [`ttl`] – despawn entities whose time-to-live ran out

pub mod action;
pub mod spawn;
pub mod time;
pub mod ttl;
