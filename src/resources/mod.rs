//! ECS resources made available to systems.
//!
//! Overview
//! - `actionconfig` – INI-backed runner and curve settings
//! - `scriptstore` – loaded scripts shared by name, plus the process-wide store
//! - `spawnbridge` – channel carrying generator spawn requests into the world
//! - `worldtime` – simulation time and delta
pub mod actionconfig;
pub mod scriptstore;
pub mod spawnbridge;
pub mod worldtime;
