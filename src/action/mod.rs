//! Motion scripting core.
//!
//! Everything here is independent of the ECS: scripts are plain data, curves
//! are pure functions, and the controller talks to its entity through the
//! [`controller::ActionTarget`] trait.
//!
//! Submodules overview:
//! - [`curve`] – B-spline sampling, collinear reduction and time-indexed path tables
//! - [`script`] – immutable script sets, sequences and typed steps
//! - [`loader`] – JSON script files with per-list partial failure
//! - [`controller`] – the per-entity step interpreter and generator hook

pub mod controller;
pub mod curve;
pub mod loader;
pub mod script;
