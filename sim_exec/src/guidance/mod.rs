//! # Guidance module
//!
//! Guidance is responsible for keeping the vehicle on a straight reference
//! path in 3-space while flying at a fixed speed.
//!
//! The path is defined by two waypoints. From these a guidance surface is
//! derived, which is a plane containing the path. The cross-track error is the
//! signed distance from the vehicle to this surface. The controller computes a
//! correction along the surface normal from the cross-track error and its rate
//! of change, saturates it, and then spends the remaining speed budget moving
//! along the path, so that the magnitude of every command equals the speed
//! limit.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod params;
pub mod path;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use params::Params;
pub use path::*;
