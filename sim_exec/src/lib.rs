//! # Simulation library.
//!
//! This library holds the guidance and beacon survey core used by the
//! simulation executables, and allows other crates in the workspace to access
//! it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Beacon module - ground truth beacon placement and the range limited sensor model
pub mod beacon;

/// Estimator module - fuses noisy beacon observations into per-beacon position estimates
pub mod estimator;

/// Guidance module - keeps the vehicle on a straight reference path
pub mod guidance;

/// Kinematics module - point mass integration and motion planners
pub mod kin;

/// Simulation module - survey and line follow scenarios and their evaluation
pub mod sim;
