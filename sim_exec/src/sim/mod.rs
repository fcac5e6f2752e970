//! # Simulation module
//!
//! Two scenarios are provided. The survey sweeps a vehicle over a randomly
//! generated beacon field, estimates every beacon it hears, and scores the
//! estimates against the truth. The line follow scenario drives the vehicle
//! onto a straight reference path with the guidance controller.
//!
//! Both scenarios are deterministic given their parameters.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod eval;
pub mod line_follow;
pub mod params;
pub mod survey;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use eval::*;
pub use line_follow::*;
pub use params::*;
pub use survey::*;

use crate::beacon::{FieldError, SensorError};
use crate::estimator::EstimatorError;
use crate::guidance::PathError;
use crate::kin::PlannerError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Could not generate the beacon field: {0}")]
    Field(#[from] FieldError),

    #[error("Invalid sensor model: {0}")]
    Sensor(#[from] SensorError),

    #[error("Invalid reference path: {0}")]
    Path(#[from] PathError),

    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    #[error("Estimator error: {0}")]
    Estimator(#[from] EstimatorError),
}
