//! # Estimator module
//!
//! Fuses the noisy observations of each beacon into a running position
//! estimate. Beacons do not move, so the process model is the identity with no
//! process noise and only measurement updates take place.
//!
//! Each beacon's estimator starts `Uninitialized`. The first observation is
//! adopted directly as the estimate, after which the estimator is `Tracking`
//! and every further observation is fused with a Kalman update. Estimates are
//! never reset. A beacon that was never observed has no estimate at all.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod kalman;
pub mod table;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use kalman::*;
pub use table::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The method used to turn a beacon's observation history into an estimate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorKind {
    /// Recursive Kalman fusion, weighting each observation by its covariance
    Kalman,

    /// Arithmetic mean of all observed positions
    Mean,
}
