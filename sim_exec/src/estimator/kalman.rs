//! # Static target Kalman update

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix2, Vector2};
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position estimate of a single beacon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BeaconEstimate {
    /// Estimated position
    pub mean_m: Vector2<f64>,

    /// Covariance of the estimate
    pub covariance: Matrix2<f64>,

    /// Number of observations fused into the estimate
    pub num_observations: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of a single beacon's estimator.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum EstimatorState {
    Uninitialized,
    Tracking(BeaconEstimate),
}

/// Errors which can occur during an estimator update.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    #[error("The innovation covariance {0:?} cannot be inverted")]
    SingularInnovation(Matrix2<f64>),

    #[error("Cannot estimate from an empty observation history")]
    NoObservations,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BeaconEstimate {
    /// Trace of the covariance, used as a scalar measure of uncertainty.
    pub fn trace(&self) -> f64 {
        self.covariance.trace()
    }
}

impl EstimatorState {
    /// Fuse an observation into the state, returning the new state.
    ///
    /// From `Uninitialized` the observation becomes the estimate. From
    /// `Tracking` the gain is `K = P (R + P)^-1`, the mean moves by
    /// `K (y - x)` and the covariance becomes `P - K P`.
    pub fn update(
        self,
        obs_mean_m: &Vector2<f64>,
        obs_covariance: &Matrix2<f64>,
    ) -> Result<Self, EstimatorError> {
        match self {
            EstimatorState::Uninitialized => Ok(EstimatorState::Tracking(BeaconEstimate {
                mean_m: *obs_mean_m,
                covariance: *obs_covariance,
                num_observations: 1,
            })),
            EstimatorState::Tracking(est) => {
                let innovation_cov = obs_covariance + est.covariance;
                let innovation_cov_inv = innovation_cov
                    .try_inverse()
                    .ok_or(EstimatorError::SingularInnovation(innovation_cov))?;

                let gain = est.covariance * innovation_cov_inv;

                Ok(EstimatorState::Tracking(BeaconEstimate {
                    mean_m: est.mean_m + gain * (obs_mean_m - est.mean_m),
                    covariance: est.covariance - gain * est.covariance,
                    num_observations: est.num_observations + 1,
                }))
            }
        }
    }

    /// The current estimate, if tracking.
    pub fn estimate(&self) -> Option<&BeaconEstimate> {
        match self {
            EstimatorState::Uninitialized => None,
            EstimatorState::Tracking(est) => Some(est),
        }
    }
}

impl Default for EstimatorState {
    fn default() -> Self {
        EstimatorState::Uninitialized
    }
}

impl From<Option<BeaconEstimate>> for EstimatorState {
    fn from(est: Option<BeaconEstimate>) -> Self {
        match est {
            Some(e) => EstimatorState::Tracking(e),
            None => EstimatorState::Uninitialized,
        }
    }
}
