//! # Beacon sensor model
//!
//! Range limited, altitude dependent sensing of beacon broadcasts. The model
//! has no memory between ticks.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix2, Vector2};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;

// Internal
use super::{Beacon, SensorParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A noisy observation of a beacon's position.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BeaconObservation {
    /// Index of the observed beacon
    pub beacon_index: usize,

    /// True position perturbed by the sensor noise
    pub noisy_position_m: Vector2<f64>,

    /// Declared covariance of the noise
    pub noise_covariance: Matrix2<f64>,

    /// The tick on which the observation was made
    pub arrival_order: usize,
}

/// The beacon sensor.
#[derive(Debug, Clone, Serialize)]
pub struct BeaconSensorModel {
    params: SensorParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the sensor model configuration.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Sensor noise parameters must give a positive standard deviation (base: {0}, gain: {1})")]
    InvalidNoise(f64, f64),

    #[error("Sensing diameter parameters must be finite and non-negative (gain: {0}, offset: {1})")]
    InvalidRange(f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BeaconSensorModel {
    /// Create a new sensor model, validating the parameters.
    pub fn new(params: SensorParams) -> Result<Self, SensorError> {
        let noise_ok = params.sigma_base_m.is_finite()
            && params.sigma_base_m > 0.0
            && params.sigma_alt_gain.is_finite()
            && params.sigma_alt_gain >= 0.0;
        if !noise_ok {
            return Err(SensorError::InvalidNoise(
                params.sigma_base_m,
                params.sigma_alt_gain,
            ));
        }

        let range_ok = params.diameter_gain.is_finite()
            && params.diameter_gain >= 0.0
            && params.diameter_offset_m.is_finite()
            && params.diameter_offset_m >= 0.0;
        if !range_ok {
            return Err(SensorError::InvalidRange(
                params.diameter_gain,
                params.diameter_offset_m,
            ));
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &SensorParams {
        &self.params
    }

    /// Diameter of the sensing disc at the given altitude.
    ///
    /// Altitudes below ground are treated as ground level.
    pub fn sensing_diameter_m(&self, altitude_m: f64) -> f64 {
        altitude_m.max(0.0) * self.params.diameter_gain + self.params.diameter_offset_m
    }

    /// Standard deviation of the noise on each axis at the given altitude.
    pub fn noise_sigma_m(&self, altitude_m: f64) -> f64 {
        self.params.sigma_base_m + altitude_m.max(0.0) * self.params.sigma_alt_gain
    }

    /// True if a beacon at `beacon_m` can be heard from the vehicle position.
    pub fn in_range(&self, beacon_m: &Vector2<f64>, vehicle_m: &Vector2<f64>, altitude_m: f64) -> bool {
        (beacon_m - vehicle_m).norm() <= self.sensing_diameter_m(altitude_m) / 2.0
    }

    /// Sense a beacon from the given planar vehicle position and altitude.
    ///
    /// Returns `None` if the beacon is out of range this tick.
    pub fn sense<R: Rng + ?Sized>(
        &self,
        beacon: &Beacon,
        vehicle_m: &Vector2<f64>,
        altitude_m: f64,
        arrival_order: usize,
        rng: &mut R,
    ) -> Option<BeaconObservation> {
        if !self.in_range(&beacon.position_m, vehicle_m, altitude_m) {
            return None;
        }

        let sigma_m = self.noise_sigma_m(altitude_m);
        let noise: Vector2<f64> = Vector2::new(
            StandardNormal.sample(&mut *rng),
            StandardNormal.sample(&mut *rng),
        );

        Some(BeaconObservation {
            beacon_index: beacon.index,
            noisy_position_m: beacon.position_m + sigma_m * noise,
            noise_covariance: Matrix2::identity() * sigma_m.powi(2),
            arrival_order,
        })
    }
}
