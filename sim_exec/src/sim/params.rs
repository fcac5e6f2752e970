//! Simulation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::beacon::SensorParams;
use crate::estimator::EstimatorKind;
use crate::guidance;
use crate::kin::{PlannerKind, Position3D};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the beacon survey simulation
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SurveyParams {
    /// Number of beacons to place
    pub num_beacons: usize,

    /// Number of ticks to simulate
    pub num_ticks: usize,

    /// Half width of the square domain
    pub domain_half_width_m: f64,

    /// Minimum distance between any two beacons
    pub min_separation_m: f64,

    /// Maximum number of candidates drawn while placing beacons
    pub max_placement_attempts: usize,

    /// Seed for beacon placement, sensor noise and random motion
    pub seed: u64,

    /// Initial position of the vehicle
    pub start_m: Position3D,

    /// Vehicle speed
    pub max_vel_ms: f64,

    /// How the vehicle moves
    pub planner: PlannerKind,

    /// How observations are turned into estimates
    pub estimator: EstimatorKind,

    /// An estimate within this distance of the truth counts as found
    pub found_threshold_m: f64,

    /// Sensor model parameters
    pub sensor: SensorParams,
}

/// Parameters for the line follow simulation
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LineFollowParams {
    /// First waypoint of the reference path
    pub p1_m: Position3D,

    /// Second waypoint of the reference path
    pub p2_m: Position3D,

    /// Initial position of the vehicle
    pub start_m: Position3D,

    /// Commanded speed
    pub v_max_ms: f64,

    /// Number of ticks to simulate
    pub num_ticks: usize,

    /// The limit on cross-track error. Above this limit the run is stopped.
    pub cross_track_limit_m: Option<f64>,

    /// Guidance controller parameters
    pub guidance: guidance::Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SurveyParams {
    fn default() -> Self {
        Self {
            num_beacons: 10,
            num_ticks: 80,
            domain_half_width_m: 160.0,
            min_separation_m: 50.0,
            max_placement_attempts: 100_000,
            seed: 0,
            start_m: Position3D::new(-160.0, -160.0, 50.0),
            max_vel_ms: 40.0,
            planner: PlannerKind::Sweep,
            estimator: EstimatorKind::Kalman,
            found_threshold_m: 1.0,
            sensor: SensorParams::default(),
        }
    }
}

impl Default for LineFollowParams {
    fn default() -> Self {
        Self {
            p1_m: Position3D::new(0.0, 30.0, 0.0),
            p2_m: Position3D::new(50.0, 20.0, 0.0),
            start_m: Position3D::zeros(),
            v_max_ms: 5.0,
            num_ticks: 100,
            cross_track_limit_m: None,
            guidance: guidance::Params::default(),
        }
    }
}
