//! # Line follow simulation
//!
//! Drives the vehicle onto a straight reference path with the guidance
//! controller, recording the cross-track error after every tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

// Internal
use super::{LineFollowParams, SimError};
use crate::guidance::{GuidanceController, ReferencePath, StatusReport};
use crate::kin::{GuidancePlanner, Planner, Trajectory, Vehicle};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The line follow simulation.
pub struct LineFollowSim {
    params: LineFollowParams,

    planner: GuidancePlanner,
    vehicle: Vehicle,

    /// Guidance draws no randomness, but the planner interface requires a
    /// source
    rng: ChaCha8Rng,

    /// Cross-track error of every trajectory point, including the start
    cross_track_m: Vec<f64>,

    /// Guidance status report of every tick
    reports: Vec<StatusReport>,

    tick: usize,
    aborted: bool,
}

/// Everything produced by a line follow run.
#[derive(Debug, Clone, Serialize)]
pub struct LineFollowOutcome {
    pub params: LineFollowParams,
    pub path: ReferencePath,
    pub trajectory: Trajectory,
    pub cross_track_m: Vec<f64>,
    pub reports: Vec<StatusReport>,

    /// True if the run was stopped for exceeding the cross-track limit
    pub aborted: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LineFollowSim {
    pub fn new(params: LineFollowParams) -> Result<Self, SimError> {
        let path = ReferencePath::new(params.p1_m, params.p2_m)?;
        let vehicle = Vehicle::new(params.start_m);
        let initial_error_m = path.cross_track_error(vehicle.position());

        let planner = GuidancePlanner::new(
            GuidanceController::new(params.guidance.clone()),
            path,
            params.v_max_ms,
        );

        info!(
            "Line follow initialised, initial cross-track error {:.3} m",
            initial_error_m
        );

        Ok(Self {
            params,
            planner,
            vehicle,
            rng: ChaCha8Rng::seed_from_u64(0),
            cross_track_m: vec![initial_error_m],
            reports: Vec::new(),
            tick: 0,
            aborted: false,
        })
    }

    /// Simulate a single tick.
    ///
    /// If a cross-track limit is set and the new error exceeds it the
    /// simulation is marked as aborted.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.tick += 1;

        let cmd = self
            .planner
            .next_command(self.vehicle.position(), &mut self.rng)?;
        self.vehicle.step(cmd);
        self.reports.push(*self.planner.report());

        let error_m = self.planner.path().cross_track_error(self.vehicle.position());
        self.cross_track_m.push(error_m);

        trace!(
            "Tick {}: position {:?}, cross-track error {:.6} m",
            self.tick,
            self.vehicle.position().as_slice(),
            error_m
        );

        if let Some(limit_m) = self.params.cross_track_limit_m {
            if error_m.abs() > limit_m {
                warn!(
                    "Cross-track error {:.3} m exceeds the limit of {:.3} m, stopping",
                    error_m, limit_m
                );
                self.aborted = true;
            }
        }

        Ok(())
    }

    /// Run until all ticks are complete or the cross-track limit is exceeded.
    pub fn run(mut self) -> Result<LineFollowOutcome, SimError> {
        while self.tick < self.params.num_ticks && !self.aborted {
            self.step()?;
        }

        let final_m = self.cross_track_m.last().copied().unwrap_or(0.0);
        info!(
            "Line follow complete after {} ticks, final cross-track error {:.3e} m",
            self.tick, final_m
        );

        Ok(LineFollowOutcome {
            path: *self.planner.path(),
            params: self.params,
            trajectory: self.vehicle.into_trajectory(),
            cross_track_m: self.cross_track_m,
            reports: self.reports,
            aborted: self.aborted,
        })
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kin::Position3D;

    #[test]
    fn test_converges_onto_path() -> Result<(), SimError> {
        let outcome = LineFollowSim::new(LineFollowParams::default())?.run()?;

        assert!(!outcome.aborted);
        assert_eq!(outcome.trajectory.len(), 101);
        assert_eq!(outcome.cross_track_m.len(), 101);
        assert_eq!(outcome.reports.len(), 100);

        // Start is about 29.42 m from the line
        let start = outcome.trajectory.first().unwrap();
        let end = outcome.trajectory.last().unwrap();
        assert!((outcome.path.distance_to_line(start) - 29.4174).abs() < 1e-3);
        assert!(outcome.path.distance_to_line(end) < 1e-3);

        // Error shrinks substantially early on
        assert!(outcome.cross_track_m[20].abs() < outcome.cross_track_m[0].abs() / 2.0);

        // Early ticks are saturated, late ticks are not
        assert!(outcome.reports[0].saturated);
        assert!(!outcome.reports[99].saturated);

        Ok(())
    }

    #[test]
    fn test_speed_is_constant() -> Result<(), SimError> {
        let outcome = LineFollowSim::new(LineFollowParams::default())?.run()?;

        for pair in outcome.trajectory.points().windows(2) {
            assert!(((pair[1] - pair[0]).norm() - 5.0).abs() < 1e-9);
        }

        // Progress is made along the path
        let start = outcome.trajectory.first().unwrap();
        let end = outcome.trajectory.last().unwrap();
        assert!((end - start).dot(outcome.path.direction()) > 0.0);

        Ok(())
    }

    #[test]
    fn test_cross_track_limit_aborts() -> Result<(), SimError> {
        let params = LineFollowParams {
            cross_track_limit_m: Some(10.0),
            ..Default::default()
        };

        let outcome = LineFollowSim::new(params)?.run()?;

        // The normal correction is limited to 3 m per tick, so the first tick
        // is still outside the limit
        assert!(outcome.aborted);
        assert_eq!(outcome.trajectory.len(), 2);

        Ok(())
    }

    #[test]
    fn test_degenerate_path() {
        let params = LineFollowParams {
            p1_m: Position3D::new(1.0, 1.0, 1.0),
            p2_m: Position3D::new(1.0, 1.0, 1.0),
            ..Default::default()
        };

        assert!(matches!(LineFollowSim::new(params), Err(SimError::Path(_))));
    }
}
