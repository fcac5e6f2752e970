//! # Motion planners
//!
//! A planner produces the velocity command for the next tick from the current
//! vehicle position.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

// Internal
use super::{Position3D, Velocity3D};
use crate::guidance::{GuidanceController, GuidanceError, ReferencePath, StatusReport};
use util::maths::{approx_eq, rem_euclid};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used when checking whether the vehicle sits on a sweep boundary.
const BOUNDARY_TOL_M: f64 = 1e-6;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of velocity commands.
pub trait Planner {
    /// Get the command to apply over the next tick.
    ///
    /// Planners which need randomness draw it from `rng` so that a whole
    /// simulation can be reproduced from a single seed.
    fn next_command(
        &mut self,
        position: &Position3D,
        rng: &mut dyn RngCore,
    ) -> Result<Velocity3D, PlannerError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Boustrophedon (lawn-mower) coverage of the square `[-W, W]²`.
///
/// Even rows (counted from `y = -W` in steps of `max_vel`) are swept in +X,
/// odd rows in -X. At the end of a row the vehicle steps up by `max_vel`. Once
/// the next row would leave the domain the planner commands zero velocity.
#[derive(Debug, Clone, Serialize)]
pub struct SweepPlanner {
    half_width_m: f64,
    max_vel_ms: f64,
}

/// Random walk at constant speed in a uniformly random 3D direction.
#[derive(Debug, Clone, Serialize)]
pub struct RandomWalkPlanner {
    max_vel_ms: f64,
}

/// Drives the vehicle along a reference path using the guidance controller.
///
/// The previous command is fed back to the controller as the vehicle velocity.
#[derive(Debug, Clone)]
pub struct GuidancePlanner {
    controller: GuidanceController,
    path: ReferencePath,
    v_max_ms: f64,
    last_command: Velocity3D,
    report: StatusReport,
}

/// The planners available to the survey simulation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannerKind {
    Sweep,
    RandomWalk,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while planning.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("The planner speed must be positive and finite, found {0}")]
    InvalidSpeed(f64),

    #[error("The sweep half width must be positive and finite, found {0}")]
    InvalidHalfWidth(f64),

    #[error("Guidance failed: {0}")]
    Guidance(#[from] GuidanceError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SweepPlanner {
    pub fn new(half_width_m: f64, max_vel_ms: f64) -> Result<Self, PlannerError> {
        if !max_vel_ms.is_finite() || max_vel_ms <= 0.0 {
            return Err(PlannerError::InvalidSpeed(max_vel_ms));
        }
        if !half_width_m.is_finite() || half_width_m <= 0.0 {
            return Err(PlannerError::InvalidHalfWidth(half_width_m));
        }

        Ok(Self {
            half_width_m,
            max_vel_ms,
        })
    }

    /// The row index parity of the given Y position, true for even rows.
    fn is_even_row(&self, y_m: f64) -> bool {
        let row = ((y_m + self.half_width_m) / self.max_vel_ms).round();

        rem_euclid(row, 2.0) < 0.5
    }
}

impl Planner for SweepPlanner {
    fn next_command(
        &mut self,
        position: &Position3D,
        _rng: &mut dyn RngCore,
    ) -> Result<Velocity3D, PlannerError> {
        let w = self.half_width_m;

        // Even rows end on the +X boundary, odd rows on the -X one
        let (boundary_m, sense) = if self.is_even_row(position.y) {
            (w, 1.0)
        } else {
            (-w, -1.0)
        };

        let at_boundary = approx_eq(position.x, boundary_m, BOUNDARY_TOL_M)
            || sense * (position.x - boundary_m) > 0.0;

        if at_boundary {
            if position.y + self.max_vel_ms > w + BOUNDARY_TOL_M {
                trace!("Sweep complete at {:?}", position.as_slice());
                Ok(Velocity3D::zeros())
            } else {
                Ok(Velocity3D::new(0.0, self.max_vel_ms, 0.0))
            }
        } else {
            // Shorten the final step of a row so it lands on the boundary
            let step_m = (boundary_m - position.x).abs().min(self.max_vel_ms);

            Ok(Velocity3D::new(sense * step_m, 0.0, 0.0))
        }
    }
}

impl RandomWalkPlanner {
    pub fn new(max_vel_ms: f64) -> Result<Self, PlannerError> {
        if !max_vel_ms.is_finite() || max_vel_ms <= 0.0 {
            return Err(PlannerError::InvalidSpeed(max_vel_ms));
        }

        Ok(Self { max_vel_ms })
    }
}

impl Planner for RandomWalkPlanner {
    fn next_command(
        &mut self,
        _position: &Position3D,
        rng: &mut dyn RngCore,
    ) -> Result<Velocity3D, PlannerError> {
        let draw = Velocity3D::new(
            StandardNormal.sample(&mut *rng),
            StandardNormal.sample(&mut *rng),
            StandardNormal.sample(&mut *rng),
        );

        Ok(match draw.try_normalize(0.0) {
            Some(dir) => self.max_vel_ms * dir,
            None => Velocity3D::zeros(),
        })
    }
}

impl GuidancePlanner {
    pub fn new(controller: GuidanceController, path: ReferencePath, v_max_ms: f64) -> Self {
        debug!(
            "Guidance planner created with speed limit {} m/s and normal limit {} m/s",
            v_max_ms,
            controller.normal_limit(v_max_ms)
        );

        Self {
            controller,
            path,
            v_max_ms,
            last_command: Velocity3D::zeros(),
            report: StatusReport::default(),
        }
    }

    pub fn path(&self) -> &ReferencePath {
        &self.path
    }

    /// The status report of the most recent command.
    pub fn report(&self) -> &StatusReport {
        &self.report
    }
}

impl Planner for GuidancePlanner {
    fn next_command(
        &mut self,
        position: &Position3D,
        _rng: &mut dyn RngCore,
    ) -> Result<Velocity3D, PlannerError> {
        let cmd = self.controller.compute_command_with_report(
            position,
            &self.last_command,
            &self.path,
            self.v_max_ms,
            &mut self.report,
        )?;

        self.last_command = cmd;

        Ok(cmd)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kin::Vehicle;
    use nalgebra::Vector3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sweep_covers_domain() -> Result<(), PlannerError> {
        let mut planner = SweepPlanner::new(160.0, 40.0)?;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut vehicle = Vehicle::new(Vector3::new(-160.0, -160.0, 50.0));

        // Nine rows of eight steps, with eight steps between rows
        for _ in 0..80 {
            let cmd = planner.next_command(vehicle.position(), &mut rng)?;
            assert!((cmd.norm() - 40.0).abs() < 1e-9);
            vehicle.step(cmd);
        }
        assert_eq!(*vehicle.position(), Vector3::new(160.0, 160.0, 50.0));

        // Sweep is then complete
        assert_eq!(planner.next_command(vehicle.position(), &mut rng)?, Vector3::zeros());

        // Every position stayed inside the domain and every row was visited
        for p in vehicle.trajectory().points() {
            assert!(p.x.abs() <= 160.0 && p.y.abs() <= 160.0);
        }
        for row in 0..9 {
            let y = -160.0 + 40.0 * row as f64;
            assert!(vehicle.trajectory().points().iter().any(|p| p.y == y && p.x == -160.0));
            assert!(vehicle.trajectory().points().iter().any(|p| p.y == y && p.x == 160.0));
        }

        Ok(())
    }

    #[test]
    fn test_sweep_row_direction() -> Result<(), PlannerError> {
        let mut planner = SweepPlanner::new(160.0, 40.0)?;
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        // Even row, mid sweep
        assert_eq!(
            planner.next_command(&Vector3::new(0.0, -160.0, 50.0), &mut rng)?,
            Vector3::new(40.0, 0.0, 0.0)
        );
        // Even row, at the end
        assert_eq!(
            planner.next_command(&Vector3::new(160.0, -160.0, 50.0), &mut rng)?,
            Vector3::new(0.0, 40.0, 0.0)
        );
        // Odd row, mid sweep
        assert_eq!(
            planner.next_command(&Vector3::new(160.0, -120.0, 50.0), &mut rng)?,
            Vector3::new(-40.0, 0.0, 0.0)
        );
        // Odd row, at the end
        assert_eq!(
            planner.next_command(&Vector3::new(-160.0, -120.0, 50.0), &mut rng)?,
            Vector3::new(0.0, 40.0, 0.0)
        );

        Ok(())
    }

    #[test]
    fn test_sweep_short_final_step() -> Result<(), PlannerError> {
        // 2W is not a multiple of the speed
        let mut planner = SweepPlanner::new(100.0, 30.0)?;
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let cmd = planner.next_command(&Vector3::new(90.0, -100.0, 10.0), &mut rng)?;
        assert!((cmd - Vector3::new(10.0, 0.0, 0.0)).norm() < 1e-9);

        assert!(SweepPlanner::new(100.0, 0.0).is_err());
        assert!(SweepPlanner::new(-1.0, 10.0).is_err());

        Ok(())
    }

    #[test]
    fn test_random_walk_speed() -> Result<(), PlannerError> {
        let mut planner = RandomWalkPlanner::new(40.0)?;
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let origin = Vector3::zeros();

        let first = planner.next_command(&origin, &mut rng)?;
        for _ in 0..50 {
            let cmd = planner.next_command(&origin, &mut rng)?;
            assert!((cmd.norm() - 40.0).abs() < 1e-9);
        }

        // Reproducible from the seed
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(planner.next_command(&origin, &mut rng)?, first);

        Ok(())
    }

    #[test]
    fn test_guidance_planner_feeds_back_velocity() -> Result<(), PlannerError> {
        let path = ReferencePath::new(Vector3::new(0.0, 30.0, 0.0), Vector3::new(50.0, 20.0, 0.0))
            .unwrap();
        let mut planner = GuidancePlanner::new(GuidanceController::default(), path, 5.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let first = planner.next_command(&Vector3::zeros(), &mut rng)?;
        assert_eq!(planner.report().cross_track_rate_ms, 0.0);

        let position = first;
        planner.next_command(&position, &mut rng)?;
        let expected_rate = first.dot(&planner.path().surface().normal);
        assert!((planner.report().cross_track_rate_ms - expected_rate).abs() < 1e-12);

        Ok(())
    }
}
