//! # Guidance controller
//!
//! This module provides the guidance law, including its error calculations.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{Params, ReferencePath};
use crate::kin::{Position3D, Velocity3D};
use util::maths::clamp_sym;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The guidance controller.
///
/// The controller holds no state between calls, the command is a pure function
/// of the inputs to `compute_command`.
#[derive(Debug, Clone, Serialize)]
pub struct GuidanceController {
    params: Params,
}

/// Monitoring quantities from a single guidance step.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// The cross-track error to the guidance surface
    pub cross_track_error_m: f64,

    /// Rate of change of the cross-track error
    pub cross_track_rate_ms: f64,

    /// Commanded speed along the surface normal
    pub normal_output_ms: f64,

    /// Commanded speed along the path
    pub along_output_ms: f64,

    /// If true the normal correction was clamped
    pub saturated: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while computing a guidance command.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("The speed limit must be finite and non-negative, found {0}")]
    InvalidSpeedLimit(f64),

    #[error("The vehicle state is not finite (position: {0:?}, velocity: {1:?})")]
    NonFiniteState(Position3D, Velocity3D),

    #[error(
        "The normal correction ({normal_ms} m/s) exceeds the speed limit ({v_max_ms} m/s), no \
         speed remains for the along-path component"
    )]
    Saturation { normal_ms: f64, v_max_ms: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GuidanceController {
    /// Create a new controller from the parameters
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// The controller's parameters
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The clamp applied to the normal correction for the given speed limit.
    pub fn normal_limit(&self, v_max_ms: f64) -> f64 {
        self.params.normal_limit_ms.abs().min(v_max_ms)
    }

    /// Get the velocity command for the current state and path.
    ///
    /// Provided the speed limit is valid the magnitude of the returned command
    /// is equal to `v_max_ms`.
    pub fn compute_command(
        &self,
        position: &Position3D,
        velocity: &Velocity3D,
        path: &ReferencePath,
        v_max_ms: f64,
    ) -> Result<Velocity3D, GuidanceError> {
        let mut report = StatusReport::default();

        self.compute_command_with_report(position, velocity, path, v_max_ms, &mut report)
    }

    /// Get the velocity command, filling in the status report for this step.
    pub fn compute_command_with_report(
        &self,
        position: &Position3D,
        velocity: &Velocity3D,
        path: &ReferencePath,
        v_max_ms: f64,
        report: &mut StatusReport,
    ) -> Result<Velocity3D, GuidanceError> {
        if !v_max_ms.is_finite() || v_max_ms < 0.0 {
            return Err(GuidanceError::InvalidSpeedLimit(v_max_ms));
        }

        if !position.iter().chain(velocity.iter()).all(|v| v.is_finite()) {
            return Err(GuidanceError::NonFiniteState(*position, *velocity));
        }

        let normal = &path.surface().normal;

        // Cross-track error and its rate
        let error_m = path.cross_track_error(position);
        let error_rate_ms = velocity.dot(normal);
        report.cross_track_error_m = error_m;
        report.cross_track_rate_ms = error_rate_ms;

        // Normal correction, saturated so that it never uses more than the
        // speed budget
        let raw_normal_ms = self.params.k_e * error_m + self.params.k_e_dot * error_rate_ms;
        let normal_ms = clamp_sym(raw_normal_ms, self.normal_limit(v_max_ms));
        report.normal_output_ms = normal_ms;
        report.saturated = normal_ms != raw_normal_ms;

        // Spend the rest of the budget along the path
        let along_sq = v_max_ms.powi(2) - normal_ms.powi(2);
        if along_sq < 0.0 {
            return Err(GuidanceError::Saturation {
                normal_ms,
                v_max_ms,
            });
        }
        let along_ms = along_sq.sqrt();
        report.along_output_ms = along_ms;

        trace!(
            "Guidance: error {:.4} m, rate {:.4} m/s, normal {:.4} m/s, along {:.4} m/s",
            error_m,
            error_rate_ms,
            normal_ms,
            along_ms
        );

        Ok(along_ms * path.direction() + normal_ms * normal)
    }
}

impl Default for GuidanceController {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    fn test_path() -> ReferencePath {
        ReferencePath::new(Vector3::new(0.0, 30.0, 0.0), Vector3::new(50.0, 20.0, 0.0)).unwrap()
    }

    #[test]
    fn test_command_magnitude() {
        let ctrl = GuidanceController::default();
        let path = test_path();

        let positions = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 28.0, 0.0),
            Vector3::new(25.0, 25.5, 3.0),
            Vector3::new(-40.0, 100.0, -2.0),
        ];
        let velocities = [
            Vector3::zeros(),
            Vector3::new(1.0, -0.5, 0.0),
            Vector3::new(-2.0, 3.0, 1.0),
        ];

        for p in positions.iter() {
            for v in velocities.iter() {
                let mut report = StatusReport::default();
                let cmd = ctrl
                    .compute_command_with_report(p, v, &path, 5.0, &mut report)
                    .unwrap();
                assert!((cmd.norm() - 5.0).abs() < 1e-9);
                assert!(report.normal_output_ms.abs() <= 3.0);
            }
        }
    }

    #[test]
    fn test_on_path_moves_along_path() {
        let ctrl = GuidanceController::default();
        let path = test_path();

        let cmd = ctrl
            .compute_command(path.start(), &Vector3::zeros(), &path, 5.0)
            .unwrap();

        assert!((cmd - 5.0 * path.direction()).norm() < 1e-9);
    }

    #[test]
    fn test_saturation() {
        let ctrl = GuidanceController::default();
        let path = test_path();
        let mut report = StatusReport::default();

        // Far from the path the normal output is clamped to the fixed limit
        let cmd = ctrl
            .compute_command_with_report(&Vector3::zeros(), &Vector3::zeros(), &path, 5.0, &mut report)
            .unwrap();
        assert!(report.saturated);
        assert_eq!(report.normal_output_ms.abs(), 3.0);
        assert!((report.along_output_ms - 4.0).abs() < 1e-9);
        assert!((cmd.dot(&path.surface().normal).abs() - 3.0).abs() < 1e-9);

        // With a speed limit under the fixed limit the clamp follows the speed
        // limit and the whole budget goes into the correction
        let cmd = ctrl
            .compute_command_with_report(&Vector3::zeros(), &Vector3::zeros(), &path, 2.0, &mut report)
            .unwrap();
        assert_eq!(report.normal_output_ms.abs(), 2.0);
        assert_eq!(report.along_output_ms, 0.0);
        assert!((cmd.norm() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        let ctrl = GuidanceController::default();
        let path = test_path();

        assert!(matches!(
            ctrl.compute_command(&Vector3::zeros(), &Vector3::zeros(), &path, -1.0),
            Err(GuidanceError::InvalidSpeedLimit(_))
        ));
        assert!(matches!(
            ctrl.compute_command(&Vector3::zeros(), &Vector3::zeros(), &path, std::f64::NAN),
            Err(GuidanceError::InvalidSpeedLimit(_))
        ));
        assert!(matches!(
            ctrl.compute_command(
                &Vector3::new(std::f64::NAN, 0.0, 0.0),
                &Vector3::zeros(),
                &path,
                5.0
            ),
            Err(GuidanceError::NonFiniteState(_, _))
        ));
    }
}
