//! # Beacon survey simulation
//!
//! Each tick the vehicle first moves according to its planner, then every
//! beacon (in index order) broadcasts to the vehicle's new pose. Observations
//! are stored in arrival order and fused into estimates once motion has
//! finished, after which the estimates are scored against the ground truth.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use nalgebra::Vector2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

// Internal
use super::{evaluate, SimError, SurveyParams, SurveyReport};
use crate::beacon::{BeaconField, BeaconSensorModel};
use crate::estimator::{EstimateTable, ObservationLog};
use crate::kin::{Planner, PlannerKind, RandomWalkPlanner, SweepPlanner, Trajectory, Vehicle};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The beacon survey simulation.
pub struct SurveySim {
    params: SurveyParams,

    /// Single source of randomness for the whole run
    rng: ChaCha8Rng,

    field: BeaconField,
    sensor: BeaconSensorModel,
    planner: Box<dyn Planner>,
    vehicle: Vehicle,

    /// Every observation received so far
    log: ObservationLog,

    /// Number of ticks simulated so far
    tick: usize,
}

/// Everything produced by a survey run.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyOutcome {
    pub params: SurveyParams,

    /// Ground truth beacon positions
    pub field: BeaconField,

    /// Vehicle trajectory, including the start position
    pub trajectory: Trajectory,

    /// Final estimate of every observed beacon
    pub estimates: EstimateTable,

    /// Verdict of every beacon
    pub report: SurveyReport,

    /// Total number of observations received
    pub num_observations: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SurveySim {
    /// Set up a new survey, placing the beacons and the vehicle.
    pub fn new(params: SurveyParams) -> Result<Self, SimError> {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

        let field = BeaconField::generate(
            params.num_beacons,
            params.domain_half_width_m,
            params.min_separation_m,
            params.max_placement_attempts,
            &mut rng,
        )?;

        let sensor = BeaconSensorModel::new(params.sensor.clone())?;

        let planner: Box<dyn Planner> = match params.planner {
            PlannerKind::Sweep => Box::new(SweepPlanner::new(
                params.domain_half_width_m,
                params.max_vel_ms,
            )?),
            PlannerKind::RandomWalk => Box::new(RandomWalkPlanner::new(params.max_vel_ms)?),
        };

        let vehicle = Vehicle::new(params.start_m);

        info!(
            "Survey initialised: {} beacons, {} ticks, {:?} planner, {:?} estimator, seed {}",
            field.len(),
            params.num_ticks,
            params.planner,
            params.estimator,
            params.seed
        );

        Ok(Self {
            params,
            rng,
            field,
            sensor,
            planner,
            vehicle,
            log: ObservationLog::new(),
            tick: 0,
        })
    }

    /// Simulate a single tick: move the vehicle, then collect broadcasts.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.tick += 1;

        let cmd = self
            .planner
            .next_command(self.vehicle.position(), &mut self.rng)?;
        self.vehicle.step(cmd);

        let position = *self.vehicle.position();
        let planar_m = Vector2::new(position.x, position.y);

        for beacon in self.field.beacons() {
            if let Some(obs) =
                self.sensor
                    .sense(beacon, &planar_m, position.z, self.tick, &mut self.rng)
            {
                trace!("Tick {}: heard beacon {}", self.tick, obs.beacon_index);
                self.log.push(obs);
            }
        }

        trace!("Tick {}: vehicle at {:?}", self.tick, position.as_slice());

        Ok(())
    }

    /// Run the remaining ticks, estimate the beacons and score the result.
    pub fn run(mut self) -> Result<SurveyOutcome, SimError> {
        while self.tick < self.params.num_ticks {
            self.step()?;
        }

        let estimates = EstimateTable::from_log(&self.log, self.params.estimator)?;
        let report = evaluate(&self.field, &estimates, self.params.found_threshold_m);

        info!(
            "Survey complete after {} ticks: {} observations of {} beacons, {} found",
            self.tick,
            self.log.num_observations(),
            self.log.num_beacons(),
            report.num_found()
        );

        Ok(SurveyOutcome {
            num_observations: self.log.num_observations(),
            params: self.params,
            field: self.field,
            trajectory: self.vehicle.into_trajectory(),
            estimates,
            report,
        })
    }

    pub fn field(&self) -> &BeaconField {
        &self.field
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn log(&self) -> &ObservationLog {
        &self.log
    }

    pub fn tick(&self) -> usize {
        self.tick
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::beacon::{FieldError, SensorParams};
    use crate::estimator::EstimatorKind;
    use crate::sim::BeaconOutcome;

    #[test]
    fn test_reference_survey() -> Result<(), SimError> {
        let outcome = SurveySim::new(SurveyParams::default())?.run()?;

        // One entry per tick plus the start
        assert_eq!(outcome.trajectory.len(), 81);
        assert_eq!(outcome.field.len(), 10);
        assert_eq!(outcome.report.verdicts.len(), 10);

        // The sweep passes within sensing range of every point in the domain
        assert_eq!(outcome.estimates.len(), 10);
        assert_eq!(outcome.report.num_not_observed(), 0);

        // Every estimate is within a few noise deviations of the truth
        for verdict in outcome.report.verdicts.iter() {
            let est = verdict.estimate_m.unwrap();
            assert!((est - verdict.truth_m).norm() < 15.0);
        }

        // Success is consistent with the verdicts
        assert_eq!(outcome.report.success, outcome.report.num_found() > 0);

        Ok(())
    }

    #[test]
    fn test_reproducible() -> Result<(), SimError> {
        let params = SurveyParams {
            seed: 99,
            ..Default::default()
        };

        let a = SurveySim::new(params.clone())?.run()?;
        let b = SurveySim::new(params)?.run()?;

        assert_eq!(a.field.beacons(), b.field.beacons());
        assert_eq!(a.num_observations, b.num_observations);
        for (i, est) in a.estimates.iter() {
            assert_eq!(b.estimates.get(i), Some(est));
        }

        Ok(())
    }

    #[test]
    fn test_precise_sensor_finds_all() -> Result<(), SimError> {
        let params = SurveyParams {
            seed: 5,
            sensor: SensorParams {
                sigma_base_m: 0.01,
                sigma_alt_gain: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let outcome = SurveySim::new(params)?.run()?;

        assert!(outcome.report.success);
        assert_eq!(outcome.report.num_found(), 10);

        Ok(())
    }

    #[test]
    fn test_out_of_range_vehicle_observes_nothing() -> Result<(), SimError> {
        // A vehicle that never moves far outside the domain hears nothing
        let params = SurveyParams {
            start_m: crate::kin::Position3D::new(5_000.0, 5_000.0, 50.0),
            ..Default::default()
        };

        let outcome = SurveySim::new(params)?.run()?;

        assert!(outcome.estimates.is_empty());
        assert!(!outcome.report.success);
        assert!(outcome
            .report
            .verdicts
            .iter()
            .all(|v| v.outcome == BeaconOutcome::NotObserved));

        Ok(())
    }

    #[test]
    fn test_random_walk_mean_estimator() -> Result<(), SimError> {
        let params = SurveyParams {
            planner: PlannerKind::RandomWalk,
            estimator: EstimatorKind::Mean,
            start_m: crate::kin::Position3D::new(0.0, 0.0, 50.0),
            num_ticks: 40,
            ..Default::default()
        };

        let outcome = SurveySim::new(params)?.run()?;
        let points = outcome.trajectory.points();

        assert_eq!(points.len(), 41);
        for pair in points.windows(2) {
            assert!(((pair[1] - pair[0]).norm() - 40.0).abs() < 1e-9);
        }

        Ok(())
    }

    #[test]
    fn test_capacity_exceeded() {
        let params = SurveyParams {
            num_beacons: 50,
            min_separation_m: 100.0,
            max_placement_attempts: 10_000,
            ..Default::default()
        };

        assert!(matches!(
            SurveySim::new(params),
            Err(SimError::Field(FieldError::CapacityExceeded { .. }))
        ));
    }

    #[test]
    fn test_step_orders_observations_by_tick() -> Result<(), SimError> {
        let mut sim = SurveySim::new(SurveyParams::default())?;
        for _ in 0..20 {
            sim.step()?;
        }

        assert_eq!(sim.tick(), 20);
        assert_eq!(sim.vehicle().trajectory().len(), 21);
        for (_, history) in sim.log().iter() {
            assert!(history
                .windows(2)
                .all(|w| w[0].arrival_order < w[1].arrival_order));
        }

        Ok(())
    }
}
