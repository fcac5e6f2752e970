//! # Observation and estimate tables
//!
//! Both tables are keyed by beacon index and owned by the simulation loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::{Matrix2, Vector2};
use serde::Serialize;
use std::collections::BTreeMap;

// Internal
use super::{BeaconEstimate, EstimatorError, EstimatorKind, EstimatorState};
use crate::beacon::BeaconObservation;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Every observation received, grouped by beacon in arrival order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObservationLog {
    history: BTreeMap<usize, Vec<BeaconObservation>>,
}

/// The current estimate of every beacon observed at least once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EstimateTable {
    estimates: BTreeMap<usize, BeaconEstimate>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ObservationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation to its beacon's history.
    pub fn push(&mut self, obs: BeaconObservation) {
        self.history.entry(obs.beacon_index).or_default().push(obs);
    }

    /// The history of a single beacon, or `None` if it was never observed.
    pub fn get(&self, beacon_index: usize) -> Option<&[BeaconObservation]> {
        self.history.get(&beacon_index).map(|h| h.as_slice())
    }

    /// Iterate over the beacons and their histories in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[BeaconObservation])> {
        self.history.iter().map(|(i, h)| (*i, h.as_slice()))
    }

    /// Number of beacons with at least one observation.
    pub fn num_beacons(&self) -> usize {
        self.history.len()
    }

    /// Total number of observations across all beacons.
    pub fn num_observations(&self) -> usize {
        self.history.values().map(|h| h.len()).sum()
    }
}

impl EstimateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the estimates for every beacon in the log with the given method.
    pub fn from_log(log: &ObservationLog, kind: EstimatorKind) -> Result<Self, EstimatorError> {
        let mut table = Self::new();

        for (index, history) in log.iter() {
            match kind {
                EstimatorKind::Kalman => {
                    for obs in history {
                        table.apply(obs)?;
                    }
                }
                EstimatorKind::Mean => {
                    table.estimates.insert(index, batch_mean(history)?);
                }
            }

            if let Some(est) = table.get(index) {
                debug!(
                    "Beacon {} estimated at {:?} from {} observations (trace {:.4})",
                    index,
                    est.mean_m.as_slice(),
                    est.num_observations,
                    est.trace()
                );
            }
        }

        Ok(table)
    }

    /// Fuse a single observation into the matching beacon's estimate.
    pub fn apply(&mut self, obs: &BeaconObservation) -> Result<(), EstimatorError> {
        let state: EstimatorState = self.estimates.get(&obs.beacon_index).copied().into();

        if let EstimatorState::Tracking(est) =
            state.update(&obs.noisy_position_m, &obs.noise_covariance)?
        {
            trace!(
                "Beacon {} updated on tick {}, trace {:.4}",
                obs.beacon_index,
                obs.arrival_order,
                est.trace()
            );
            self.estimates.insert(obs.beacon_index, est);
        }

        Ok(())
    }

    /// The estimate for a beacon, or `None` if it was never observed.
    pub fn get(&self, beacon_index: usize) -> Option<&BeaconEstimate> {
        self.estimates.get(&beacon_index)
    }

    /// Iterate over the estimates in beacon index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BeaconEstimate)> {
        self.estimates.iter().map(|(i, e)| (*i, e))
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Estimate a beacon as the arithmetic mean of its observed positions.
///
/// The covariance is the mean declared covariance divided by the number of
/// observations.
pub fn batch_mean(history: &[BeaconObservation]) -> Result<BeaconEstimate, EstimatorError> {
    if history.is_empty() {
        return Err(EstimatorError::NoObservations);
    }

    let n = history.len() as f64;
    let (sum_m, sum_cov) = history.iter().fold(
        (Vector2::zeros(), Matrix2::zeros()),
        |(m, c): (Vector2<f64>, Matrix2<f64>), obs| (m + obs.noisy_position_m, c + obs.noise_covariance),
    );

    Ok(BeaconEstimate {
        mean_m: sum_m / n,
        covariance: sum_cov / n.powi(2),
        num_observations: history.len(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn obs(index: usize, x: f64, y: f64, var: f64, tick: usize) -> BeaconObservation {
        BeaconObservation {
            beacon_index: index,
            noisy_position_m: Vector2::new(x, y),
            noise_covariance: Matrix2::identity() * var,
            arrival_order: tick,
        }
    }

    fn test_log() -> ObservationLog {
        let mut log = ObservationLog::new();
        log.push(obs(2, 10.0, 10.0, 4.0, 1));
        log.push(obs(0, -50.0, 20.0, 9.0, 1));
        log.push(obs(2, 12.0, 8.0, 4.0, 2));
        log
    }

    #[test]
    fn test_log_grouping() {
        let log = test_log();

        assert_eq!(log.num_beacons(), 2);
        assert_eq!(log.num_observations(), 3);
        assert_eq!(log.get(2).unwrap().len(), 2);
        assert_eq!(log.get(2).unwrap()[1].arrival_order, 2);
        assert!(log.get(1).is_none());

        let indices: Vec<usize> = log.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_kalman_table() -> Result<(), EstimatorError> {
        let table = EstimateTable::from_log(&test_log(), EstimatorKind::Kalman)?;

        assert_eq!(table.len(), 2);
        assert!(table.get(1).is_none());

        let est = table.get(2).unwrap();
        assert!((est.mean_m - Vector2::new(11.0, 9.0)).norm() < 1e-12);
        assert!((est.covariance - Matrix2::identity() * 2.0).norm() < 1e-12);

        let est = table.get(0).unwrap();
        assert_eq!(est.mean_m, Vector2::new(-50.0, 20.0));
        assert_eq!(est.num_observations, 1);

        Ok(())
    }

    #[test]
    fn test_mean_table() -> Result<(), EstimatorError> {
        let table = EstimateTable::from_log(&test_log(), EstimatorKind::Mean)?;

        let est = table.get(2).unwrap();
        assert!((est.mean_m - Vector2::new(11.0, 9.0)).norm() < 1e-12);
        assert!((est.covariance - Matrix2::identity() * 2.0).norm() < 1e-12);
        assert_eq!(est.num_observations, 2);

        assert!(matches!(batch_mean(&[]), Err(EstimatorError::NoObservations)));

        Ok(())
    }

    #[test]
    fn test_incremental_apply_matches_log() -> Result<(), EstimatorError> {
        let log = test_log();
        let mut table = EstimateTable::new();
        for (_, history) in log.iter() {
            for o in history {
                table.apply(o)?;
            }
        }

        let from_log = EstimateTable::from_log(&log, EstimatorKind::Kalman)?;
        for (i, est) in from_log.iter() {
            assert_eq!(table.get(i), Some(est));
        }

        Ok(())
    }
}
