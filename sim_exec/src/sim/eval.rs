//! # Survey evaluation
//!
//! Scores the beacon estimates against the ground truth field.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use crate::beacon::BeaconField;
use crate::estimator::EstimateTable;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The verdict on a single ground truth beacon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BeaconVerdict {
    /// Index of the beacon
    pub index: usize,

    /// True position of the beacon
    pub truth_m: Vector2<f64>,

    /// Estimated position, if the beacon was observed
    pub estimate_m: Option<Vector2<f64>>,

    pub outcome: BeaconOutcome,
}

/// The result of scoring every beacon in a field.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    /// One verdict per ground truth beacon, in index order
    pub verdicts: Vec<BeaconVerdict>,

    /// True if at least one beacon was found
    pub success: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Outcome for a single beacon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum BeaconOutcome {
    /// The estimate is within the threshold of the truth
    Found { error_m: f64 },

    /// The beacon was observed but the estimate is too far from the truth
    Missed { error_m: f64 },

    /// The beacon was never observed, so there is no estimate
    NotObserved,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Score the estimates against the field.
///
/// A beacon is found if its estimate lies within `threshold_m` (inclusive) of
/// the truth. The survey succeeds if any beacon is found.
pub fn evaluate(field: &BeaconField, estimates: &EstimateTable, threshold_m: f64) -> SurveyReport {
    let verdicts: Vec<BeaconVerdict> = field
        .beacons()
        .iter()
        .map(|beacon| {
            let estimate_m = estimates.get(beacon.index).map(|e| e.mean_m);

            let outcome = match estimate_m {
                Some(est_m) => {
                    let error_m = (est_m - beacon.position_m).norm();
                    if error_m <= threshold_m {
                        info!("Success: found beacon {} (error {:.3} m)", beacon.index, error_m);
                        BeaconOutcome::Found { error_m }
                    } else {
                        BeaconOutcome::Missed { error_m }
                    }
                }
                None => {
                    warn!("Beacon {} was never observed", beacon.index);
                    BeaconOutcome::NotObserved
                }
            };

            BeaconVerdict {
                index: beacon.index,
                truth_m: beacon.position_m,
                estimate_m,
                outcome,
            }
        })
        .collect();

    let success = verdicts.iter().any(|v| v.outcome.is_found());

    if !success {
        info!("Fail: no beacon found");
    }

    SurveyReport { verdicts, success }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BeaconOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, BeaconOutcome::Found { .. })
    }
}

impl SurveyReport {
    /// Number of beacons found.
    pub fn num_found(&self) -> usize {
        self.verdicts.iter().filter(|v| v.outcome.is_found()).count()
    }

    /// Number of beacons that were never observed.
    pub fn num_not_observed(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|v| v.outcome == BeaconOutcome::NotObserved)
            .count()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::beacon::BeaconObservation;
    use nalgebra::Matrix2;

    fn table_with(estimates: &[(usize, f64, f64)]) -> EstimateTable {
        let mut table = EstimateTable::new();
        for (i, x, y) in estimates {
            table
                .apply(&BeaconObservation {
                    beacon_index: *i,
                    noisy_position_m: Vector2::new(*x, *y),
                    noise_covariance: Matrix2::identity(),
                    arrival_order: 0,
                })
                .unwrap();
        }
        table
    }

    #[test]
    fn test_found_and_missed() {
        let field = BeaconField::from_positions(
            vec![Vector2::new(100.0, 100.0), Vector2::new(-100.0, 50.0)],
            160.0,
        );

        // Close estimate is found
        let report = evaluate(&field, &table_with(&[(0, 100.5, 100.3)]), 1.0);
        assert!(report.success);
        match report.verdicts[0].outcome {
            BeaconOutcome::Found { error_m } => assert!((error_m - 0.5831).abs() < 1e-3),
            other => panic!("Expected found, got {:?}", other),
        }
        assert_eq!(report.verdicts[1].outcome, BeaconOutcome::NotObserved);
        assert_eq!(report.num_found(), 1);
        assert_eq!(report.num_not_observed(), 1);

        // Far estimate is missed
        let report = evaluate(&field, &table_with(&[(0, 102.0, 102.0)]), 1.0);
        assert!(!report.success);
        match report.verdicts[0].outcome {
            BeaconOutcome::Missed { error_m } => assert!((error_m - 2.8284).abs() < 1e-3),
            other => panic!("Expected missed, got {:?}", other),
        }
    }

    #[test]
    fn test_no_estimates() {
        let field = BeaconField::from_positions(vec![Vector2::new(0.0, 0.0)], 160.0);
        let report = evaluate(&field, &EstimateTable::new(), 1.0);

        assert!(!report.success);
        assert_eq!(report.verdicts[0].estimate_m, None);
        assert_eq!(report.verdicts[0].outcome, BeaconOutcome::NotObserved);
    }

    #[test]
    fn test_threshold_inclusive() {
        let field = BeaconField::from_positions(vec![Vector2::new(0.0, 0.0)], 160.0);
        let report = evaluate(&field, &table_with(&[(0, 1.0, 0.0)]), 1.0);

        assert!(report.success);
    }
}
