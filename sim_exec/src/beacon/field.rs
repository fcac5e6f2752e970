//! # Beacon field
//!
//! Ground truth beacon placement.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;
use rand::Rng;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single beacon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Beacon {
    /// Index of the beacon within its field
    pub index: usize,

    /// Position on the ground plane
    pub position_m: Vector2<f64>,
}

/// The set of beacons placed in a square domain.
///
/// Immutable after generation.
#[derive(Debug, Clone, Serialize)]
pub struct BeaconField {
    beacons: Vec<Beacon>,
    half_width_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while generating a beacon field.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error(
        "Could only place {placed} of {requested} beacons with the required separation in \
         {attempts} attempts"
    )]
    CapacityExceeded {
        requested: usize,
        placed: usize,
        attempts: usize,
    },

    #[error(
        "Invalid beacon domain (half width: {half_width_m} m, minimum separation: \
         {min_separation_m} m)"
    )]
    InvalidDomain {
        half_width_m: f64,
        min_separation_m: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BeaconField {
    /// Generate a field of `num_beacons` beacons in `[-W, W]²` by rejection
    /// sampling.
    ///
    /// Candidates are drawn uniformly and accepted if they are at least
    /// `min_separation_m` from every beacon accepted so far. At most
    /// `max_attempts` candidates are drawn in total, after which
    /// `FieldError::CapacityExceeded` is returned.
    pub fn generate<R: Rng + ?Sized>(
        num_beacons: usize,
        half_width_m: f64,
        min_separation_m: f64,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        if !half_width_m.is_finite()
            || half_width_m <= 0.0
            || !min_separation_m.is_finite()
            || min_separation_m < 0.0
        {
            return Err(FieldError::InvalidDomain {
                half_width_m,
                min_separation_m,
            });
        }

        let mut beacons: Vec<Beacon> = Vec::with_capacity(num_beacons);
        let mut attempts = 0;

        while beacons.len() < num_beacons {
            if attempts >= max_attempts {
                return Err(FieldError::CapacityExceeded {
                    requested: num_beacons,
                    placed: beacons.len(),
                    attempts,
                });
            }
            attempts += 1;

            let candidate = Vector2::new(
                rng.gen_range(-half_width_m..=half_width_m),
                rng.gen_range(-half_width_m..=half_width_m),
            );

            if beacons
                .iter()
                .all(|b| (b.position_m - candidate).norm() >= min_separation_m)
            {
                beacons.push(Beacon {
                    index: beacons.len(),
                    position_m: candidate,
                });
            }
        }

        debug!(
            "Placed {} beacons in {} attempts (packing estimate {:.1} beacons)",
            beacons.len(),
            attempts,
            Self::capacity_estimate(half_width_m, min_separation_m)
        );

        Ok(Self {
            beacons,
            half_width_m,
        })
    }

    /// Build a field from known positions, indexed in order.
    pub fn from_positions(positions_m: Vec<Vector2<f64>>, half_width_m: f64) -> Self {
        Self {
            beacons: positions_m
                .into_iter()
                .enumerate()
                .map(|(index, position_m)| Beacon { index, position_m })
                .collect(),
            half_width_m,
        }
    }

    /// Rough upper bound on the number of beacons that fit in the domain, the
    /// area of the domain over the area of a disc of diameter
    /// `min_separation_m`.
    pub fn capacity_estimate(half_width_m: f64, min_separation_m: f64) -> f64 {
        (2.0 * half_width_m).powi(2) / (std::f64::consts::PI * (min_separation_m / 2.0).powi(2))
    }

    pub fn beacons(&self) -> &[Beacon] {
        &self.beacons
    }

    pub fn get(&self, index: usize) -> Option<&Beacon> {
        self.beacons.get(index)
    }

    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    pub fn half_width_m(&self) -> f64 {
        self.half_width_m
    }

    /// The smallest distance between any two beacons, or `None` if there are
    /// fewer than two.
    pub fn min_pairwise_distance_m(&self) -> Option<f64> {
        self.beacons
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                self.beacons[i + 1..]
                    .iter()
                    .map(move |b| (a.position_m - b.position_m).norm())
            })
            .fold(None, |min, d| match min {
                Some(m) if m <= d => Some(m),
                _ => Some(d),
            })
    }
}
