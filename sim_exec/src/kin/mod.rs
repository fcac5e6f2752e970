//! # Kinematics module
//!
//! The vehicle is modelled as a point mass which moves by exactly its
//! commanded velocity each tick (explicit Euler integration over a unit time
//! step). Commands come from a [`Planner`], either the deterministic sweep
//! used for beacon surveys, a random walk, or the guidance controller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod planner;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// Internal
pub use planner::*;

// ---------------------------------------------------------------------------
// TYPES
// ---------------------------------------------------------------------------

/// Position of the vehicle in the world frame, in meters.
pub type Position3D = Vector3<f64>;

/// Velocity of the vehicle in the world frame, in meters per tick.
pub type Velocity3D = Vector3<f64>;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The simulated vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    /// Current position
    position_m: Position3D,

    /// The last command applied to the vehicle
    velocity_ms: Velocity3D,

    /// Every position the vehicle has occupied, including the initial one
    trajectory: Trajectory,
}

/// Ordered, append-only record of vehicle positions, one per tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trajectory {
    points_m: Vec<Position3D>,
}

/// A single trajectory row as written to an archive.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TrajectoryRecord {
    pub tick: usize,
    pub x_m: f64,
    pub y_m: f64,
    pub z_m: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Integrate the command over one unit time step.
pub fn advance(position: &Position3D, command: &Velocity3D) -> Position3D {
    position + command
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Vehicle {
    /// Create a new stationary vehicle at the given position.
    pub fn new(start_m: Position3D) -> Self {
        Self {
            position_m: start_m,
            velocity_ms: Velocity3D::zeros(),
            trajectory: Trajectory::new(start_m),
        }
    }

    /// Apply a command for one tick, recording the new position.
    pub fn step(&mut self, command: Velocity3D) {
        self.velocity_ms = command;
        self.position_m = advance(&self.position_m, &command);
        self.trajectory.push(self.position_m);
    }

    pub fn position(&self) -> &Position3D {
        &self.position_m
    }

    pub fn velocity(&self) -> &Velocity3D {
        &self.velocity_ms
    }

    /// Altitude of the vehicle (the Z component of the position).
    pub fn altitude_m(&self) -> f64 {
        self.position_m.z
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Consume the vehicle, returning its trajectory.
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }
}

impl Trajectory {
    /// Start a new trajectory at the initial position.
    pub fn new(initial_m: Position3D) -> Self {
        Self {
            points_m: vec![initial_m],
        }
    }

    pub fn push(&mut self, point_m: Position3D) {
        self.points_m.push(point_m);
    }

    pub fn points(&self) -> &[Position3D] {
        &self.points_m
    }

    pub fn first(&self) -> Option<&Position3D> {
        self.points_m.first()
    }

    pub fn last(&self) -> Option<&Position3D> {
        self.points_m.last()
    }

    pub fn len(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Iterate over the trajectory as archive records, indexed by tick.
    pub fn records(&self) -> impl Iterator<Item = TrajectoryRecord> + '_ {
        self.points_m
            .iter()
            .enumerate()
            .map(|(tick, p)| TrajectoryRecord {
                tick,
                x_m: p.x,
                y_m: p.y,
                z_m: p.z,
            })
    }
}
