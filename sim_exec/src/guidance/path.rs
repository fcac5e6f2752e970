//! # Reference path
//!
//! This module defines the straight reference path followed by guidance, and
//! the guidance surface derived from it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use crate::kin::Position3D;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Waypoints closer than this are considered coincident.
const MIN_PATH_LENGTH_M: f64 = 1e-9;

/// Below this horizontal extent of the direction vector the path is treated as
/// vertical.
const VERTICAL_THRESHOLD: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A plane described by `normal . p + offset_m = 0`.
///
/// The normal is always of unit length.
#[derive(Debug, Copy, Clone, Serialize, PartialEq)]
pub struct GuidanceSurface {
    /// Unit normal of the surface
    pub normal: Vector3<f64>,

    /// Offset of the surface along the normal
    pub offset_m: f64,
}

/// A straight path between two waypoints.
///
/// Immutable once built. The guidance surface always contains the whole path.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct ReferencePath {
    /// First waypoint
    start_m: Position3D,

    /// Second waypoint
    end_m: Position3D,

    /// Unit vector pointing from the first to the second waypoint
    direction: Vector3<f64>,

    /// The plane against which cross-track error is measured
    surface: GuidanceSurface,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error(
        "Cannot build a guidance surface between {0:?} and {1:?}, the waypoints are coincident \
         or not finite"
    )]
    DegenerateGeometry(Position3D, Position3D),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GuidanceSurface {
    /// Build the surface containing `point` with the given (not necessarily
    /// unit) normal.
    fn through(point: &Position3D, normal: Vector3<f64>) -> Self {
        let normal = normal.normalize();

        Self {
            normal,
            offset_m: -normal.dot(point),
        }
    }

    /// Signed distance from the surface to the point, positive on the side the
    /// normal points to.
    pub fn signed_distance(&self, point: &Position3D) -> f64 {
        self.normal.dot(point) + self.offset_m
    }
}

impl ReferencePath {
    /// Build a new path between the two waypoints.
    ///
    /// The surface normal is chosen to be horizontal, i.e. the surface is the
    /// vertical plane through the path. For a vertical path there is no unique
    /// horizontal normal, in which case the X axis is orthogonalised against
    /// the path direction instead.
    pub fn new(p1: Position3D, p2: Position3D) -> Result<Self, PathError> {
        let diff = p2 - p1;
        let length_m = diff.norm();

        if !length_m.is_finite() || length_m < MIN_PATH_LENGTH_M {
            return Err(PathError::DegenerateGeometry(p1, p2));
        }

        let direction = diff / length_m;

        // Horizontal normal from the cross product with the Z axis, falling
        // back to Gram-Schmidt on the X axis.
        let horizontal = direction.cross(&Vector3::z());
        let normal = if horizontal.norm() > VERTICAL_THRESHOLD {
            horizontal
        } else {
            Vector3::x() - direction.x * direction
        };

        let surface = GuidanceSurface::through(&p1, normal);

        debug!(
            "Reference path built, direction: {:?}, surface normal: {:?}, offset: {}",
            direction.as_slice(),
            surface.normal.as_slice(),
            surface.offset_m
        );

        Ok(Self {
            start_m: p1,
            end_m: p2,
            direction,
            surface,
        })
    }

    /// The first waypoint
    pub fn start(&self) -> &Position3D {
        &self.start_m
    }

    /// The second waypoint
    pub fn end(&self) -> &Position3D {
        &self.end_m
    }

    /// Unit direction of the path
    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }

    /// The guidance surface containing the path
    pub fn surface(&self) -> &GuidanceSurface {
        &self.surface
    }

    /// Signed cross-track error of the given position.
    ///
    /// This is the distance to the guidance surface, signed so that a positive
    /// error requires a correction along the surface normal.
    pub fn cross_track_error(&self, position: &Position3D) -> f64 {
        -self.surface.signed_distance(position)
    }

    /// Perpendicular distance from the position to the infinite line through
    /// the path.
    pub fn distance_to_line(&self, position: &Position3D) -> f64 {
        let rel = position - self.start_m;

        (rel - rel.dot(&self.direction) * self.direction).norm()
    }
}
