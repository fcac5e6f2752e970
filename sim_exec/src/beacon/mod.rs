//! # Beacon module
//!
//! Beacons are fixed, randomly placed transmitters on the ground plane. The
//! vehicle can hear a beacon when it is within the sensing radius, which grows
//! with altitude, and every broadcast it hears carries Gaussian position noise
//! which also grows with altitude.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod field;
pub mod params;
pub mod sensor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use field::*;
pub use params::SensorParams;
pub use sensor::*;
