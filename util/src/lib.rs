//! Utility library for the beacon survey simulation

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod params;
pub mod session;
pub mod time;
