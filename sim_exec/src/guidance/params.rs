//! Guidance parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the guidance controller
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Gain on the cross-track error
    pub k_e: f64,

    /// Gain on the rate of change of the cross-track error
    pub k_e_dot: f64,

    /// Upper limit on the magnitude of the normal correction.
    ///
    /// The limit actually applied is the smaller of this and the speed limit,
    /// so that some speed budget always remains for the along-path component.
    pub normal_limit_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            k_e: 1.0,
            k_e_dot: 0.5,
            normal_limit_ms: 3.0,
        }
    }
}
