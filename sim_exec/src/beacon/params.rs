//! Beacon sensor parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the beacon sensor model.
///
/// The sensing diameter is `altitude * diameter_gain + diameter_offset_m` and
/// the noise standard deviation on each axis is
/// `sigma_base_m + altitude * sigma_alt_gain`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SensorParams {
    /// Growth of the sensing diameter per meter of altitude
    pub diameter_gain: f64,

    /// Sensing diameter at ground level
    pub diameter_offset_m: f64,

    /// Noise standard deviation at ground level
    pub sigma_base_m: f64,

    /// Growth of the noise standard deviation per meter of altitude
    pub sigma_alt_gain: f64,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            diameter_gain: 5.0 / 7.0,
            diameter_offset_m: 28.57,
            sigma_base_m: 2.0,
            sigma_alt_gain: 1.0 / 50.0,
        }
    }
}
