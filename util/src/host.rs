//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root.
pub const SIM_ROOT_ENV_VAR: &str = "BEACON_SIM_ROOT";

/// Get the software root directory from the `BEACON_SIM_ROOT` environment
/// variable.
///
/// The root holds the `params` and `sessions` directories.
pub fn get_sim_root() -> Result<PathBuf, env::VarError> {
    env::var(SIM_ROOT_ENV_VAR).map(PathBuf::from)
}
