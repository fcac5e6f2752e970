//! Generic parameters functions
//!
//! Parameter files are TOML documents deserialised directly into the
//! parameter struct of the module that owns them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (BEACON_SIM_ROOT) is not set")]
    SimRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$BEACON_SIM_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    // Get the params dir
    let mut path = crate::host::get_sim_root().map_err(|_| LoadError::SimRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    load_from_path(path)
}

/// Load a parameter file from an explicit path.
pub fn load_from_path<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>,
{
    let params_str = read_to_string(path).map_err(LoadError::FileLoadError)?;

    parse(&params_str)
}

/// Parse parameters from a TOML string.
pub fn parse<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Dummy {
        gain: f64,
        #[serde(default)]
        count: usize,
    }

    #[test]
    fn test_parse() {
        let p: Dummy = parse("gain = 0.5\ncount = 3").unwrap();
        assert_eq!(p, Dummy { gain: 0.5, count: 3 });

        let p: Dummy = parse("gain = 1.0").unwrap();
        assert_eq!(p.count, 0);

        assert!(matches!(
            parse::<Dummy>("gain = \"fast\""),
            Err(LoadError::DeserialiseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_from_path::<Dummy, _>("/definitely/not/a/params.toml"),
            Err(LoadError::FileLoadError(_))
        ));
    }
}
