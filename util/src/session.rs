//! Session management
//!
//! A session is one execution of a simulation executable. Each session owns a
//! directory holding its log file, an `arch` directory for CSV archives and any
//! JSON summaries saved during the run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use log::debug;
use serde::Serialize;
use std::fs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A chrono format string which diplays a timestamp. See
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html for more
/// information.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A struct storing information about the current session
#[derive(Clone, Debug)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (BEACON_SIM_ROOT) is not set")]
    SimRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error(
        "Cannot initialise the session epoch, have you already initialised the \
         session? (conquer_once error: {0})"
    )]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("Cannot get the epoch time, did you forget to initialise the session?")]
    CannotGetEpoch,

    #[error("Cannot write {0:?}: {1}")]
    CannotWrite(PathBuf, std::io::Error),

    #[error("Cannot serialise data for {0:?}: {1}")]
    CannotSerialise(PathBuf, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session within the given directory of the software root.
    ///
    /// This will create a new session directory named `{exec_name}_{timestamp}`
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_sim_root().map_err(|_| SessionError::SimRootNotSet)?;

        Self::new_in(root, exec_name, sessions_dir)
    }

    /// Start a new session below an explicit root directory.
    pub fn new_in<P: AsRef<Path>>(
        root: P,
        exec_name: &str,
        sessions_dir: &str,
    ) -> Result<Self, SessionError> {
        // Set the session epoch
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        // Format the session epoch as a timestamp
        let timestamp = SESSION_EPOCH
            .get()
            .ok_or(SessionError::CannotGetEpoch)?
            .format(TIMESTAMP_FORMAT);

        // Create the session path
        let mut path = root.as_ref().to_path_buf();
        path.push(sessions_dir);
        path.push(format!("{}_{}", exec_name, timestamp));
        fs::create_dir_all(&path).map_err(SessionError::CannotCreateDir)?;

        // Create the archive dir
        let arch_path = path.join("arch");
        fs::create_dir_all(&arch_path).map_err(SessionError::CannotCreateDir)?;

        let log_file_path = path.join(format!("{}.log", exec_name));

        Ok(Session {
            session_root: path,
            arch_root: arch_path,
            log_file_path,
        })
    }

    /// Save the given data as pretty JSON to a session-relative path.
    ///
    /// Parent directories are created as required and any existing file is
    /// truncated.
    pub fn save<P: AsRef<Path>, T: Serialize>(&self, path: P, data: &T) -> Result<(), SessionError> {
        let full_path = self.session_root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::CannotWrite(full_path.clone(), e))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&full_path)
            .map_err(|e| SessionError::CannotWrite(full_path.clone(), e))?;

        serde_json::to_writer_pretty(&file, data)
            .map_err(|e| SessionError::CannotSerialise(full_path.clone(), e))?;

        debug!("Saved {:?}", full_path);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns `NAN` if the session has not been started yet.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => std::f64::NAN,
    }
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - This function will panic if the session epoch has not been
///   initialised, which is performed on creating a new Session instance.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}
