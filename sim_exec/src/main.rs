//! Beacon survey executable entry point.
//!
//! # Architecture
//!
//! The executable:
//!
//!     - Initialises the session and logging
//!     - Loads the survey parameters, from `survey.toml` in the parameters
//!       directory or from the path given as the single argument
//!     - Runs the survey to completion
//!     - Archives the trajectory and saves a summary of the run
//!
//! The exit code is zero when at least one beacon was found.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info};
use std::env;

// Internal
use sim_lib::sim::{SurveyParams, SurveySim};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("sim_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Beacon Survey Simulation\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let args: Vec<String> = env::args().collect();
    debug!("CLI arguments: {:?}", args);

    let params: SurveyParams = match args.len() {
        1 => util::params::load("survey.toml").wrap_err("Could not load survey params")?,
        2 => {
            info!("Loading parameters from \"{}\"", &args[1]);
            util::params::load_from_path(&args[1]).wrap_err("Could not load survey params")?
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    info!("Survey parameters loaded");

    // ---- RUN ----

    let outcome = SurveySim::new(params)
        .wrap_err("Failed to initialise the survey")?
        .run()
        .wrap_err("Survey failed")?;

    // ---- SAVE RESULTS ----

    let mut archiver =
        Archiver::from_path(&session, "trajectory.csv").wrap_err("Failed to create the archive")?;
    for record in outcome.trajectory.records() {
        archiver
            .serialise(record)
            .wrap_err("Failed to archive the trajectory")?;
    }
    archiver.flush().wrap_err("Failed to flush the archive")?;

    session
        .save("survey_summary.json", &outcome)
        .wrap_err("Failed to save the survey summary")?;

    info!(
        "{} of {} beacons found, {} never observed",
        outcome.report.num_found(),
        outcome.report.verdicts.len(),
        outcome.report.num_not_observed()
    );

    if outcome.report.success {
        info!("Success");
        Ok(())
    } else {
        Err(eyre!("No beacon was found"))
    }
}
