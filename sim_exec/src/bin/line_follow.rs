//! # Line Follow Test
//!
//! Flies the vehicle onto a straight reference path with the guidance
//! controller. Parameters come from `line_follow.toml`, or the path given as
//! the single argument.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::info;
use std::env;

use sim_lib::sim::{LineFollowParams, LineFollowSim};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    session::Session,
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let session = Session::new("line_follow", "sessions").wrap_err("Failed to create the session")?;
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    let args: Vec<String> = env::args().collect();
    let params: LineFollowParams = match args.len() {
        1 => util::params::load("line_follow.toml"),
        2 => util::params::load_from_path(&args[1]),
        n => return Err(eyre!("Expected either zero or one argument, found {}", n - 1)),
    }
    .wrap_err("Could not load line follow params")?;

    let outcome = LineFollowSim::new(params)?.run()?;

    let mut archiver = Archiver::from_path(&session, "trajectory.csv")?;
    for record in outcome.trajectory.records() {
        archiver.serialise(record)?;
    }
    archiver.flush()?;

    session.save("line_follow_summary.json", &outcome)?;

    if let Some(end) = outcome.trajectory.last() {
        info!(
            "Final distance to the reference line: {:.3e} m",
            outcome.path.distance_to_line(end)
        );
    }

    if outcome.aborted {
        return Err(eyre!("Cross-track limit exceeded"));
    }

    Ok(())
}
