//! Command-line interface for ranking walking routes by accessibility.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod compare;
mod enrich;
mod error;
mod fs;
mod services;

pub use error::CliError;

use compare::{CompareArgs, run_compare};
use enrich::{EnrichArgs, run_enrich};

pub(crate) const ARG_COMPARE_FROM: &str = "from";
pub(crate) const ARG_COMPARE_TO: &str = "to";
pub(crate) const ARG_ENRICH_GEOMETRY: &str = "geometry";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_ELEVATION_BASE_URL: &str = "elevation-base-url";
pub(crate) const ARG_OVERPASS_BASE_URL: &str = "overpass-base-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ENV_COMPARE_FROM: &str = "STEPFREE_CMDS_COMPARE_FROM";
pub(crate) const ENV_COMPARE_TO: &str = "STEPFREE_CMDS_COMPARE_TO";
pub(crate) const ENV_ENRICH_GEOMETRY: &str = "STEPFREE_CMDS_ENRICH_GEOMETRY_PATH";

/// Run the stepfree CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, an
/// upstream service fails, or the result cannot be written to stdout.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Compare(args) => run_compare(args),
        Command::Enrich(args) => run_enrich(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stepfree",
    about = "Compare walking routes for step-free accessibility",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank walking alternatives between two positions.
    Compare(CompareArgs),
    /// Summarise map features along an existing path.
    Enrich(EnrichArgs),
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
