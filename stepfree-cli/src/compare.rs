//! Compare command implementation for the stepfree CLI.

use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use stepfree_core::{ElevationProvider, FeatureProvider, RoutingProvider};

use crate::services::{Engine, ServiceConfig, build_comparator};
use crate::{
    ARG_COMPARE_FROM, ARG_COMPARE_TO, ARG_ELEVATION_BASE_URL, ARG_OSRM_BASE_URL,
    ARG_OVERPASS_BASE_URL, ARG_TIMEOUT_SECS, CliError, ENV_COMPARE_FROM, ENV_COMPARE_TO,
    write_json,
};

/// CLI arguments for the `compare` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "compare",
    long_about = "Fetch walking alternatives between two positions, score \
                 them from elevation data, then check the best candidate \
                 for steps and rough surfaces and re-rank. Routes are \
                 printed as JSON, best first.",
    about = "Rank walking routes between two positions by accessibility"
)]
#[ortho_config(prefix = "STEPFREE")]
pub(crate) struct CompareArgs {
    /// Start position as `lat,lon`.
    #[arg(long = ARG_COMPARE_FROM, value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// End position as `lat,lon`.
    #[arg(long = ARG_COMPARE_TO, value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Base URL for the OSRM server.
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL for the Open-Elevation service.
    #[arg(long = ARG_ELEVATION_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) elevation_base_url: Option<String>,
    /// Base URL for the Overpass API.
    #[arg(long = ARG_OVERPASS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_base_url: Option<String>,
    /// Request timeout applied to every upstream service.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl CompareArgs {
    pub(crate) fn into_config(self) -> Result<CompareConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CompareConfig::try_from(merged)
    }
}

/// Resolved `compare` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompareConfig {
    pub(crate) origin: Coord<f64>,
    pub(crate) destination: Coord<f64>,
    pub(crate) services: ServiceConfig,
}

impl TryFrom<CompareArgs> for CompareConfig {
    type Error = CliError;

    fn try_from(args: CompareArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_COMPARE_FROM,
            env: ENV_COMPARE_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_COMPARE_TO,
            env: ENV_COMPARE_TO,
        })?;
        Ok(Self {
            origin: parse_position(ARG_COMPARE_FROM, &from)?,
            destination: parse_position(ARG_COMPARE_TO, &to)?,
            services: ServiceConfig::resolve(
                args.osrm_base_url,
                args.elevation_base_url,
                args.overpass_base_url,
                args.timeout_secs,
            ),
        })
    }
}

/// Parse a `lat,lon` pair into a coordinate.
pub(crate) fn parse_position(field: &'static str, value: &str) -> Result<Coord<f64>, CliError> {
    let invalid = || CliError::InvalidPosition {
        field,
        value: value.to_owned(),
    };
    let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(invalid());
    }
    Ok(Coord { x: lon, y: lat })
}

pub(super) fn run_compare(args: CompareArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let engine = Engine::new(build_comparator(&config.services)?)?;
    let mut stdout = std::io::stdout().lock();
    run_compare_with(&config, &engine, &mut stdout)
}

pub(super) fn run_compare_with<R, E, F>(
    config: &CompareConfig,
    engine: &Engine<R, E, F>,
    writer: &mut dyn Write,
) -> Result<(), CliError>
where
    R: RoutingProvider,
    E: ElevationProvider,
    F: FeatureProvider,
{
    let routes = engine.compare(config.origin, config.destination)?;
    write_json(writer, &routes)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<CompareConfig, CliError> {
    let merged = CompareArgs::merge_from_layers(layers).map_err(CliError::from)?;
    CompareConfig::try_from(merged)
}
