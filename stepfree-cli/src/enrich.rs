//! Enrich command implementation for the stepfree CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use stepfree_core::{ElevationProvider, FeatureProvider, PathGeometry, RoutingProvider};

use crate::fs::{file_is_file, open_utf8_file};
use crate::services::{Engine, ServiceConfig, build_comparator};
use crate::{
    ARG_ENRICH_GEOMETRY, ARG_OVERPASS_BASE_URL, ARG_TIMEOUT_SECS, CliError, ENV_ENRICH_GEOMETRY,
    write_json,
};

/// CLI arguments for the `enrich` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "enrich",
    long_about = "Summarise the OpenStreetMap features along an existing \
                 path. The path is a JSON array of [lat, lon] pairs; the \
                 summary is printed as JSON.",
    about = "Summarise accessibility features along a path"
)]
#[ortho_config(prefix = "STEPFREE")]
pub(crate) struct EnrichArgs {
    /// Path to a JSON file containing `[[lat, lon], ...]`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) geometry_path: Option<Utf8PathBuf>,
    /// Base URL for the Overpass API.
    #[arg(long = ARG_OVERPASS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_base_url: Option<String>,
    /// Request timeout for the Overpass query.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl EnrichArgs {
    pub(crate) fn into_config(self) -> Result<EnrichConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        EnrichConfig::try_from(merged)
    }
}

/// Resolved `enrich` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EnrichConfig {
    pub(crate) geometry_path: Utf8PathBuf,
    pub(crate) services: ServiceConfig,
}

impl EnrichConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.geometry_path;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_ENRICH_GEOMETRY,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_ENRICH_GEOMETRY,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_ENRICH_GEOMETRY,
                path: path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<EnrichArgs> for EnrichConfig {
    type Error = CliError;

    fn try_from(args: EnrichArgs) -> Result<Self, Self::Error> {
        let geometry_path = args.geometry_path.ok_or(CliError::MissingArgument {
            field: ARG_ENRICH_GEOMETRY,
            env: ENV_ENRICH_GEOMETRY,
        })?;
        Ok(Self {
            geometry_path,
            services: ServiceConfig::resolve(None, None, args.overpass_base_url, args.timeout_secs),
        })
    }
}

/// Loads a JSON-encoded `[[lat, lon], ...]` path from disk.
///
/// Empty lists and positions outside WGS84 bounds are parse errors.
pub(super) fn load_geometry(path: &Utf8Path) -> Result<Vec<Coord<f64>>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenGeometry {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let geometry: PathGeometry =
        serde_json::from_reader(reader).map_err(|source| CliError::ParseGeometry {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(geometry.points().to_vec())
}

pub(super) fn run_enrich(args: EnrichArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let engine = Engine::new(build_comparator(&config.services)?)?;
    let mut stdout = std::io::stdout().lock();
    run_enrich_with(&config, &engine, &mut stdout)
}

pub(super) fn run_enrich_with<R, E, F>(
    config: &EnrichConfig,
    engine: &Engine<R, E, F>,
    writer: &mut dyn Write,
) -> Result<(), CliError>
where
    R: RoutingProvider,
    E: ElevationProvider,
    F: FeatureProvider,
{
    let path = load_geometry(&config.geometry_path)?;
    let summary = engine.enrich(&path)?;
    write_json(writer, &summary)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<EnrichConfig, CliError> {
    let merged = EnrichArgs::merge_from_layers(layers).map_err(CliError::from)?;
    EnrichConfig::try_from(merged)
}
