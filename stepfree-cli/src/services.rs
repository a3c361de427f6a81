//! Upstream service wiring shared by the `compare` and `enrich` commands.

use std::time::Duration;

use geo::Coord;
use log::debug;
use stepfree_core::{
    ElevationProvider, FeatureProvider, MapFeatureSummary, Route, RouteComparator,
    RoutingProvider,
};
use stepfree_data::{
    DEFAULT_FEATURE_TIMEOUT, HttpElevationProvider, HttpProviderConfig, HttpRoutingProvider,
    HttpRoutingProviderConfig, OverpassFeatureProvider, ProviderBuildError,
};
use tokio::runtime::Runtime;

use crate::CliError;

/// Public OSRM demo server.
pub(crate) const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
/// Public Open-Elevation instance.
pub(crate) const DEFAULT_ELEVATION_BASE_URL: &str = "https://api.open-elevation.com";
/// Main Overpass API instance.
pub(crate) const DEFAULT_OVERPASS_BASE_URL: &str = "https://overpass-api.de";

/// Resolved upstream endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceConfig {
    pub(crate) osrm_base_url: String,
    pub(crate) elevation_base_url: String,
    pub(crate) overpass_base_url: String,
    /// Overrides every provider's request timeout when set.
    pub(crate) timeout: Option<Duration>,
}

impl ServiceConfig {
    /// Fill unset endpoints with the public defaults.
    pub(crate) fn resolve(
        osrm_base_url: Option<String>,
        elevation_base_url: Option<String>,
        overpass_base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            osrm_base_url: osrm_base_url.unwrap_or_else(|| DEFAULT_OSRM_BASE_URL.to_owned()),
            elevation_base_url: elevation_base_url
                .unwrap_or_else(|| DEFAULT_ELEVATION_BASE_URL.to_owned()),
            overpass_base_url: overpass_base_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_BASE_URL.to_owned()),
            timeout: timeout_secs.map(Duration::from_secs),
        }
    }

    fn http_config(
        &self,
        base_url: &str,
        fallback_timeout: Option<Duration>,
    ) -> HttpProviderConfig {
        let config = HttpProviderConfig::new(base_url);
        match self.timeout.or(fallback_timeout) {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

/// Comparator backed by the HTTP providers.
pub(crate) type HttpComparator =
    RouteComparator<HttpRoutingProvider, HttpElevationProvider, OverpassFeatureProvider>;

/// Build HTTP providers for every configured endpoint.
pub(crate) fn build_comparator(config: &ServiceConfig) -> Result<HttpComparator, CliError> {
    let routing = HttpRoutingProvider::with_config(HttpRoutingProviderConfig::from_http(
        config.http_config(&config.osrm_base_url, None),
    ))
    .map_err(build_error(&config.osrm_base_url))?;
    let elevation =
        HttpElevationProvider::with_config(config.http_config(&config.elevation_base_url, None))
            .map_err(build_error(&config.elevation_base_url))?;
    let features = OverpassFeatureProvider::with_config(
        config.http_config(&config.overpass_base_url, Some(DEFAULT_FEATURE_TIMEOUT)),
    )
    .map_err(build_error(&config.overpass_base_url))?;

    debug!(
        "using osrm={} elevation={} overpass={}",
        config.osrm_base_url, config.elevation_base_url, config.overpass_base_url
    );
    Ok(RouteComparator::new(routing, elevation, features))
}

fn build_error(base_url: &str) -> impl FnOnce(ProviderBuildError) -> CliError {
    let base_url = base_url.to_owned();
    move |source| CliError::BuildProvider { base_url, source }
}

/// A comparator paired with the runtime that drives it.
pub(crate) struct Engine<R, E, F> {
    runtime: Runtime,
    comparator: RouteComparator<R, E, F>,
}

impl<R, E, F> Engine<R, E, F>
where
    R: RoutingProvider,
    E: ElevationProvider,
    F: FeatureProvider,
{
    pub(crate) fn new(comparator: RouteComparator<R, E, F>) -> Result<Self, CliError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;
        Ok(Self {
            runtime,
            comparator,
        })
    }

    pub(crate) fn compare(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<Route>, CliError> {
        self.runtime
            .block_on(self.comparator.compare_routes(origin, destination))
            .map_err(CliError::from)
    }

    pub(crate) fn enrich(&self, path: &[Coord<f64>]) -> Result<MapFeatureSummary, CliError> {
        self.runtime
            .block_on(self.comparator.enrich_geometry(path))
            .map_err(CliError::from)
    }
}
