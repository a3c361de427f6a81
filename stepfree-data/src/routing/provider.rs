//! HTTP-based `RoutingProvider` using OSRM's Route API.
//!
//! A comparison starts from OSRM's own alternatives. Because OSRM often
//! returns only one or two alternatives for short walks, the provider also
//! asks for detour candidates forced through via points offset from the
//! midpoint of the trip. Every request is best-effort: a failure is logged
//! and skipped, and the call only fails when no request got an answer.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use stepfree_core::RoutingProvider;
//! use stepfree_data::HttpRoutingProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = HttpRoutingProvider::new("http://localhost:5000")?;
//! let candidates = provider
//!     .get_alternatives(Coord { x: -0.1276, y: 51.5072 }, Coord { x: -0.1246, y: 51.5101 })
//!     .await?;
//! println!("{} candidates", candidates.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use geo::Coord;
use log::{debug, warn};
use reqwest::Client;
use stepfree_core::{ProviderError, RouteCandidate, RoutingProvider};

use super::osrm::RouteResponse;
use crate::http::{
    HttpProviderConfig, ProviderBuildError, build_client, convert_reqwest_error, parse_error,
};

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "foot";

/// Default via-point offsets `(lat, lon)` in degrees: north, south, east, west.
pub const DEFAULT_DETOUR_OFFSETS: [(f64, f64); 4] =
    [(0.002, 0.0), (-0.002, 0.0), (0.0, 0.002), (0.0, -0.002)];

const ALTERNATIVES_QUERY: [(&str, &str); 4] = [
    ("alternatives", "true"),
    ("geometries", "geojson"),
    ("overview", "full"),
    ("steps", "false"),
];

const DETOUR_QUERY: [(&str, &str); 2] = [("geometries", "geojson"), ("overview", "full")];

/// OSRM status code for an impossible route.
const NO_ROUTE: &str = "NoRoute";

/// Configuration for [`HttpRoutingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRoutingProviderConfig {
    /// Connection settings.
    pub http: HttpProviderConfig,
    /// OSRM profile segment of the request path.
    pub profile: String,
    /// Via-point offsets `(lat, lon)` applied to the trip midpoint.
    pub detour_offsets: Vec<(f64, f64)>,
}

impl Default for HttpRoutingProviderConfig {
    fn default() -> Self {
        Self {
            http: HttpProviderConfig::default(),
            profile: DEFAULT_PROFILE.to_owned(),
            detour_offsets: DEFAULT_DETOUR_OFFSETS.to_vec(),
        }
    }
}

impl HttpRoutingProviderConfig {
    /// Create a configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_http(HttpProviderConfig::new(base_url))
    }

    /// Wrap existing connection settings with the default routing policy.
    #[must_use]
    pub fn from_http(http: HttpProviderConfig) -> Self {
        Self {
            http,
            ..Default::default()
        }
    }

    /// Set the OSRM profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Replace the detour offsets. An empty list disables detours.
    #[must_use]
    pub fn with_detour_offsets(mut self, offsets: Vec<(f64, f64)>) -> Self {
        self.detour_offsets = offsets;
        self
    }
}

/// HTTP-based routing provider using the OSRM Route API.
#[derive(Debug)]
pub struct HttpRoutingProvider {
    client: Client,
    config: HttpRoutingProviderConfig,
}

impl HttpRoutingProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRoutingProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpRoutingProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = build_client(&config.http)?;
        Ok(Self { client, config })
    }

    /// Build the Route API URL for the given waypoints.
    ///
    /// The URL format is: `{base_url}/route/v1/{profile}/{coordinates}`
    /// where coordinates are semicolon-separated `lon,lat` pairs.
    fn route_url(&self, waypoints: &[Coord<f64>]) -> String {
        let coords = waypoints
            .iter()
            .map(|point| format!("{},{}", point.x, point.y))
            .collect::<Vec<_>>()
            .join(";");
        self.config
            .http
            .endpoint(&format!("route/v1/{}/{coords}", self.config.profile))
    }

    /// Via points offset from the midpoint of `origin` and `destination`.
    #[expect(
        clippy::float_arithmetic,
        reason = "via points are float offsets from the trip midpoint"
    )]
    fn detour_waypoints(&self, origin: Coord<f64>, destination: Coord<f64>) -> Vec<Coord<f64>> {
        let mid_lat = (origin.y + destination.y) / 2.0;
        let mid_lon = (origin.x + destination.x) / 2.0;
        self.config
            .detour_offsets
            .iter()
            .map(|&(lat_offset, lon_offset)| Coord {
                x: mid_lon + lon_offset,
                y: mid_lat + lat_offset,
            })
            .collect()
    }

    /// Issue a Route API request.
    ///
    /// OSRM reports routing failures such as `NoRoute` with a 4xx status and
    /// a JSON body, so the body is decoded before the status is considered.
    async fn fetch(
        &self,
        waypoints: &[Coord<f64>],
        query: &[(&str, &str)],
    ) -> Result<RouteResponse, ProviderError> {
        let url = self.route_url(waypoints);
        let timeout = self.config.http.timeout;

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, timeout))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, timeout))?;

        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(ProviderError::HttpError {
                url,
                status: status.as_u16(),
                message: body,
            }),
            Err(err) => Err(parse_error(&err)),
        }
    }

    /// Fetch OSRM's own alternatives between `origin` and `destination`.
    async fn fetch_alternatives(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RouteCandidate>, ProviderError> {
        let response = self
            .fetch(&[origin, destination], &ALTERNATIVES_QUERY)
            .await?;
        convert_alternatives(response)
    }

    /// Fetch a single route through `via`.
    async fn fetch_detour(
        &self,
        id: String,
        origin: Coord<f64>,
        via: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Option<RouteCandidate>, ProviderError> {
        let response = self
            .fetch(&[origin, via, destination], &DETOUR_QUERY)
            .await?;
        if !response.is_ok() {
            return Err(service_error(response));
        }
        response
            .routes
            .into_iter()
            .next()
            .map(|route| route.into_candidate(id))
            .transpose()
            .map_err(|err| parse_error(&err))
    }
}

fn service_error(response: RouteResponse) -> ProviderError {
    ProviderError::ServiceError {
        code: response.code,
        message: response.message.unwrap_or_default(),
    }
}

/// Convert an alternatives response into `route-<n>` candidates.
fn convert_alternatives(response: RouteResponse) -> Result<Vec<RouteCandidate>, ProviderError> {
    if !response.is_ok() {
        if response.code == NO_ROUTE {
            return Ok(Vec::new());
        }
        return Err(service_error(response));
    }

    response
        .routes
        .into_iter()
        .enumerate()
        .map(|(index, route)| {
            route
                .into_candidate(format!("route-{}", index + 1))
                .map_err(|err| parse_error(&err))
        })
        .collect()
}

#[async_trait]
impl RoutingProvider for HttpRoutingProvider {
    async fn get_alternatives(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RouteCandidate>, ProviderError> {
        let mut first_error = None;
        let mut answered = false;
        let mut candidates = match self.fetch_alternatives(origin, destination).await {
            Ok(candidates) => {
                answered = true;
                candidates
            }
            Err(err) => {
                warn!("alternatives request failed, trying detours: {err}");
                first_error = Some(err);
                Vec::new()
            }
        };

        for (index, via) in self
            .detour_waypoints(origin, destination)
            .into_iter()
            .enumerate()
        {
            let id = format!("via-{}", index + 1);
            match self
                .fetch_detour(id.clone(), origin, via, destination)
                .await
            {
                Ok(Some(candidate)) => {
                    answered = true;
                    candidates.push(candidate);
                }
                Ok(None) => {
                    answered = true;
                    debug!("detour {id} returned no route");
                }
                Err(err) => {
                    warn!("skipping detour {id}: {err}");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if let (false, Some(err)) = (answered, first_error) {
            return Err(err);
        }
        debug!("routing returned {} candidates", candidates.len());
        Ok(candidates)
    }
}
