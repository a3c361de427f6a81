//! Deterministic provider doubles for unit, behaviour and doc tests.
//!
//! None of these types touch the network. Each stub answers every request
//! with a pre-configured response and counts how often it was called.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use geo::Coord;

use crate::features::{FeatureElement, FeatureQuery, Tags};
use crate::geometry::{GeometryError, PathGeometry, distance};
use crate::provider::{ElevationProvider, FeatureProvider, ProviderError, RoutingProvider};
use crate::route::RouteCandidate;

/// Walking speed used by [`line_candidate`] to derive durations.
const WALKING_SPEED_MPS: f64 = 1.4;

/// Stub `RoutingProvider` returning fixed candidates or a fixed error.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use stepfree_core::RoutingProvider;
/// use stepfree_core::test_support::{StubRoutingProvider, line_candidate};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let destination = Coord { x: 0.0, y: 0.001 };
/// let provider =
///     StubRoutingProvider::with_candidates(vec![line_candidate("route-1", origin, destination, 2)?]);
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let candidates = runtime.block_on(provider.get_alternatives(origin, destination))?;
/// assert_eq!(candidates.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StubRoutingProvider {
    response: Result<Vec<RouteCandidate>, ProviderError>,
}

impl StubRoutingProvider {
    /// Create a provider that returns `candidates` for every request.
    #[must_use]
    pub const fn with_candidates(candidates: Vec<RouteCandidate>) -> Self {
        Self {
            response: Ok(candidates),
        }
    }

    /// Create a provider that fails every request with `error`.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[async_trait]
impl RoutingProvider for StubRoutingProvider {
    async fn get_alternatives(
        &self,
        _origin: Coord<f64>,
        _destination: Coord<f64>,
    ) -> Result<Vec<RouteCandidate>, ProviderError> {
        self.response.clone()
    }
}

#[derive(Debug, Clone)]
enum StubElevations {
    Constant(f64),
    Gradient { base_m: f64, metres_per_degree: f64 },
    Values(Vec<f64>),
    Error(ProviderError),
}

/// Stub `ElevationProvider`.
///
/// Records the number of calls and the largest request it has served so
/// tests can check point budgets.
#[derive(Debug)]
pub struct StubElevationProvider {
    response: StubElevations,
    calls: AtomicUsize,
    largest_request: AtomicUsize,
}

impl StubElevationProvider {
    const fn from_response(response: StubElevations) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            largest_request: AtomicUsize::new(0),
        }
    }

    /// Every point sits at `elevation_m`.
    #[must_use]
    pub const fn constant(elevation_m: f64) -> Self {
        Self::from_response(StubElevations::Constant(elevation_m))
    }

    /// Elevation rises linearly with latitude from `base_m` at the equator.
    #[must_use]
    pub const fn with_gradient(base_m: f64, metres_per_degree: f64) -> Self {
        Self::from_response(StubElevations::Gradient {
            base_m,
            metres_per_degree,
        })
    }

    /// Return `values` verbatim, whatever the request length.
    #[must_use]
    pub const fn with_values(values: Vec<f64>) -> Self {
        Self::from_response(StubElevations::Values(values))
    }

    /// Fail every non-empty request with `error`.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self::from_response(StubElevations::Error(error))
    }

    /// Number of requests served.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Size of the largest request served.
    #[must_use]
    pub fn largest_request(&self) -> usize {
        self.largest_request.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ElevationProvider for StubElevationProvider {
    #[expect(
        clippy::float_arithmetic,
        reason = "gradient elevations scale latitude"
    )]
    async fn get_elevations(&self, points: &[Coord<f64>]) -> Result<Vec<f64>, ProviderError> {
        if points.is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.largest_request.fetch_max(points.len(), Ordering::SeqCst);

        match &self.response {
            StubElevations::Constant(elevation) => Ok(vec![*elevation; points.len()]),
            StubElevations::Gradient {
                base_m,
                metres_per_degree,
            } => Ok(points
                .iter()
                .map(|point| base_m + metres_per_degree * point.y)
                .collect()),
            StubElevations::Values(values) => Ok(values.clone()),
            StubElevations::Error(error) => Err(error.clone()),
        }
    }
}

/// Stub `FeatureProvider` returning fixed elements or a fixed error.
#[derive(Debug)]
pub struct StubFeatureProvider {
    response: Result<Vec<FeatureElement>, ProviderError>,
    calls: AtomicUsize,
}

impl StubFeatureProvider {
    /// Create a provider that returns `elements` for every query.
    #[must_use]
    pub const fn with_elements(elements: Vec<FeatureElement>) -> Self {
        Self {
            response: Ok(elements),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider that fails every query with `error`.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of queries served.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureProvider for StubFeatureProvider {
    async fn get_features(
        &self,
        _query: &FeatureQuery,
    ) -> Result<Vec<FeatureElement>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// Build a straight candidate of `points` evenly spaced vertices.
///
/// The distance is the great-circle length of the polyline and the duration
/// assumes a steady walking pace. Fewer than two points collapses to the
/// two endpoints.
///
/// # Errors
/// Returns [`GeometryError`] when an endpoint is not a valid position.
#[expect(
    clippy::float_arithmetic,
    reason = "vertices are linear interpolations between endpoints"
)]
pub fn line_candidate(
    id: &str,
    start: Coord<f64>,
    end: Coord<f64>,
    points: u32,
) -> Result<RouteCandidate, GeometryError> {
    let segments = f64::from(points.max(2) - 1);
    let vertices: Vec<Coord<f64>> = (0..points.max(2))
        .map(|step| {
            let t = f64::from(step) / segments;
            Coord {
                x: start.x + (end.x - start.x) * t,
                y: start.y + (end.y - start.y) * t,
            }
        })
        .collect();
    let length: f64 = vertices
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(distance(*a, *b)),
            _ => None,
        })
        .sum();
    let geometry = PathGeometry::new(vertices)?;
    Ok(RouteCandidate::new(
        id,
        geometry,
        length,
        length / WALKING_SPEED_MPS,
    ))
}

/// A `highway=steps` way with vertices given as `(lat, lon)` pairs.
#[must_use]
pub fn steps_way(id: i64, vertices: &[(f64, f64)]) -> FeatureElement {
    FeatureElement::Way {
        id,
        tags: Tags::from([("highway".to_owned(), "steps".to_owned())]),
        geometry: Some(vertices.iter().map(|&(lat, lon)| [lat, lon]).collect()),
    }
}

/// A way carrying the given tags and no geometry.
#[must_use]
pub fn tagged_way(id: i64, tags: &[(&str, &str)]) -> FeatureElement {
    FeatureElement::Way {
        id,
        tags: tags
            .iter()
            .map(|&(key, value)| (key.to_owned(), value.to_owned()))
            .collect(),
        geometry: None,
    }
}
