//! Provider traits for routing, elevation and feature lookups.

use async_trait::async_trait;
use geo::Coord;

use super::error::ProviderError;
use crate::features::{FeatureElement, FeatureQuery};
use crate::route::RouteCandidate;

/// Fetch alternative walking routes between two coordinates.
///
/// Implementations return candidates in provider order; the comparator
/// relies on that order to break score ties.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use geo::Coord;
/// use stepfree_core::{PathGeometry, ProviderError, RouteCandidate, RoutingProvider};
///
/// struct StraightLine;
///
/// #[async_trait]
/// impl RoutingProvider for StraightLine {
///     async fn get_alternatives(
///         &self,
///         origin: Coord<f64>,
///         destination: Coord<f64>,
///     ) -> Result<Vec<RouteCandidate>, ProviderError> {
///         let geometry = PathGeometry::new(vec![origin, destination])
///             .map_err(|err| ProviderError::ParseError { message: err.to_string() })?;
///         Ok(vec![RouteCandidate::new("route-1", geometry, 100.0, 72.0)])
///     }
/// }
/// ```
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Return candidate routes from `origin` to `destination`.
    ///
    /// An empty vector means the provider found no route.
    async fn get_alternatives(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RouteCandidate>, ProviderError>;
}

/// Look up terrain elevations for a set of coordinates.
#[async_trait]
pub trait ElevationProvider: Send + Sync {
    /// Return one elevation in metres per input point, in input order.
    ///
    /// Implementations should return `Err(ProviderError::EmptyInput)` when
    /// `points` is empty. The comparator rejects responses whose length
    /// differs from the request.
    async fn get_elevations(&self, points: &[Coord<f64>]) -> Result<Vec<f64>, ProviderError>;
}

/// Run a polygon query for pedestrian-relevant map features.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    /// Return the tagged elements matched by `query`.
    async fn get_features(&self, query: &FeatureQuery)
    -> Result<Vec<FeatureElement>, ProviderError>;
}
