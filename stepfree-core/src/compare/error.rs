use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that abort a route comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// The routing provider failed.
    #[error("routing provider failed: {0}")]
    Routing(#[source] ProviderError),
    /// The elevation provider failed for one candidate.
    #[error("elevation lookup failed for route {route_id}: {source}")]
    Elevation {
        /// Candidate whose lookup failed.
        route_id: String,
        /// Underlying provider error.
        #[source]
        source: ProviderError,
    },
    /// The elevation provider returned the wrong number of values.
    #[error("elevation lookup for route {route_id} returned {received} values for {requested} points")]
    ElevationCount {
        /// Candidate whose lookup was malformed.
        route_id: String,
        /// Number of points sent.
        requested: usize,
        /// Number of elevations received.
        received: usize,
    },
    /// The routing provider returned no candidates.
    #[error("no routes found")]
    NoRouteFound,
}

impl CompareError {
    /// Report whether the failure lies with an upstream service.
    ///
    /// Callers exposing the comparator over a network boundary map these
    /// to a bad-gateway style response; [`CompareError::NoRouteFound`] is an
    /// ordinary empty result.
    #[must_use]
    pub const fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Routing(_) | Self::Elevation { .. } | Self::ElevationCount { .. }
        )
    }
}

/// Errors returned by feature enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichError {
    /// The geometry is too short to describe a route.
    #[error("geometry must contain at least 2 points, got {count}")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
    },
    /// The feature provider failed.
    #[error("feature provider failed: {0}")]
    Provider(#[from] ProviderError),
}
