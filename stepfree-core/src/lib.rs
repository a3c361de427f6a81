//! Core domain logic for comparing walking routes by accessibility.
//!
//! Candidate routes come from a [`RoutingProvider`]. Each one is scored from
//! its length and an elevation profile built over a downsampled copy of its
//! geometry. The leading route is then enriched with pedestrian map features
//! (steps, surfaces, kerbs) and the set is re-ranked.
//!
//! Providers are traits so the comparison logic runs unchanged against HTTP
//! services or the deterministic doubles in [`test_support`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod compare;
pub mod elevation;
pub mod features;
pub mod geometry;
pub mod provider;
pub mod route;
pub mod scoring;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use compare::{
    ComparatorConfig, CompareError, Comparison, ELEVATION_MAX_POINTS, EnrichError,
    RouteComparator,
};
pub use elevation::{ElevationError, ElevationMetrics, ElevationProfile, ProfilePoint};
pub use features::{FeatureElement, FeatureQuery, MapFeatureSummary, StepsWay};
pub use geometry::{GeometryError, PathGeometry};
pub use provider::{ElevationProvider, FeatureProvider, ProviderError, RoutingProvider};
pub use route::{Route, RouteCandidate, StepWarning};
pub use scoring::{ScoreCard, ScoringWeights};
