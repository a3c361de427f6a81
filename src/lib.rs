//! Facade crate for the step-free route comparison engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP provider
//! adapters behind the `http` feature flag.

#![forbid(unsafe_code)]

pub use stepfree_core::{
    ComparatorConfig, CompareError, ElevationMetrics, ElevationProfile, ElevationProvider,
    EnrichError, FeatureElement, FeatureProvider, FeatureQuery, MapFeatureSummary, PathGeometry,
    ProviderError, Route, RouteCandidate, RouteComparator, RoutingProvider, ScoringWeights,
    StepWarning,
};

#[cfg(feature = "http")]
pub use stepfree_data::{
    HttpElevationProvider, HttpProviderConfig, HttpRoutingProvider, HttpRoutingProviderConfig,
    OverpassFeatureProvider, ProviderBuildError,
};
