//! HTTP adapters for the step-free route comparison engine.
//!
//! Responsibilities:
//! - Implement the `stepfree-core` provider traits against public services:
//!   OSRM for routing, Open-Elevation for terrain and Overpass for map
//!   features.
//! - Translate wire formats into core domain types and transport failures
//!   into `ProviderError` values.
//!
//! Boundaries:
//! - Do not encode scoring or ranking rules (live in `stepfree-core`).
//! - No retries; each provider owns one client with a fixed timeout.
//!
//! Invariants:
//! - Positions cross the wire in the order each service expects and are
//!   converted back to `geo::Coord` (`x = lon`, `y = lat`) at the boundary.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod elevation;
pub mod features;
mod http;
pub mod routing;

pub use elevation::HttpElevationProvider;
pub use features::{DEFAULT_FEATURE_TIMEOUT, OverpassFeatureProvider};
pub use http::{DEFAULT_USER_AGENT, HttpProviderConfig, ProviderBuildError};
pub use routing::{HttpRoutingProvider, HttpRoutingProviderConfig};
