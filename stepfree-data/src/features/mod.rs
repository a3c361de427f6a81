//! Overpass-backed map-feature provider.

mod overpass;
mod provider;

pub use provider::{DEFAULT_FEATURE_TIMEOUT, OverpassFeatureProvider};
