//! Upstream data providers used by the route comparator.
//!
//! Three asynchronous traits abstract the services a comparison depends on:
//! [`RoutingProvider`] for candidate routes, [`ElevationProvider`] for
//! terrain heights and [`FeatureProvider`] for tagged map features. All of
//! them report failures as [`ProviderError`].
//!
//! Implementations backed by HTTP services live in the `stepfree-data`
//! crate. Deterministic doubles are available behind the `test-support`
//! feature.

mod error;
mod traits;

pub use error::ProviderError;
pub use traits::{ElevationProvider, FeatureProvider, RoutingProvider};
