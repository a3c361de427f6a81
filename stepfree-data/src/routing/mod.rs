//! OSRM-backed routing provider.
//!
//! [`HttpRoutingProvider`] implements [`stepfree_core::RoutingProvider`] on
//! top of the OSRM Route API. Positions cross the wire as `lon,lat` pairs and
//! GeoJSON geometries are flipped back into `geo::Coord` values.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use stepfree_data::HttpProviderConfig;
//! use stepfree_data::routing::{HttpRoutingProvider, HttpRoutingProviderConfig};
//!
//! let config = HttpRoutingProviderConfig::from_http(
//!     HttpProviderConfig::new("http://localhost:5000").with_timeout(Duration::from_secs(10)),
//! )
//! .with_profile("foot");
//! let provider = HttpRoutingProvider::with_config(config)?;
//! # Ok::<(), stepfree_data::ProviderBuildError>(())
//! ```

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_DETOUR_OFFSETS, DEFAULT_PROFILE, HttpRoutingProvider, HttpRoutingProviderConfig,
};
