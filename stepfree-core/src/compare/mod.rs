//! Two-phase route comparison.
//!
//! [`RouteComparator`] ranks candidate routes cheaply from distance and
//! elevation, then spends one feature lookup on the leader and re-ranks. The
//! phases are modelled by [`Comparison`]; a failed enrichment leaves the
//! provisional ranking intact.

mod comparator;
mod error;

pub use comparator::{ComparatorConfig, Comparison, ELEVATION_MAX_POINTS, RouteComparator};
pub use error::{CompareError, EnrichError};
