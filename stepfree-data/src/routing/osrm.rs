//! OSRM API response types for the Route service.
//!
//! Requests ask for `geometries=geojson`, so each route carries a GeoJSON
//! `LineString` whose coordinates are `[lon, lat]` pairs.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use geo::Coord;
use serde::Deserialize;
use stepfree_core::{GeometryError, PathGeometry, RouteCandidate};

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Routes in OSRM preference order.
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route from an OSRM response.
#[derive(Debug, Deserialize)]
pub struct RouteDto {
    /// Length in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// GeoJSON geometry.
    pub geometry: LineStringDto,
}

/// GeoJSON `LineString`.
#[derive(Debug, Deserialize)]
pub struct LineStringDto {
    /// `[lon, lat]` positions.
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteDto {
    /// Convert into a candidate with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when the route carries no coordinates or a
    /// non-finite position.
    pub fn into_candidate(self, id: String) -> Result<RouteCandidate, GeometryError> {
        let points = self
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coord { x: lon, y: lat })
            .collect();
        let geometry = PathGeometry::new(points)?;
        Ok(RouteCandidate::new(
            id,
            geometry,
            self.distance,
            self.duration,
        ))
    }
}
