//! Request and response bodies for the Open-Elevation lookup API.
//!
//! See: <https://github.com/Jorl17/open-elevation/blob/master/docs/api.md>

use geo::Coord;
use serde::{Deserialize, Serialize};

/// `POST /api/v1/lookup` request body.
#[derive(Debug, Serialize)]
pub(super) struct LookupRequestDto {
    pub(super) locations: Vec<LocationDto>,
}

#[derive(Debug, Serialize)]
pub(super) struct LocationDto {
    pub(super) latitude: f64,
    pub(super) longitude: f64,
}

impl LookupRequestDto {
    pub(super) fn from_points(points: &[Coord<f64>]) -> Self {
        Self {
            locations: points
                .iter()
                .map(|point| LocationDto {
                    latitude: point.y,
                    longitude: point.x,
                })
                .collect(),
        }
    }
}

/// `POST /api/v1/lookup` response body.
#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    #[serde(default)]
    pub(super) results: Vec<ElevationResultDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ElevationResultDto {
    pub(super) elevation: f64,
}

impl LookupResponseDto {
    pub(super) fn into_elevations(self) -> Vec<f64> {
        self.results
            .into_iter()
            .map(|result| result.elevation)
            .collect()
    }
}
