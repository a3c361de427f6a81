//! Candidate and scored walking routes.

use serde::{Deserialize, Serialize};

use crate::elevation::{ElevationMetrics, ElevationProfile};
use crate::features::MapFeatureSummary;
use crate::geometry::PathGeometry;
use crate::scoring::ScoreCard;

/// A route as returned by a routing provider, before any scoring.
///
/// # Examples
/// ```
/// use stepfree_core::{PathGeometry, RouteCandidate};
///
/// # fn main() -> Result<(), stepfree_core::GeometryError> {
/// let geometry = PathGeometry::from_lat_lon([(51.5, -0.1), (51.501, -0.1)])?;
/// let candidate = RouteCandidate::new("route-1", geometry, 111.2, 80.0);
/// assert_eq!(candidate.id, "route-1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    /// Provider-assigned identifier such as `route-1` or `via-2`.
    pub id: String,
    /// Full-resolution route geometry.
    pub geometry: PathGeometry,
    /// Length reported by the provider in metres.
    pub distance_m: f64,
    /// Travel time reported by the provider in seconds.
    pub duration_s: f64,
}

impl RouteCandidate {
    /// Construct a candidate.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        geometry: PathGeometry,
        distance_m: f64,
        duration_s: f64,
    ) -> Self {
        Self {
            id: id.into(),
            geometry,
            distance_m,
            duration_s,
        }
    }
}

/// Location of a flight of steps projected onto a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepWarning {
    /// OSM way identifier of the steps.
    pub feature_id: i64,
    /// Latitude of the steps midpoint.
    pub lat: f64,
    /// Longitude of the steps midpoint.
    pub lon: f64,
    /// Distance from the route origin to the nearest profile point.
    pub distance_along_route_m: f64,
}

/// A scored route.
///
/// `feature_summary` is `None` until the route has been enriched, and
/// `step_warnings` is only present on an enriched route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Identifier carried over from the candidate.
    pub id: String,
    /// Full-resolution route geometry.
    pub geometry: PathGeometry,
    /// Length in metres.
    pub distance_m: f64,
    /// Travel time in seconds.
    pub duration_s: f64,
    /// Climb metrics over the downsampled profile.
    pub elevation_metrics: ElevationMetrics,
    /// Downsampled elevation profile.
    pub elevation_profile: ElevationProfile,
    /// Pedestrian feature summary, once fetched.
    pub feature_summary: Option<MapFeatureSummary>,
    /// Accessibility score; lower is better.
    pub accessibility_score: f64,
    /// Reasons behind the score.
    pub flags: Vec<String>,
    /// Steps located along the route, once enriched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_warnings: Option<Vec<StepWarning>>,
}

impl Route {
    /// Assemble a provisional route from a candidate and its elevation data.
    #[must_use]
    pub fn provisional(
        candidate: RouteCandidate,
        elevation_profile: ElevationProfile,
        elevation_metrics: ElevationMetrics,
        card: ScoreCard,
    ) -> Self {
        Self {
            id: candidate.id,
            geometry: candidate.geometry,
            distance_m: candidate.distance_m,
            duration_s: candidate.duration_s,
            elevation_metrics,
            elevation_profile,
            feature_summary: None,
            accessibility_score: card.score,
            flags: card.flags,
            step_warnings: None,
        }
    }

    /// Attach enrichment results, replacing the provisional score.
    pub fn enrich(
        &mut self,
        summary: MapFeatureSummary,
        card: ScoreCard,
        warnings: Vec<StepWarning>,
    ) {
        self.feature_summary = Some(summary);
        self.accessibility_score = card.score;
        self.flags = card.flags;
        self.step_warnings = Some(warnings);
    }

    /// Report whether feature enrichment has been applied.
    #[must_use]
    pub const fn is_enriched(&self) -> bool {
        self.feature_summary.is_some()
    }
}
