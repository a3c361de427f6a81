//! Elevation profiles and climb metrics for downsampled routes.
//!
//! Elevations are always supplied for a downsampled geometry, never for the
//! full-resolution path. Every function here expects `path` and `elevations`
//! to be parallel slices of equal length.

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{distance, round_to};

/// Segments at or below this horizontal length are treated as noise.
pub const MIN_SEGMENT_LENGTH_M: f64 = 5.0;
/// Slope above which a segment counts towards [`SteepDistance::gt5`].
pub const MODERATE_SLOPE_PERCENT: f64 = 5.0;
/// Slope above which a segment also counts towards [`SteepDistance::gt8`].
pub const STEEP_SLOPE_PERCENT: f64 = 8.0;

/// Errors raised while combining a path with its elevations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElevationError {
    /// The elevation list does not line up with the sampled points.
    #[error("expected {points} elevations but received {elevations}")]
    LengthMismatch {
        /// Number of sampled coordinates.
        points: usize,
        /// Number of elevations returned.
        elevations: usize,
    },
}

/// One sampled point along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Position within the downsampled path.
    pub index: usize,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Elevation in metres, rounded to one decimal place.
    pub elevation_m: f64,
    /// Great-circle distance from the first point, rounded to one decimal.
    pub cumulative_distance_m: f64,
}

/// Ordered elevation samples with cumulative distances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElevationProfile {
    points: Vec<ProfilePoint>,
}

impl ElevationProfile {
    /// Borrow the profile records in travel order.
    #[must_use]
    pub const fn points(&self) -> &[ProfilePoint] {
        self.points.as_slice()
    }

    /// Number of profile records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Report whether the profile holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cumulative distance of the profile point closest to `location`.
    ///
    /// See [`nearest_profile_distance`].
    #[must_use]
    pub fn nearest_distance(&self, location: Coord<f64>) -> Option<f64> {
        nearest_profile_distance(self, location.y, location.x)
    }
}

/// Distance thresholds of steep travel, in metres.
///
/// The buckets are cumulative: a segment steeper than 8 % counts towards both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SteepDistance {
    /// Distance travelled on slopes steeper than 5 %.
    pub gt5: f64,
    /// Distance travelled on slopes steeper than 8 %.
    pub gt8: f64,
}

/// Aggregate climb statistics for a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationMetrics {
    /// Total climb in metres.
    pub ascent_m: f64,
    /// Total drop in metres, as a positive number.
    pub descent_m: f64,
    /// Steepest segment slope, in percent.
    pub max_slope_percent: f64,
    /// Distance spent on steep segments.
    pub steep_distance_m: SteepDistance,
}

fn ensure_parallel(path: &[Coord<f64>], elevations: &[f64]) -> Result<(), ElevationError> {
    if path.len() == elevations.len() {
        Ok(())
    } else {
        Err(ElevationError::LengthMismatch {
            points: path.len(),
            elevations: elevations.len(),
        })
    }
}

/// Build an [`ElevationProfile`] from a downsampled path and its elevations.
///
/// # Errors
/// Returns [`ElevationError::LengthMismatch`] when the slices differ in length.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stepfree_core::elevation::build_elevation_profile;
///
/// let path = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.001, y: 0.0 }];
/// let profile = build_elevation_profile(&path, &[10.04, 12.0])?;
/// assert_eq!(profile.points()[0].elevation_m, 10.0);
/// assert_eq!(profile.points()[1].cumulative_distance_m, 111.2);
/// # Ok::<(), stepfree_core::elevation::ElevationError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "cumulative distance is a running float sum"
)]
pub fn build_elevation_profile(
    path: &[Coord<f64>],
    elevations: &[f64],
) -> Result<ElevationProfile, ElevationError> {
    ensure_parallel(path, elevations)?;

    let mut cumulative = 0.0;
    let mut previous: Option<Coord<f64>> = None;
    let points = path
        .iter()
        .zip(elevations)
        .enumerate()
        .map(|(index, (&point, &elevation))| {
            if let Some(prev) = previous {
                cumulative += distance(prev, point);
            }
            previous = Some(point);
            ProfilePoint {
                index,
                lat: point.y,
                lon: point.x,
                elevation_m: round_to(elevation, 1),
                cumulative_distance_m: round_to(cumulative, 1),
            }
        })
        .collect();

    Ok(ElevationProfile { points })
}

/// Summarise climb, descent and steepness over a downsampled path.
///
/// Segments no longer than [`MIN_SEGMENT_LENGTH_M`] are ignored so that GPS
/// jitter between near-identical samples does not register as a cliff.
///
/// # Errors
/// Returns [`ElevationError::LengthMismatch`] when the slices differ in length.
#[expect(
    clippy::float_arithmetic,
    reason = "slope and climb accumulation are float computations"
)]
pub fn compute_elevation_metrics(
    path: &[Coord<f64>],
    elevations: &[f64],
) -> Result<ElevationMetrics, ElevationError> {
    ensure_parallel(path, elevations)?;

    let mut ascent = 0.0;
    let mut descent = 0.0;
    let mut max_slope: f64 = 0.0;
    let mut gt5 = 0.0;
    let mut gt8 = 0.0;

    for (points, heights) in path.windows(2).zip(elevations.windows(2)) {
        let ([from, to], [z_from, z_to]) = (points, heights) else {
            continue;
        };
        let horizontal = distance(*from, *to);
        if horizontal <= MIN_SEGMENT_LENGTH_M {
            continue;
        }

        let dz = z_to - z_from;
        if dz > 0.0 {
            ascent += dz;
        } else {
            descent += dz.abs();
        }

        let slope = dz.abs() / horizontal * 100.0;
        max_slope = max_slope.max(slope);
        if slope > MODERATE_SLOPE_PERCENT {
            gt5 += horizontal;
        }
        if slope > STEEP_SLOPE_PERCENT {
            gt8 += horizontal;
        }
    }

    Ok(ElevationMetrics {
        ascent_m: round_to(ascent, 1),
        descent_m: round_to(descent, 1),
        max_slope_percent: round_to(max_slope, 2),
        steep_distance_m: SteepDistance {
            gt5: round_to(gt5, 1),
            gt8: round_to(gt8, 1),
        },
    })
}

/// Project a location onto a profile by nearest sampled point.
///
/// Returns the cumulative distance of the closest profile point; the first
/// point wins on exact ties. `None` is returned for an empty profile.
#[must_use]
pub fn nearest_profile_distance(profile: &ElevationProfile, lat: f64, lon: f64) -> Option<f64> {
    let target = Coord { x: lon, y: lat };
    let mut best: Option<(f64, f64)> = None;
    for point in &profile.points {
        let gap = distance(Coord { x: point.lon, y: point.lat }, target);
        match best {
            Some((best_gap, _)) if gap >= best_gap => {}
            _ => best = Some((gap, point.cumulative_distance_m)),
        }
    }
    best.map(|(_, along)| along)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    /// Points spaced 0.001° of longitude apart on the equator (~111.2 m).
    #[fixture]
    fn equator_path() -> Vec<Coord<f64>> {
        (0..4)
            .map(|i| Coord {
                x: 0.001 * f64::from(i),
                y: 0.0,
            })
            .collect()
    }

    #[rstest]
    fn profile_rejects_length_mismatch(equator_path: Vec<Coord<f64>>) {
        let err = build_elevation_profile(&equator_path, &[1.0, 2.0])
            .expect_err("mismatched lengths must fail");
        assert_eq!(
            err,
            ElevationError::LengthMismatch {
                points: 4,
                elevations: 2
            }
        );
    }

    #[rstest]
    fn profile_accumulates_distance(equator_path: Vec<Coord<f64>>) {
        let profile = build_elevation_profile(&equator_path, &[0.0, 1.0, 2.0, 3.0])
            .expect("profile should build");
        let distances: Vec<f64> = profile
            .points()
            .iter()
            .map(|p| p.cumulative_distance_m)
            .collect();
        assert_eq!(distances, vec![0.0, 111.2, 222.4, 333.6]);
        assert_eq!(profile.points()[3].index, 3);
        assert_eq!(profile.points()[3].lon, 0.003);
    }

    #[rstest]
    fn metrics_for_steady_climb(equator_path: Vec<Coord<f64>>) {
        // 6.0 m over ~111.2 m is ~5.4 %: steeper than 5 % but not 8 %.
        let metrics = compute_elevation_metrics(&equator_path, &[0.0, 6.0, 12.0, 18.0])
            .expect("metrics should compute");
        assert_eq!(metrics.ascent_m, 18.0);
        assert_eq!(metrics.descent_m, 0.0);
        assert_eq!(metrics.max_slope_percent, 5.4);
        assert_eq!(metrics.steep_distance_m.gt5, 333.6);
        assert_eq!(metrics.steep_distance_m.gt8, 0.0);
    }

    #[rstest]
    fn steep_buckets_are_cumulative(equator_path: Vec<Coord<f64>>) {
        // 10 m over ~111.2 m is ~9 %, counting towards both buckets.
        let metrics = compute_elevation_metrics(&equator_path, &[0.0, 10.0, 10.0, 0.0])
            .expect("metrics should compute");
        assert_eq!(metrics.ascent_m, 10.0);
        assert_eq!(metrics.descent_m, 10.0);
        assert_eq!(metrics.steep_distance_m.gt5, 222.4);
        assert_eq!(metrics.steep_distance_m.gt8, 222.4);
        assert_eq!(metrics.max_slope_percent, 8.99);
    }

    #[rstest]
    fn short_segments_are_ignored() {
        // 0.00002° of longitude is ~2.2 m, below the noise threshold.
        let path = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.000_02, y: 0.0 }];
        let metrics = compute_elevation_metrics(&path, &[0.0, 3.0]).expect("metrics");
        assert_eq!(metrics, ElevationMetrics::default());
    }

    #[rstest]
    fn metrics_reject_length_mismatch(equator_path: Vec<Coord<f64>>) {
        assert!(compute_elevation_metrics(&equator_path, &[]).is_err());
    }

    #[rstest]
    fn nearest_distance_picks_closest_point(equator_path: Vec<Coord<f64>>) {
        let profile =
            build_elevation_profile(&equator_path, &[0.0; 4]).expect("profile should build");
        let along = nearest_profile_distance(&profile, 0.0001, 0.0021);
        assert_eq!(along, Some(222.4));
    }

    #[rstest]
    fn nearest_distance_prefers_first_on_ties() {
        let path = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 0.001, y: 0.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        let profile = build_elevation_profile(&path, &[0.0; 3]).expect("profile should build");
        assert_eq!(profile.nearest_distance(Coord { x: 0.0, y: 0.0 }), Some(0.0));
    }

    #[rstest]
    fn nearest_distance_on_empty_profile_is_none() {
        assert_eq!(
            nearest_profile_distance(&ElevationProfile::default(), 0.0, 0.0),
            None
        );
    }
}
