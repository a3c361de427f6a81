//! Great-circle distances and stride downsampling for route geometries.
//!
//! Coordinates are WGS84 `geo::Coord` values with `x = longitude` and
//! `y = latitude`. At serialisation boundaries a [`PathGeometry`] is written
//! as a list of `[lat, lon]` pairs, matching what routing front ends expect.

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in metres used for haversine distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres between two coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stepfree_core::geometry::distance;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 0.0, y: 1.0 };
/// let metres = distance(a, b);
/// assert!((metres - 111_194.9).abs() < 1.0);
/// assert_eq!(distance(a, a), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "haversine distance is floating-point trigonometry"
)]
#[must_use]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `h` fractionally outside [0, 1] for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_M * c
}

/// Reduce `path` to at most `max_points + 1` coordinates by fixed-stride
/// sampling.
///
/// Paths already within budget are returned unchanged. Otherwise the stride
/// is `len / max_points` (at least one), the first `max_points` strided
/// samples are kept starting from the origin, and the final point is appended
/// when the stride misses it. A budget of zero behaves like a budget of one.
/// Re-applying the function with a budget of `max_points + 1` is a no-op.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stepfree_core::geometry::downsample;
///
/// let path: Vec<_> = (0..10).map(|i| Coord { x: f64::from(i), y: 0.0 }).collect();
/// let sampled = downsample(&path, 4);
/// assert_eq!(sampled.len(), 5);
/// assert_eq!(sampled.last(), path.last());
/// ```
#[must_use]
pub fn downsample(path: &[Coord<f64>], max_points: usize) -> Vec<Coord<f64>> {
    let budget = max_points.max(1);
    if path.len() <= budget {
        return path.to_vec();
    }

    let stride = path.len().div_euclid(budget).max(1);
    let mut sampled: Vec<Coord<f64>> = path.iter().step_by(stride).take(budget).copied().collect();
    let last_sampled_index = stride * (sampled.len().saturating_sub(1));
    if let Some(&last) = path.last()
        && last_sampled_index != path.len() - 1
    {
        sampled.push(last);
    }
    sampled
}

/// Arithmetic mean of a set of vertices, or `None` when `points` is empty.
#[expect(
    clippy::float_arithmetic,
    reason = "averaging coordinates requires float division"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "vertex counts are far below f64 mantissa precision"
)]
#[must_use]
pub fn midpoint(points: &[Coord<f64>]) -> Option<Coord<f64>> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), point| (x + point.x, y + point.y));
    Some(Coord {
        x: sum_x / count,
        y: sum_y / count,
    })
}

/// Round `value` to `places` decimal places, halves away from zero.
#[expect(
    clippy::float_arithmetic,
    reason = "decimal rounding scales by a power of ten"
)]
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

/// Errors returned by [`PathGeometry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// No coordinates were supplied.
    #[error("path geometry must contain at least one coordinate")]
    Empty,
    /// A coordinate was non-finite or outside the WGS84 range.
    #[error("coordinate at index {index} is not a valid WGS84 position")]
    InvalidCoordinate {
        /// Position of the offending coordinate.
        index: usize,
    },
}

/// An ordered, non-empty polyline from an origin to a destination.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stepfree_core::PathGeometry;
///
/// # fn main() -> Result<(), stepfree_core::GeometryError> {
/// let path = PathGeometry::new(vec![
///     Coord { x: -0.1276, y: 51.5072 },
///     Coord { x: -0.1280, y: 51.5080 },
/// ])?;
/// assert_eq!(path.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct PathGeometry {
    points: Vec<Coord<f64>>,
}

impl PathGeometry {
    /// Validate and construct a [`PathGeometry`].
    ///
    /// # Errors
    /// Returns [`GeometryError::Empty`] for an empty list and
    /// [`GeometryError::InvalidCoordinate`] for non-finite or out-of-range
    /// positions.
    pub fn new(points: Vec<Coord<f64>>) -> Result<Self, GeometryError> {
        if points.is_empty() {
            return Err(GeometryError::Empty);
        }
        if let Some(index) = points.iter().position(|point| !is_valid_position(*point)) {
            return Err(GeometryError::InvalidCoordinate { index });
        }
        Ok(Self { points })
    }

    /// Construct a geometry from `(lat, lon)` pairs.
    ///
    /// # Errors
    /// Same as [`PathGeometry::new`].
    pub fn from_lat_lon<I>(pairs: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(lat, lon)| Coord { x: lon, y: lat })
                .collect(),
        )
    }

    /// Borrow the coordinates in travel order.
    #[must_use]
    pub const fn points(&self) -> &[Coord<f64>] {
        self.points.as_slice()
    }

    /// Number of coordinates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Report whether the geometry has no coordinates; never true once constructed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Stride-sample the geometry to at most `max_points + 1` coordinates.
    #[must_use]
    pub fn downsample(&self, max_points: usize) -> Vec<Coord<f64>> {
        downsample(&self.points, max_points)
    }
}

fn is_valid_position(point: Coord<f64>) -> bool {
    point.x.is_finite()
        && point.y.is_finite()
        && (-180.0..=180.0).contains(&point.x)
        && (-90.0..=90.0).contains(&point.y)
}

impl TryFrom<Vec<[f64; 2]>> for PathGeometry {
    type Error = GeometryError;

    fn try_from(pairs: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::from_lat_lon(pairs.into_iter().map(|[lat, lon]| (lat, lon)))
    }
}

impl From<PathGeometry> for Vec<[f64; 2]> {
    fn from(path: PathGeometry) -> Self {
        path.points
            .into_iter()
            .map(|point| [point.y, point.x])
            .collect()
    }
}
