//! Map-feature queries and tag aggregation along a route.
//!
//! A [`FeatureQuery`] describes a polygon around a coarsely sampled route and
//! the pedestrian-relevant elements to select inside it. Providers answer it
//! with [`FeatureElement`] values, which [`aggregate_features`] reduces into a
//! [`MapFeatureSummary`].

use std::collections::BTreeMap;

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::geometry::{downsample, round_to};

/// Point budget for feature-query polygons.
///
/// Polygon queries are far more expensive per vertex than elevation lookups,
/// so this stays well below [`crate::compare::ELEVATION_MAX_POINTS`].
pub const FEATURE_QUERY_MAX_POINTS: usize = 20;

/// Highway classifications a pedestrian route can plausibly use.
pub const PEDESTRIAN_HIGHWAYS: [&str; 8] = [
    "footway",
    "path",
    "pedestrian",
    "steps",
    "living_street",
    "residential",
    "service",
    "unclassified",
];

/// Free-form OSM tags keyed by tag name.
pub type Tags = BTreeMap<String, String>;

/// A tagged element returned by a feature provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeatureElement {
    /// A point feature such as a kerb or crossing.
    Node {
        /// OSM node identifier.
        id: i64,
        /// Latitude in decimal degrees.
        lat: f64,
        /// Longitude in decimal degrees.
        lon: f64,
        /// Element tags.
        #[serde(default)]
        tags: Tags,
    },
    /// A linear feature such as a footway or flight of steps.
    Way {
        /// OSM way identifier.
        id: i64,
        /// Element tags.
        #[serde(default)]
        tags: Tags,
        /// Vertex geometry, when the provider returned it.
        #[serde(default)]
        geometry: Option<Vec<[f64; 2]>>,
    },
}

impl FeatureElement {
    /// Borrow the element tags.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        match self {
            Self::Node { tags, .. } | Self::Way { tags, .. } => tags,
        }
    }
}

/// Polygon query for pedestrian features around a route.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureQuery {
    polygon: Vec<Coord<f64>>,
}

impl FeatureQuery {
    /// Vertices of the query polygon, in route order.
    #[must_use]
    pub const fn polygon(&self) -> &[Coord<f64>] {
        self.polygon.as_slice()
    }

    /// Render the polygon as an Overpass `poly` filter value (`"lat lon ..."`).
    #[must_use]
    pub fn poly_filter(&self) -> String {
        self.polygon
            .iter()
            .map(|point| format!("{} {}", point.y, point.x))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render the query as Overpass QL.
    ///
    /// Ways are returned with `out body geom;` so step segments carry their
    /// vertex geometry.
    #[must_use]
    pub fn to_overpass_ql(&self, timeout_secs: u64) -> String {
        let poly = self.poly_filter();
        let highways = PEDESTRIAN_HIGHWAYS.join("|");
        let mut ql = format!("[out:json][timeout:{timeout_secs}];\n(\n");
        ql.push_str(&format!(
            "  way[\"highway\"~\"^({highways})$\"](poly:\"{poly}\");\n"
        ));
        for filter in [
            "[\"kerb\"]",
            "[\"curb\"]",
            "[\"barrier\"=\"kerb\"]",
            "[\"highway\"=\"crossing\"]",
            "[\"tactile_paving\"]",
        ] {
            ql.push_str(&format!("  node{filter}(poly:\"{poly}\");\n"));
        }
        ql.push_str(");\nout body geom;\n");
        ql
    }
}

/// Build the feature query for a full-resolution route geometry.
///
/// The path is stride-sampled to [`FEATURE_QUERY_MAX_POINTS`] before it
/// becomes the query polygon.
#[must_use]
pub fn build_feature_query(path: &[Coord<f64>]) -> FeatureQuery {
    FeatureQuery {
        polygon: downsample(path, FEATURE_QUERY_MAX_POINTS),
    }
}

/// A flight of steps found near a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepsWay {
    /// OSM way identifier.
    pub feature_id: i64,
    /// Vertices of the way as `[lat, lon]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

impl StepsWay {
    /// Vertices as `geo` coordinates (`x = lon`, `y = lat`).
    #[must_use]
    pub fn coords(&self) -> Vec<Coord<f64>> {
        self.geometry
            .iter()
            .map(|&[lat, lon]| Coord { x: lon, y: lat })
            .collect()
    }
}

/// Tag counts for the pedestrian features around a route.
///
/// A summary that exists but [`is_empty`](Self::is_empty) means the lookup
/// ran and matched nothing, which is distinct from a lookup that never ran
/// (`Option::None` at the call site).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFeatureSummary {
    /// Number of `highway=steps` ways.
    pub steps_count: u32,
    /// Geometries of step ways that carried vertex data.
    pub steps_ways: Vec<StepsWay>,
    /// `surface` values and their way counts.
    pub surfaces: BTreeMap<String, u32>,
    /// `smoothness` values and their way counts.
    pub smoothness: BTreeMap<String, u32>,
    /// `sidewalk` values and their way counts.
    pub sidewalk: BTreeMap<String, u32>,
    /// `highway` values and their way counts.
    pub highway_types: BTreeMap<String, u32>,
    /// `wheelchair` values and their way counts.
    pub wheelchair_tags: BTreeMap<String, u32>,
    /// `incline` values and their way counts.
    pub inclines: BTreeMap<String, u32>,
    /// Ways with a `highway` tag.
    pub total_way_count: u32,
    /// Ways with both `highway` and `surface` tags.
    pub known_surface_way_count: u32,
    /// Fraction of counted ways without surface data, rounded to 2 dp.
    pub unknown_surface_ratio: f64,
    /// Nodes tagged as kerbs.
    pub kerb_nodes_count: u32,
    /// Nodes tagged `highway=crossing`.
    pub crossing_nodes_count: u32,
    /// Nodes carrying a `tactile_paving` tag.
    pub tactile_paving_nodes_count: u32,
}

impl MapFeatureSummary {
    /// Report whether the lookup matched no relevant ways or nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_way_count == 0
            && self.kerb_nodes_count == 0
            && self.crossing_nodes_count == 0
            && self.tactile_paving_nodes_count == 0
    }

    fn record_node(&mut self, tags: &Tags) {
        let is_kerb = tags.contains_key("kerb")
            || tags.contains_key("curb")
            || tags.get("barrier").is_some_and(|value| value == "kerb");
        if is_kerb {
            self.kerb_nodes_count += 1;
        }
        if tags.get("highway").is_some_and(|value| value == "crossing") {
            self.crossing_nodes_count += 1;
        }
        if tags.contains_key("tactile_paving") {
            self.tactile_paving_nodes_count += 1;
        }
    }

    fn record_way(&mut self, id: i64, tags: &Tags, geometry: Option<&Vec<[f64; 2]>>) {
        let Some(highway) = tags.get("highway") else {
            return;
        };
        self.total_way_count += 1;
        tally(&mut self.highway_types, Some(highway));

        if highway == "steps" {
            self.steps_count += 1;
            if let Some(vertices) = geometry.filter(|vertices| !vertices.is_empty()) {
                self.steps_ways.push(StepsWay {
                    feature_id: id,
                    geometry: vertices.clone(),
                });
            }
        }

        let surface = tags.get("surface");
        if surface.is_some() {
            self.known_surface_way_count += 1;
        }
        tally(&mut self.surfaces, surface);
        tally(&mut self.smoothness, tags.get("smoothness"));
        tally(&mut self.sidewalk, tags.get("sidewalk"));
        tally(&mut self.wheelchair_tags, tags.get("wheelchair"));
        tally(&mut self.inclines, tags.get("incline"));
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "ratio of counted ways is a float quotient"
    )]
    fn finish(mut self) -> Self {
        self.unknown_surface_ratio = if self.total_way_count == 0 {
            0.0
        } else {
            let known = f64::from(self.known_surface_way_count);
            let total = f64::from(self.total_way_count);
            round_to(1.0 - known / total, 2)
        };
        self
    }
}

fn tally(counts: &mut BTreeMap<String, u32>, value: Option<&String>) {
    if let Some(value) = value {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
}

/// Reduce provider elements into a [`MapFeatureSummary`].
///
/// Ways without a `highway` tag are skipped and do not count towards any
/// total. A single node may increment several node counters.
///
/// # Examples
/// ```
/// use stepfree_core::features::{FeatureElement, Tags, aggregate_features};
///
/// let steps = FeatureElement::Way {
///     id: 7,
///     tags: Tags::from([("highway".into(), "steps".into())]),
///     geometry: Some(vec![[51.5, -0.1], [51.5001, -0.1]]),
/// };
/// let summary = aggregate_features(&[steps]);
/// assert_eq!(summary.steps_count, 1);
/// assert_eq!(summary.unknown_surface_ratio, 1.0);
/// ```
#[must_use]
pub fn aggregate_features(elements: &[FeatureElement]) -> MapFeatureSummary {
    elements
        .iter()
        .fold(MapFeatureSummary::default(), |mut summary, element| {
            match element {
                FeatureElement::Node { tags, .. } => summary.record_node(tags),
                FeatureElement::Way { id, tags, geometry } => {
                    summary.record_way(*id, tags, geometry.as_ref());
                }
            }
            summary
        })
        .finish()
}
