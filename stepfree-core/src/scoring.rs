//! Accessibility scoring for candidate routes.
//!
//! Lower scores are more accessible. The base score blends distance and
//! climb; fixed penalties are then added for steps, rough surfaces and
//! incomplete surface data. Penalties are policy constants, not learned
//! weights, and live in [`ScoringWeights`] so they can be tuned or tested on
//! their own.

use serde::{Deserialize, Serialize};

use crate::elevation::ElevationMetrics;
use crate::features::MapFeatureSummary;
use crate::geometry::round_to;

/// Flag raised when a route was scored before feature data was fetched.
pub const FLAG_FEATURES_NOT_FETCHED: &str = "feature data not fetched (performance mode)";
/// Flag raised when a feature lookup ran but matched nothing.
pub const FLAG_FEATURES_EMPTY: &str = "feature data fetched but no tags found";
/// Flag raised when too many ways lack a surface tag.
pub const FLAG_SURFACE_INCOMPLETE: &str = "Surface data incomplete";

/// Surface values treated as rough for wheeled or unsteady travel.
pub const ROUGH_SURFACES: [&str; 7] = [
    "gravel",
    "ground",
    "dirt",
    "mud",
    "sand",
    "unpaved",
    "cobblestone",
];

/// Weights and penalties applied by [`score_route`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Multiplier applied to the route length in kilometres.
    pub per_km: f64,
    /// Multiplier applied to total ascent in metres.
    pub per_ascent_m: f64,
    /// Multiplier applied to metres travelled on slopes steeper than 8 %.
    pub per_steep_gt8_m: f64,
    /// Multiplier applied to the maximum slope percentage.
    pub per_max_slope_percent: f64,
    /// Additive penalty when the route contains steps.
    pub steps_penalty: f64,
    /// Additive penalty when any rough surface is present.
    pub rough_surface_penalty: f64,
    /// Additive penalty when surface data is incomplete.
    pub unknown_surface_penalty: f64,
    /// Unknown-surface ratio at or above which the incomplete penalty applies.
    pub unknown_surface_threshold: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            per_km: 0.8,
            per_ascent_m: 0.12,
            per_steep_gt8_m: 0.03,
            per_max_slope_percent: 0.15,
            steps_penalty: 50.0,
            rough_surface_penalty: 5.0,
            unknown_surface_penalty: 2.0,
            unknown_surface_threshold: 0.3,
        }
    }
}

impl ScoringWeights {
    /// Override the steps penalty.
    #[must_use]
    pub const fn with_steps_penalty(mut self, penalty: f64) -> Self {
        self.steps_penalty = penalty;
        self
    }

    /// Override the rough-surface penalty.
    #[must_use]
    pub const fn with_rough_surface_penalty(mut self, penalty: f64) -> Self {
        self.rough_surface_penalty = penalty;
        self
    }
}

/// Score and explanatory flags for one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Accessibility score rounded to two decimal places; lower is better.
    pub score: f64,
    /// Human-readable reasons behind the score.
    pub flags: Vec<String>,
}

/// Score a route from its length, climb metrics and optional feature data.
///
/// `features` is `None` while feature data has not been fetched; the flag
/// records that fact and scoring continues as if the summary were empty. The
/// function is pure, so rescoring after enrichment is deterministic.
///
/// # Examples
/// ```
/// use stepfree_core::elevation::ElevationMetrics;
/// use stepfree_core::scoring::{ScoringWeights, score_route};
///
/// let card = score_route(1000.0, &ElevationMetrics::default(), None, &ScoringWeights::default());
/// assert_eq!(card.score, 0.8);
/// assert_eq!(card.flags, vec!["feature data not fetched (performance mode)".to_string()]);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "scores are weighted float sums"
)]
#[must_use]
pub fn score_route(
    distance_m: f64,
    metrics: &ElevationMetrics,
    features: Option<&MapFeatureSummary>,
    weights: &ScoringWeights,
) -> ScoreCard {
    let mut score = weights.per_km * (distance_m / 1000.0)
        + weights.per_ascent_m * metrics.ascent_m
        + weights.per_steep_gt8_m * metrics.steep_distance_m.gt8
        + weights.per_max_slope_percent * metrics.max_slope_percent;
    let mut flags = Vec::new();

    let empty = MapFeatureSummary::default();
    let summary = match features {
        None => {
            flags.push(FLAG_FEATURES_NOT_FETCHED.to_owned());
            &empty
        }
        Some(summary) => {
            if summary.is_empty() {
                flags.push(FLAG_FEATURES_EMPTY.to_owned());
            }
            summary
        }
    };

    if summary.steps_count > 0 {
        score += weights.steps_penalty;
        flags.push(format!("Contains steps ({})", summary.steps_count));
    }

    let rough = rough_surfaces(summary);
    if !rough.is_empty() {
        score += weights.rough_surface_penalty;
        flags.push(format!("Rough surfaces: {}", rough.join(", ")));
    }

    if summary.unknown_surface_ratio >= weights.unknown_surface_threshold {
        score += weights.unknown_surface_penalty;
        flags.push(FLAG_SURFACE_INCOMPLETE.to_owned());
    }

    ScoreCard {
        score: round_to(score, 2),
        flags,
    }
}

/// Rough surface values present in `summary`, in sorted order.
fn rough_surfaces(summary: &MapFeatureSummary) -> Vec<&str> {
    summary
        .surfaces
        .keys()
        .map(String::as_str)
        .filter(|surface| ROUGH_SURFACES.contains(surface))
        .collect()
}
