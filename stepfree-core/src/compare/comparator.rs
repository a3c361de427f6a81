//! Route comparator and its phase model.

use geo::Coord;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{CompareError, EnrichError};
use crate::elevation::{
    ElevationError, ElevationProfile, build_elevation_profile, compute_elevation_metrics,
    nearest_profile_distance,
};
use crate::features::{MapFeatureSummary, aggregate_features, build_feature_query};
use crate::geometry::midpoint;
use crate::provider::{ElevationProvider, FeatureProvider, RoutingProvider};
use crate::route::{Route, RouteCandidate, StepWarning};
use crate::scoring::{ScoringWeights, score_route};

/// Default point budget for elevation lookups.
pub const ELEVATION_MAX_POINTS: usize = 80;

/// Tunable policy for a [`RouteComparator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparatorConfig {
    /// Point budget used when downsampling geometries for elevation lookups.
    pub elevation_max_points: usize,
    /// Scoring weights and penalties.
    pub weights: ScoringWeights,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            elevation_max_points: ELEVATION_MAX_POINTS,
            weights: ScoringWeights::default(),
        }
    }
}

impl ComparatorConfig {
    /// Set the elevation point budget.
    #[must_use]
    pub const fn with_elevation_max_points(mut self, max_points: usize) -> Self {
        self.elevation_max_points = max_points;
        self
    }

    /// Set the scoring weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Progress of a comparison through its two phases.
///
/// Routes are always sorted by ascending score. Only a
/// [`Comparison::Provisional`] value can be enriched.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Every route scored from distance and elevation alone.
    Provisional(Vec<Route>),
    /// The leading route carries feature data and the set has been re-ranked.
    Enriched(Vec<Route>),
    /// Enrichment failed; the provisional ranking is returned unchanged.
    EnrichmentFailed {
        /// Provisional routes.
        routes: Vec<Route>,
        /// Why enrichment failed.
        reason: EnrichError,
    },
}

impl Comparison {
    /// Borrow the ranked routes.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        match self {
            Self::Provisional(routes)
            | Self::Enriched(routes)
            | Self::EnrichmentFailed { routes, .. } => routes,
        }
    }

    /// Consume the comparison and return the ranked routes.
    #[must_use]
    pub fn into_routes(self) -> Vec<Route> {
        match self {
            Self::Provisional(routes)
            | Self::Enriched(routes)
            | Self::EnrichmentFailed { routes, .. } => routes,
        }
    }

    /// Report whether the leading route was enriched.
    #[must_use]
    pub const fn is_enriched(&self) -> bool {
        matches!(self, Self::Enriched(_))
    }
}

/// Ranks walking routes by accessibility.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use stepfree_core::RouteComparator;
/// use stepfree_core::test_support::{
///     StubElevationProvider, StubFeatureProvider, StubRoutingProvider, line_candidate,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let origin = Coord { x: -0.1, y: 51.5 };
/// let destination = Coord { x: -0.1, y: 51.51 };
/// let comparator = RouteComparator::new(
///     StubRoutingProvider::with_candidates(vec![line_candidate("route-1", origin, destination, 5)?]),
///     StubElevationProvider::constant(20.0),
///     StubFeatureProvider::with_elements(Vec::new()),
/// );
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let routes = runtime.block_on(comparator.compare_routes(origin, destination))?;
/// assert_eq!(routes.len(), 1);
/// assert!(routes[0].feature_summary.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RouteComparator<R, E, F> {
    routing: R,
    elevation: E,
    features: F,
    config: ComparatorConfig,
}

impl<R, E, F> RouteComparator<R, E, F>
where
    R: RoutingProvider,
    E: ElevationProvider,
    F: FeatureProvider,
{
    /// Create a comparator with the default policy.
    #[must_use]
    pub fn new(routing: R, elevation: E, features: F) -> Self {
        Self::with_config(routing, elevation, features, ComparatorConfig::default())
    }

    /// Create a comparator with an explicit policy.
    #[must_use]
    pub const fn with_config(
        routing: R,
        elevation: E,
        features: F,
        config: ComparatorConfig,
    ) -> Self {
        Self {
            routing,
            elevation,
            features,
            config,
        }
    }

    /// Borrow the active policy.
    #[must_use]
    pub const fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Fetch, score and rank candidate routes, enriching the leader.
    ///
    /// # Errors
    /// Returns [`CompareError`] when routing or an elevation lookup fails,
    /// or when no candidates exist. Enrichment failures never surface here.
    pub async fn compare_routes(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<Route>, CompareError> {
        self.compare(origin, destination)
            .await
            .map(Comparison::into_routes)
    }

    /// Run both phases and return the resulting [`Comparison`] state.
    ///
    /// # Errors
    /// Same as [`RouteComparator::compare_routes`].
    pub async fn compare(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Comparison, CompareError> {
        let provisional = self.provisional(origin, destination).await?;
        Ok(self.enrich(provisional).await)
    }

    /// Score every candidate without feature data.
    ///
    /// # Errors
    /// Same as [`RouteComparator::compare_routes`].
    pub async fn provisional(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Comparison, CompareError> {
        let candidates = self
            .routing
            .get_alternatives(origin, destination)
            .await
            .map_err(CompareError::Routing)?;
        if candidates.is_empty() {
            return Err(CompareError::NoRouteFound);
        }
        debug!("scoring {} candidate routes", candidates.len());

        let mut routes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            routes.push(self.score_candidate(candidate).await?);
        }
        sort_by_score(&mut routes);
        Ok(Comparison::Provisional(routes))
    }

    /// Enrich the leading route of a provisional comparison.
    ///
    /// Comparisons that are not [`Comparison::Provisional`] are returned
    /// unchanged, as is an empty route list.
    pub async fn enrich(&self, comparison: Comparison) -> Comparison {
        let mut routes = match comparison {
            Comparison::Provisional(provisional) => provisional,
            settled @ (Comparison::Enriched(_) | Comparison::EnrichmentFailed { .. }) => {
                return settled;
            }
        };
        let Some(leader) = routes.first_mut() else {
            return Comparison::Provisional(routes);
        };

        match self.enrich_geometry(leader.geometry.points()).await {
            Ok(summary) => {
                let card = score_route(
                    leader.distance_m,
                    &leader.elevation_metrics,
                    Some(&summary),
                    &self.config.weights,
                );
                let warnings = step_warnings(&summary, &leader.elevation_profile);
                debug!(
                    "enriched route {}: score {} -> {}",
                    leader.id, leader.accessibility_score, card.score
                );
                leader.enrich(summary, card, warnings);
                sort_by_score(&mut routes);
                Comparison::Enriched(routes)
            }
            Err(reason) => {
                warn!(
                    "feature enrichment failed for route {}, keeping provisional ranking: {reason}",
                    leader.id
                );
                Comparison::EnrichmentFailed { routes, reason }
            }
        }
    }

    /// Fetch and aggregate map features along `path`.
    ///
    /// The full-resolution path is reduced to a query polygon before the
    /// provider is called.
    ///
    /// # Errors
    /// Returns [`EnrichError::TooFewPoints`] for paths shorter than two
    /// points, without calling the provider, and [`EnrichError::Provider`]
    /// when the lookup fails.
    pub async fn enrich_geometry(
        &self,
        path: &[Coord<f64>],
    ) -> Result<MapFeatureSummary, EnrichError> {
        if path.len() < 2 {
            return Err(EnrichError::TooFewPoints { count: path.len() });
        }
        let query = build_feature_query(path);
        let elements = self.features.get_features(&query).await?;
        debug!("aggregating {} feature elements", elements.len());
        Ok(aggregate_features(&elements))
    }

    async fn score_candidate(&self, candidate: RouteCandidate) -> Result<Route, CompareError> {
        let sampled = candidate
            .geometry
            .downsample(self.config.elevation_max_points);
        let elevations = self
            .elevation
            .get_elevations(&sampled)
            .await
            .map_err(|source| CompareError::Elevation {
                route_id: candidate.id.clone(),
                source,
            })?;

        let profile = build_elevation_profile(&sampled, &elevations)
            .map_err(|err| elevation_count(&candidate.id, err))?;
        let metrics = compute_elevation_metrics(&sampled, &elevations)
            .map_err(|err| elevation_count(&candidate.id, err))?;
        let card = score_route(candidate.distance_m, &metrics, None, &self.config.weights);
        debug!("provisional score for route {}: {}", candidate.id, card.score);

        Ok(Route::provisional(candidate, profile, metrics, card))
    }
}

fn elevation_count(route_id: &str, err: ElevationError) -> CompareError {
    let ElevationError::LengthMismatch { points, elevations } = err;
    CompareError::ElevationCount {
        route_id: route_id.to_owned(),
        requested: points,
        received: elevations,
    }
}

/// Stable ascending sort; equal scores keep their current order.
fn sort_by_score(routes: &mut [Route]) {
    routes.sort_by(|a, b| a.accessibility_score.total_cmp(&b.accessibility_score));
}

fn step_warnings(summary: &MapFeatureSummary, profile: &ElevationProfile) -> Vec<StepWarning> {
    summary
        .steps_ways
        .iter()
        .filter_map(|way| {
            let centre = midpoint(&way.coords())?;
            let along = nearest_profile_distance(profile, centre.y, centre.x)?;
            Some(StepWarning {
                feature_id: way.feature_id,
                lat: centre.y,
                lon: centre.x,
                distance_along_route_m: along,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureElement;
    use crate::provider::ProviderError;
    use crate::scoring::{FLAG_FEATURES_NOT_FETCHED, FLAG_FEATURES_EMPTY};
    use crate::test_support::{
        StubElevationProvider, StubFeatureProvider, StubRoutingProvider, line_candidate,
        steps_way,
    };
    use rstest::{fixture, rstest};

    type StubComparator =
        RouteComparator<StubRoutingProvider, StubElevationProvider, StubFeatureProvider>;

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };
    const DESTINATION: Coord<f64> = Coord { x: 0.0, y: 0.01 };

    fn block_on<T>(future: impl std::future::Future<Output = T>) -> T {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("build runtime")
            .block_on(future)
    }

    /// `route-1` is direct; `route-2` dog-legs east and is roughly twice as long.
    #[fixture]
    fn candidates() -> Vec<RouteCandidate> {
        let direct = line_candidate("route-1", ORIGIN, DESTINATION, 11).expect("direct route");
        let detour = line_candidate("route-2", ORIGIN, Coord { x: 0.01, y: 0.01 }, 11)
            .expect("detour route");
        vec![detour, direct]
    }

    fn comparator(
        candidates: Vec<RouteCandidate>,
        features: StubFeatureProvider,
    ) -> StubComparator {
        RouteComparator::new(
            StubRoutingProvider::with_candidates(candidates),
            StubElevationProvider::constant(12.0),
            features,
        )
    }

    fn ids(routes: &[Route]) -> Vec<&str> {
        routes.iter().map(|route| route.id.as_str()).collect()
    }

    #[rstest]
    fn provisional_phase_ranks_by_distance(candidates: Vec<RouteCandidate>) {
        let comparator = comparator(candidates, StubFeatureProvider::with_elements(Vec::new()));
        let comparison = block_on(comparator.provisional(ORIGIN, DESTINATION)).expect("compare");

        assert!(matches!(comparison, Comparison::Provisional(_)));
        assert_eq!(ids(comparison.routes()), vec!["route-1", "route-2"]);
        assert!(comparison.routes().iter().all(|route| {
            route.feature_summary.is_none()
                && route.flags == vec![FLAG_FEATURES_NOT_FETCHED.to_owned()]
        }));
    }

    #[rstest]
    fn only_the_leader_is_enriched(candidates: Vec<RouteCandidate>) {
        let features = StubFeatureProvider::with_elements(Vec::new());
        let comparator = comparator(candidates, features);
        let comparison = block_on(comparator.compare(ORIGIN, DESTINATION)).expect("compare");

        assert!(comparison.is_enriched());
        let routes = comparison.routes();
        assert_eq!(routes[0].flags, vec![FLAG_FEATURES_EMPTY.to_owned()]);
        assert_eq!(routes[0].step_warnings, Some(Vec::new()));
        assert!(routes[1].feature_summary.is_none());
        assert_eq!(comparator.features.calls(), 1);
    }

    #[rstest]
    fn steps_on_the_leader_reorder_the_result(candidates: Vec<RouteCandidate>) {
        let steps = vec![
            steps_way(42, &[(0.0049, 0.0), (0.0051, 0.0)]),
            steps_way(43, &[(0.0079, 0.0), (0.0081, 0.0)]),
        ];
        let comparator = comparator(candidates, StubFeatureProvider::with_elements(steps));
        let routes = block_on(comparator.compare_routes(ORIGIN, DESTINATION)).expect("compare");

        assert_eq!(ids(&routes), vec!["route-2", "route-1"]);
        let stepped = &routes[1];
        assert!(stepped.flags.contains(&"Contains steps (2)".to_owned()));
        let warnings = stepped.step_warnings.as_ref().expect("warnings present");
        let features: Vec<i64> = warnings.iter().map(|warning| warning.feature_id).collect();
        assert_eq!(features, vec![42, 43]);
        // Midpoints sit on the profile points 5 and 8 segments of 111.2 m along.
        assert!((warnings[0].distance_along_route_m - 556.0).abs() < 0.2);
        assert!((warnings[1].distance_along_route_m - 889.6).abs() < 0.2);
    }

    #[rstest]
    fn enrichment_failure_keeps_provisional_ranking(candidates: Vec<RouteCandidate>) {
        let features = StubFeatureProvider::with_error(ProviderError::Timeout {
            url: "http://overpass".to_owned(),
            timeout_secs: 25,
        });
        let comparator = comparator(candidates, features);
        let provisional =
            block_on(comparator.provisional(ORIGIN, DESTINATION)).expect("provisional");
        let comparison = block_on(comparator.enrich(provisional.clone()));

        let Comparison::EnrichmentFailed { routes, reason } = comparison else {
            panic!("expected enrichment failure, got {comparison:?}");
        };
        assert!(matches!(reason, EnrichError::Provider(ProviderError::Timeout { .. })));
        assert_eq!(routes, provisional.into_routes());
        assert!(routes.iter().all(|route| route.step_warnings.is_none()));
    }

    #[rstest]
    fn enrich_leaves_settled_comparisons_alone(candidates: Vec<RouteCandidate>) {
        let comparator = comparator(candidates, StubFeatureProvider::with_elements(Vec::new()));
        let enriched = block_on(comparator.compare(ORIGIN, DESTINATION)).expect("compare");
        let again = block_on(comparator.enrich(enriched.clone()));
        assert_eq!(again, enriched);
        assert_eq!(comparator.features.calls(), 1);
    }

    #[rstest]
    fn equal_scores_keep_provider_order() {
        let first = line_candidate("route-1", ORIGIN, DESTINATION, 3).expect("route");
        let second = RouteCandidate {
            id: "route-2".to_owned(),
            ..first.clone()
        };
        let comparator = comparator(
            vec![first, second],
            StubFeatureProvider::with_elements(Vec::new()),
        );
        let comparison = block_on(comparator.provisional(ORIGIN, DESTINATION)).expect("compare");
        assert_eq!(ids(comparison.routes()), vec!["route-1", "route-2"]);
    }

    #[rstest]
    fn no_candidates_is_not_an_upstream_failure() {
        let comparator = comparator(Vec::new(), StubFeatureProvider::with_elements(Vec::new()));
        let err = block_on(comparator.compare_routes(ORIGIN, DESTINATION)).expect_err("no routes");
        assert_eq!(err, CompareError::NoRouteFound);
        assert!(!err.is_upstream_unavailable());
    }

    #[rstest]
    fn routing_failure_is_fatal() {
        let comparator = RouteComparator::new(
            StubRoutingProvider::with_error(ProviderError::NetworkError {
                url: "http://osrm".to_owned(),
                message: "connection refused".to_owned(),
            }),
            StubElevationProvider::constant(0.0),
            StubFeatureProvider::with_elements(Vec::new()),
        );
        let err = block_on(comparator.compare_routes(ORIGIN, DESTINATION)).expect_err("fails");
        assert!(matches!(err, CompareError::Routing(ProviderError::NetworkError { .. })));
        assert!(err.is_upstream_unavailable());
    }

    #[rstest]
    fn elevation_failure_is_fatal(candidates: Vec<RouteCandidate>) {
        let comparator = RouteComparator::new(
            StubRoutingProvider::with_candidates(candidates),
            StubElevationProvider::with_error(ProviderError::HttpError {
                url: "http://elevation".to_owned(),
                status: 503,
                message: "unavailable".to_owned(),
            }),
            StubFeatureProvider::with_elements(Vec::new()),
        );
        let err = block_on(comparator.compare_routes(ORIGIN, DESTINATION)).expect_err("fails");
        assert!(matches!(
            err,
            CompareError::Elevation { ref route_id, .. } if route_id == "route-2"
        ));
    }

    #[rstest]
    fn short_elevation_response_is_rejected(candidates: Vec<RouteCandidate>) {
        let comparator = RouteComparator::new(
            StubRoutingProvider::with_candidates(candidates),
            StubElevationProvider::with_values(vec![1.0, 2.0]),
            StubFeatureProvider::with_elements(Vec::new()),
        );
        let err = block_on(comparator.compare_routes(ORIGIN, DESTINATION)).expect_err("fails");
        assert_eq!(
            err,
            CompareError::ElevationCount {
                route_id: "route-2".to_owned(),
                requested: 11,
                received: 2,
            }
        );
    }

    #[rstest]
    fn elevation_requests_respect_the_point_budget() {
        let long = line_candidate("route-1", ORIGIN, DESTINATION, 500).expect("route");
        let elevation = StubElevationProvider::constant(3.0);
        let comparator = RouteComparator::with_config(
            StubRoutingProvider::with_candidates(vec![long]),
            elevation,
            StubFeatureProvider::with_elements(Vec::new()),
            ComparatorConfig::default(),
        );
        block_on(comparator.compare_routes(ORIGIN, DESTINATION)).expect("compare");
        assert!(comparator.elevation.largest_request() <= ELEVATION_MAX_POINTS + 1);
        assert_eq!(comparator.elevation.calls(), 1);
    }

    #[rstest]
    #[case(Vec::new(), 0)]
    #[case(vec![ORIGIN], 1)]
    fn enrich_geometry_rejects_short_paths(#[case] path: Vec<Coord<f64>>, #[case] count: usize) {
        let comparator = comparator(Vec::new(), StubFeatureProvider::with_elements(Vec::new()));
        let err = block_on(comparator.enrich_geometry(&path)).expect_err("too short");
        assert_eq!(err, EnrichError::TooFewPoints { count });
        assert_eq!(comparator.features.calls(), 0);
    }

    #[rstest]
    fn enrich_geometry_aggregates_provider_elements() {
        let elements = vec![
            steps_way(1, &[(0.0, 0.0), (0.0001, 0.0)]),
            FeatureElement::Node {
                id: 2,
                lat: 0.0,
                lon: 0.0,
                tags: [("kerb".to_owned(), "lowered".to_owned())].into(),
            },
        ];
        let comparator = comparator(Vec::new(), StubFeatureProvider::with_elements(elements));
        let summary =
            block_on(comparator.enrich_geometry(&[ORIGIN, DESTINATION])).expect("summary");
        assert_eq!(summary.steps_count, 1);
        assert_eq!(summary.kerb_nodes_count, 1);
        assert_eq!(summary.steps_ways.len(), 1);
    }
}
