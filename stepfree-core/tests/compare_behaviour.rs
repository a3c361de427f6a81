//! Behavioural tests for the two-phase route comparison.

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use stepfree_core::test_support::{
    StubElevationProvider, StubFeatureProvider, StubRoutingProvider, line_candidate, steps_way,
};
use stepfree_core::{CompareError, ProviderError, Route, RouteComparator};

const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };
const DESTINATION: Coord<f64> = Coord { x: 0.0, y: 0.01 };

#[derive(Debug)]
struct Services {
    routing: StubRoutingProvider,
    features: StubFeatureProvider,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            routing: StubRoutingProvider::with_candidates(Vec::new()),
            features: StubFeatureProvider::with_elements(Vec::new()),
        }
    }
}

type Outcome = Option<Result<Vec<Route>, CompareError>>;

#[fixture]
fn services() -> RefCell<Services> {
    RefCell::new(Services::default())
}

#[fixture]
fn outcome() -> RefCell<Outcome> {
    RefCell::new(None)
}

fn routes(outcome: &RefCell<Outcome>) -> Vec<Route> {
    match outcome.borrow().as_ref() {
        Some(Ok(routes)) => routes.clone(),
        other => panic!("expected ranked routes, got {other:?}"),
    }
}

fn route_by_id(routes: &[Route], id: &str) -> Route {
    routes
        .iter()
        .find(|route| route.id == id)
        .cloned()
        .unwrap_or_else(|| panic!("route {id} missing"))
}

#[given("a direct route and a longer detour")]
fn two_routes(#[from(services)] services: &RefCell<Services>) {
    let direct = line_candidate("direct", ORIGIN, DESTINATION, 11).expect("direct route");
    let detour = line_candidate("detour", ORIGIN, Coord { x: 0.005, y: 0.01 }, 11)
        .expect("detour route");
    services.borrow_mut().routing = StubRoutingProvider::with_candidates(vec![detour, direct]);
}

#[given("the direct route crosses two flights of steps")]
fn steps_on_direct_route(#[from(services)] services: &RefCell<Services>) {
    services.borrow_mut().features = StubFeatureProvider::with_elements(vec![
        steps_way(7, &[(0.0049, 0.0), (0.0051, 0.0)]),
        steps_way(8, &[(0.0079, 0.0), (0.0081, 0.0)]),
    ]);
}

#[given("the feature service is unavailable")]
fn feature_service_down(#[from(services)] services: &RefCell<Services>) {
    services.borrow_mut().features = StubFeatureProvider::with_error(ProviderError::Timeout {
        url: "http://overpass.test/api/interpreter".to_owned(),
        timeout_secs: 25,
    });
}

#[given("the routing service is unavailable")]
fn routing_service_down(#[from(services)] services: &RefCell<Services>) {
    services.borrow_mut().routing = StubRoutingProvider::with_error(ProviderError::HttpError {
        url: "http://osrm.test/route/v1/foot".to_owned(),
        status: 503,
        message: "service unavailable".to_owned(),
    });
}

#[given("the routing service finds no routes")]
fn routing_finds_nothing(#[from(services)] services: &RefCell<Services>) {
    services.borrow_mut().routing = StubRoutingProvider::with_candidates(Vec::new());
}

#[when("I compare the routes")]
fn compare(
    #[from(services)] services: &RefCell<Services>,
    #[from(outcome)] outcome: &RefCell<Outcome>,
) {
    let Services { routing, features } = services.replace(Services::default());
    let comparator = RouteComparator::new(routing, StubElevationProvider::constant(35.0), features);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("build runtime");
    *outcome.borrow_mut() = Some(runtime.block_on(comparator.compare_routes(ORIGIN, DESTINATION)));
}

#[then("the detour ranks first")]
fn detour_first(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let ids: Vec<String> = routes(outcome).into_iter().map(|route| route.id).collect();
    assert_eq!(ids, vec!["detour".to_owned(), "direct".to_owned()]);
}

#[then("the direct route ranks first")]
fn direct_first(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let ids: Vec<String> = routes(outcome).into_iter().map(|route| route.id).collect();
    assert_eq!(ids, vec!["direct".to_owned(), "detour".to_owned()]);
}

#[then("the direct route carries two step warnings")]
fn direct_has_warnings(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let direct = route_by_id(&routes(outcome), "direct");
    let warnings = direct.step_warnings.expect("step warnings present");
    let features: Vec<i64> = warnings.iter().map(|warning| warning.feature_id).collect();
    assert_eq!(features, vec![7, 8]);
    assert!(direct.flags.contains(&"Contains steps (2)".to_owned()));
}

#[then("no route carries feature data")]
fn no_feature_data(#[from(outcome)] outcome: &RefCell<Outcome>) {
    for route in routes(outcome) {
        assert!(route.feature_summary.is_none(), "{} has a summary", route.id);
        assert!(route.step_warnings.is_none(), "{} has step warnings", route.id);
        assert_eq!(
            route.flags,
            vec!["feature data not fetched (performance mode)".to_owned()]
        );
    }
}

#[then("the comparison fails because an upstream service is unavailable")]
fn upstream_failure(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let borrow = outcome.borrow();
    let Some(Err(err)) = borrow.as_ref() else {
        panic!("expected a comparison error, got {borrow:?}");
    };
    assert!(err.is_upstream_unavailable(), "unexpected error {err}");
}

#[then("the comparison reports that no route was found")]
fn no_route(#[from(outcome)] outcome: &RefCell<Outcome>) {
    assert_eq!(*outcome.borrow(), Some(Err(CompareError::NoRouteFound)));
}

#[scenario(path = "tests/features/compare.feature", index = 0)]
fn steps_demote_the_direct_route(services: RefCell<Services>, outcome: RefCell<Outcome>) {
    let _ = (services, outcome);
}

#[scenario(path = "tests/features/compare.feature", index = 1)]
fn failed_enrichment_keeps_ranking(services: RefCell<Services>, outcome: RefCell<Outcome>) {
    let _ = (services, outcome);
}

#[scenario(path = "tests/features/compare.feature", index = 2)]
fn failed_routing_aborts(services: RefCell<Services>, outcome: RefCell<Outcome>) {
    let _ = (services, outcome);
}

#[scenario(path = "tests/features/compare.feature", index = 3)]
fn no_candidates(services: RefCell<Services>, outcome: RefCell<Outcome>) {
    let _ = (services, outcome);
}
