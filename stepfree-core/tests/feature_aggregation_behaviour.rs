//! Behavioural tests for map-feature aggregation.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use stepfree_core::features::{FeatureElement, Tags, aggregate_features};
use stepfree_core::test_support::tagged_way;
use stepfree_core::MapFeatureSummary;

#[fixture]
fn elements() -> RefCell<Vec<FeatureElement>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn summary() -> RefCell<MapFeatureSummary> {
    RefCell::new(MapFeatureSummary::default())
}

#[given("a footway surfaced with asphalt")]
fn asphalt_footway(#[from(elements)] elements: &RefCell<Vec<FeatureElement>>) {
    elements
        .borrow_mut()
        .push(tagged_way(1, &[("highway", "footway"), ("surface", "asphalt")]));
}

#[given("a footway without surface data")]
fn bare_footway(#[from(elements)] elements: &RefCell<Vec<FeatureElement>>) {
    elements
        .borrow_mut()
        .push(tagged_way(2, &[("highway", "footway")]));
}

#[given("a building outline without a highway tag")]
fn building(#[from(elements)] elements: &RefCell<Vec<FeatureElement>>) {
    elements
        .borrow_mut()
        .push(tagged_way(3, &[("building", "yes"), ("surface", "paved")]));
}

#[given("a lowered kerb at a crossing with tactile paving")]
fn kerb_crossing(#[from(elements)] elements: &RefCell<Vec<FeatureElement>>) {
    elements.borrow_mut().push(FeatureElement::Node {
        id: 4,
        lat: 51.5,
        lon: -0.1,
        tags: Tags::from([
            ("kerb".to_owned(), "lowered".to_owned()),
            ("highway".to_owned(), "crossing".to_owned()),
            ("tactile_paving".to_owned(), "yes".to_owned()),
        ]),
    });
}

#[when("I aggregate the features")]
fn aggregate(
    #[from(elements)] elements: &RefCell<Vec<FeatureElement>>,
    #[from(summary)] summary: &RefCell<MapFeatureSummary>,
) {
    *summary.borrow_mut() = aggregate_features(&elements.borrow());
}

#[then("the unknown surface ratio is 0.5")]
fn half_unknown(#[from(summary)] summary: &RefCell<MapFeatureSummary>) {
    assert_eq!(summary.borrow().unknown_surface_ratio, 0.5);
}

#[then("the unknown surface ratio is 0.0")]
fn none_unknown(#[from(summary)] summary: &RefCell<MapFeatureSummary>) {
    assert_eq!(summary.borrow().unknown_surface_ratio, 0.0);
}

#[then("two ways are counted")]
fn two_ways(#[from(summary)] summary: &RefCell<MapFeatureSummary>) {
    let summary = summary.borrow();
    assert_eq!(summary.total_way_count, 2);
    assert_eq!(summary.known_surface_way_count, 1);
    assert_eq!(summary.highway_types.get("footway"), Some(&2));
}

#[then("the summary is empty")]
fn empty(#[from(summary)] summary: &RefCell<MapFeatureSummary>) {
    let summary = summary.borrow();
    assert!(summary.is_empty());
    assert!(summary.surfaces.is_empty());
}

#[then("one kerb, one crossing and one tactile paving node are counted")]
fn node_counts(#[from(summary)] summary: &RefCell<MapFeatureSummary>) {
    let summary = summary.borrow();
    assert_eq!(summary.kerb_nodes_count, 1);
    assert_eq!(summary.crossing_nodes_count, 1);
    assert_eq!(summary.tactile_paving_nodes_count, 1);
    assert_eq!(summary.total_way_count, 0);
}

#[scenario(path = "tests/features/feature_aggregation.feature", index = 0)]
fn half_of_ways_lack_surface(
    elements: RefCell<Vec<FeatureElement>>,
    summary: RefCell<MapFeatureSummary>,
) {
    let _ = (elements, summary);
}

#[scenario(path = "tests/features/feature_aggregation.feature", index = 1)]
fn non_highway_ways_ignored(
    elements: RefCell<Vec<FeatureElement>>,
    summary: RefCell<MapFeatureSummary>,
) {
    let _ = (elements, summary);
}

#[scenario(path = "tests/features/feature_aggregation.feature", index = 2)]
fn node_features_counted(
    elements: RefCell<Vec<FeatureElement>>,
    summary: RefCell<MapFeatureSummary>,
) {
    let _ = (elements, summary);
}
