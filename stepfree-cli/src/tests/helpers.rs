//! Test helpers for CLI workspaces and stubbed comparison engines.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use stepfree_core::test_support::{
    StubElevationProvider, StubFeatureProvider, StubRoutingProvider, line_candidate, steps_way,
};
use stepfree_core::{FeatureElement, RouteCandidate, RouteComparator};
use tempfile::TempDir;

use crate::services::Engine;

pub(super) const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };
pub(super) const DESTINATION: Coord<f64> = Coord { x: 0.0, y: 0.01 };

pub(super) type StubEngine =
    Engine<StubRoutingProvider, StubElevationProvider, StubFeatureProvider>;

pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write file");
}

/// Direct route north from the origin plus a longer detour to the east.
pub(super) fn candidates() -> Vec<RouteCandidate> {
    vec![
        line_candidate("direct", ORIGIN, DESTINATION, 11).expect("direct candidate"),
        line_candidate("detour", ORIGIN, Coord { x: 0.005, y: 0.01 }, 11)
            .expect("detour candidate"),
    ]
}

/// A flight of steps halfway along the direct route.
pub(super) fn midway_steps() -> Vec<FeatureElement> {
    vec![steps_way(7, &[(0.0049, 0.0), (0.0051, 0.0)])]
}

pub(super) fn stub_engine(
    routing: StubRoutingProvider,
    features: StubFeatureProvider,
) -> StubEngine {
    let comparator = RouteComparator::new(routing, StubElevationProvider::constant(12.0), features);
    Engine::new(comparator).expect("engine should build")
}
