//! Integration tests for project persistence: save/load payloads and
//! asset-cache deduplication.

use playscape_engine_lib::fixtures;
use playscape_engine_lib::harness::TestHarness;
use shared::{Point3, ProjectData, SceneItem};

fn populated_harness() -> TestHarness {
    let mut h = TestHarness::new();
    h.draw_floor(&[(0.0, 0.0), (10.0, 0.0), (10.0, 8.0), (0.0, 8.0)])
        .unwrap();
    h.draw_fence(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
    h.import_and_place(
        "slide.glb",
        "U0xJREU=".to_string(),
        "IMP-01",
        2500.0,
        Point3::new(5.0, 0.0, 4.0),
    )
    .unwrap();
    h
}

#[test]
fn test_project_roundtrip_counts_and_price() {
    let h = populated_harness();
    let json = h.export_project_json();

    let mut restored = TestHarness::new();
    restored.load_project_json(&json).unwrap();

    assert_eq!(restored.entity_count(), 3);
    assert_eq!(restored.total_price(), h.total_price());
}

#[test]
fn test_project_format_shape() {
    let h = populated_harness();
    let data: ProjectData = serde_json::from_str(&h.export_project_json()).unwrap();

    assert_eq!(data.items.len(), 3);
    assert_eq!(data.asset_cache.len(), 1);
    assert!(data
        .items
        .iter()
        .any(|item| matches!(item, SceneItem::Floor { .. })));
    assert!(data
        .items
        .iter()
        .any(|item| matches!(item, SceneItem::Fence { .. })));

    // Imported model references the cache instead of inlining bytes
    let model = data
        .items
        .iter()
        .find_map(|item| match item {
            SceneItem::Model { attrs, .. } => Some(attrs),
            _ => None,
        })
        .unwrap();
    assert!(model.asset_id.is_some());
    assert!(model.payload.is_none());
    assert!(data.asset_cache.contains_key(model.asset_id.as_ref().unwrap()));
}

#[test]
fn test_snapshots_share_cache_across_history() {
    let mut h = populated_harness();
    // Several more commits referencing the same imported asset
    let id = h.state.scene.entities()[2].id.clone();
    for _ in 0..3 {
        h.state.scene.clone_entity(&id).unwrap();
    }

    // The payload still exists exactly once in the exported project
    let json = h.export_project_json();
    assert_eq!(json.matches("U0xJREU=").count(), 1);

    // Undo/redo across those commits keeps every clone loadable
    h.undo();
    h.undo();
    h.redo();
    assert_eq!(h.entity_count(), 5);
}

#[test]
fn test_load_merges_asset_cache() {
    let h = populated_harness();
    let json = h.export_project_json();

    let mut target = TestHarness::new();
    let prior_asset = target.state.scene.register_asset("T1dO".to_string());
    target.load_project_json(&json).unwrap();

    // Prior cache entries survive the merge
    assert!(target.state.scene.asset_cache.contains_key(&prior_asset));
    assert_eq!(target.state.scene.asset_cache.len(), 2);
}

#[test]
fn test_load_commits_once() {
    let h = populated_harness();
    let json = h.export_project_json();

    let mut target = TestHarness::new();
    let history_before = target.history_len();
    target.load_project_json(&json).unwrap();
    assert_eq!(target.history_len(), history_before + 1);

    // Undo right after load returns to the empty scene
    target.undo();
    assert_eq!(target.entity_count(), 0);
    target.redo();
    assert_eq!(target.entity_count(), 3);
}

#[test]
fn test_fixture_boundaries_load_as_floors() {
    let mut h = TestHarness::new();
    let rate = h.state.settings.floor_rate;
    h.state
        .scene
        .create_boundary_floor(fixtures::rect_boundary(6.0, 5.0), rate)
        .unwrap();
    let json = h.export_project_json();

    let mut restored = TestHarness::new();
    restored.load_project_json(&json).unwrap();
    assert_eq!(restored.entity_count(), 1);
    assert_eq!(restored.total_price(), 1200.0);
}
