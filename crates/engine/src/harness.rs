//! Headless harness: an `EditorState` wired to the stub loader, for tests,
//! the CLI, and agent-driven sessions.

use shared::{BoundaryPoint, EntityInfo, FenceStyleKind, ModelAttrs, ObjectId, Point3};

use crate::build::FenceBuild;
use crate::loader::{BoxLoader, ModelLoader, ModelSource};
use crate::state::scene::EntityPayload;
use crate::state::EditorState;
use crate::validation::FenceValidator;

/// Headless harness — editor state plus a stand-in model loader
pub struct TestHarness {
    pub state: EditorState,
    pub loader: BoxLoader,
}

impl TestHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self {
            state: EditorState::new(),
            loader: BoxLoader::new(),
        }
    }

    // ── Construction helpers ──────────────────────────────────

    /// Fence through ground-plane coordinates, default style
    pub fn draw_fence(&mut self, points: &[(f64, f64)]) -> Option<ObjectId> {
        self.draw_fence_styled(points, FenceStyleKind::Wood)
    }

    pub fn draw_fence_styled(
        &mut self,
        points: &[(f64, f64)],
        style: FenceStyleKind,
    ) -> Option<ObjectId> {
        let points: Vec<Point3> = points.iter().map(|(x, z)| Point3::new(*x, 0.0, *z)).collect();
        self.state.scene.create_fence(points, style, None)
    }

    /// Straight-sided floor through ground-plane coordinates
    pub fn draw_floor(&mut self, points: &[(f64, f64)]) -> Option<ObjectId> {
        let points: Vec<BoundaryPoint> = points
            .iter()
            .map(|(x, z)| BoundaryPoint::straight(*x, 0.0, *z))
            .collect();
        let rate = self.state.settings.floor_rate;
        self.state.scene.create_boundary_floor(points, rate)
    }

    /// Place a unit-box model at a ground position
    pub fn place_box(&mut self, name: &str, price: f64, x: f64, z: f64) -> ObjectId {
        let attrs = ModelAttrs {
            info: EntityInfo::new(name, "BOX-01", price),
            model_file: Some(format!("{name}.glb")),
            asset_id: None,
            payload: None,
            imported: false,
        };
        let model = self
            .loader
            .load(ModelSource::Url("box.glb"))
            .expect("stub loader");
        self.state.place_model(attrs, model, Point3::new(x, 0.0, z))
    }

    /// Load a model by URL through the harness loader and place it
    pub fn place_from_url(
        &mut self,
        name: &str,
        reference: &str,
        price: f64,
        url: &str,
        at: Point3,
    ) -> Result<ObjectId, String> {
        let model = self.loader.load(ModelSource::Url(url))?;
        let attrs = ModelAttrs {
            info: EntityInfo::new(name, reference, price),
            model_file: Some(url.to_string()),
            asset_id: None,
            payload: None,
            imported: false,
        };
        Ok(self.state.place_model(attrs, model, at))
    }

    /// Register an imported payload and place the decoded model
    pub fn import_and_place(
        &mut self,
        filename: &str,
        payload: String,
        reference: &str,
        price: f64,
        at: Point3,
    ) -> Result<ObjectId, String> {
        let attrs = self.state.import_model(filename, payload.clone(), reference, price);
        let model = self.loader.load(ModelSource::Payload(&payload))?;
        Ok(self.state.place_model(attrs, model, at))
    }

    // ── History ───────────────────────────────────────────────

    pub fn undo(&mut self) {
        self.state.scene.undo(&mut self.loader);
        self.state.selection.clear();
    }

    pub fn redo(&mut self) {
        self.state.scene.redo(&mut self.loader);
        self.state.selection.clear();
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn entity_count(&self) -> usize {
        self.state.scene.entity_count()
    }

    pub fn total_price(&self) -> f64 {
        self.state.scene.total_price()
    }

    pub fn history_len(&self) -> usize {
        self.state.scene.history_len()
    }

    pub fn check_collision(&self, id: &str) -> bool {
        crate::collision::check_collision(&self.state.scene, id)
    }

    /// Validator over a fence entity's build
    pub fn validate_fence(&self, id: &str) -> Option<FenceValidator<'_>> {
        match &self.state.scene.get(id)?.payload {
            EntityPayload::Fence { build, .. } => Some(FenceValidator::new(build)),
            _ => None,
        }
    }

    /// Direct access to a fence entity's instance groups
    pub fn fence_build(&self, id: &str) -> Option<&FenceBuild> {
        match &self.state.scene.get(id)?.payload {
            EntityPayload::Fence { build, .. } => Some(build),
            _ => None,
        }
    }

    // ── Persistence ───────────────────────────────────────────

    pub fn export_project_json(&self) -> String {
        self.state.scene.save_project_json()
    }

    pub fn load_project_json(&mut self, json: &str) -> Result<(), String> {
        self.state.scene.load_project_json(json, &mut self.loader)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.entity_count(), 0);
        assert_eq!(h.total_price(), 0.0);
    }

    #[test]
    fn test_draw_fence_and_floor() {
        let mut h = TestHarness::new();
        h.draw_fence(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
        h.draw_floor(&[(0.0, 0.0), (10.0, 0.0), (10.0, 8.0), (0.0, 8.0)])
            .unwrap();
        assert_eq!(h.entity_count(), 2);
        assert_eq!(h.total_price(), 360.0 + 3200.0);
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut h = TestHarness::new();
        h.draw_fence(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
        assert_eq!(h.entity_count(), 1);
        h.undo();
        assert_eq!(h.entity_count(), 0);
        h.redo();
        assert_eq!(h.entity_count(), 1);
    }

    #[test]
    fn test_validate_fence() {
        let mut h = TestHarness::new();
        let id = h.draw_fence(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
        let v = h.validate_fence(&id).unwrap();
        assert!(v.validate_all().is_empty());
        assert!(v.price_matches(36.0));
    }

    #[test]
    fn test_project_roundtrip_via_harness() {
        let mut h = TestHarness::new();
        h.draw_fence(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
        let json = h.export_project_json();

        let mut h2 = TestHarness::new();
        h2.load_project_json(&json).unwrap();
        assert_eq!(h2.entity_count(), 1);
        assert_eq!(h2.total_price(), 360.0);
    }
}
