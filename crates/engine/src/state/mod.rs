pub mod draft;
pub mod scene;
pub mod selection;
pub mod settings;

pub use draft::{DraftState, FloorMode};
pub use scene::{
    entity_display_name, short_id, DragOutcome, EntityPayload, PlacedEntity, SceneState,
};
pub use selection::SelectionState;
pub use settings::{AppSettings, SnapSettings};

use shared::{FenceColors, FenceStyleKind, ModelAttrs, ObjectId, Point3};

use crate::collision;
use crate::loader::{LoadedModel, ModelLoader};
use crate::presets;

/// Active fence drawing configuration: style plus color overrides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FenceConfig {
    pub style: FenceStyleKind,
    pub colors: FenceColors,
}

impl Default for FenceConfig {
    fn default() -> Self {
        let style = FenceStyleKind::Wood;
        Self {
            style,
            colors: presets::fence_style(style).default_colors,
        }
    }
}

/// Which color slot of the fence config to override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceColorSlot {
    Post,
    SlatA,
    SlatB,
    SlatC,
}

/// Combined editor state: scene, selection, drafts, and settings.
/// Explicitly owned and passed around; no ambient globals.
#[derive(Default)]
pub struct EditorState {
    pub scene: SceneState,
    pub selection: SelectionState,
    pub draft: DraftState,
    pub settings: AppSettings,
    pub fence_config: FenceConfig,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Fence drawing ─────────────────────────────────────────

    pub fn set_fence_style(&mut self, style: FenceStyleKind) {
        self.fence_config = FenceConfig {
            style,
            colors: presets::fence_style(style).default_colors,
        };
    }

    pub fn set_fence_color(&mut self, slot: FenceColorSlot, hex: u32) {
        let colors = &mut self.fence_config.colors;
        match slot {
            FenceColorSlot::Post => colors.post = hex,
            FenceColorSlot::SlatA => colors.slat_a = hex,
            FenceColorSlot::SlatB => colors.slat_b = Some(hex),
            FenceColorSlot::SlatC => colors.slat_c = Some(hex),
        }
    }

    /// Turn the drafted polyline into a fence entity
    pub fn finish_fence(&mut self) -> Option<ObjectId> {
        if !self.draft.can_finish_fence() {
            return None;
        }
        let points = self.draft.take_fence_points();
        let id = self
            .scene
            .create_fence(points, self.fence_config.style, Some(self.fence_config.colors))?;
        self.selection.select(id.clone());
        Some(id)
    }

    // ── Floor drawing ─────────────────────────────────────────

    /// Turn the drafted boundary into a floor entity
    pub fn finish_floor(&mut self) -> Option<ObjectId> {
        if !self.draft.can_finish_floor() {
            return None;
        }
        let points = self.draft.take_floor_points();
        let id = self
            .scene
            .create_boundary_floor(points, self.settings.floor_rate)?;
        self.selection.select(id.clone());
        Some(id)
    }

    /// Finish the rectangle drag started in the draft
    pub fn finish_rect_floor(&mut self, end: Point3) -> Option<ObjectId> {
        let start = self.draft.take_rect_start()?;
        let id = self
            .scene
            .create_rect_floor(start, end, self.settings.floor_rate)?;
        self.selection.select(id.clone());
        Some(id)
    }

    // ── Placement ─────────────────────────────────────────────

    /// Register an imported payload and return placement-ready attributes
    pub fn import_model(
        &mut self,
        filename: &str,
        payload: String,
        reference: &str,
        price: f64,
    ) -> ModelAttrs {
        let asset_id = self.scene.register_asset(payload);
        let mut info = shared::EntityInfo::new(filename, reference, price);
        info.dims = "Custom".to_string();
        ModelAttrs {
            info,
            model_file: None,
            asset_id: Some(asset_id),
            payload: None,
            imported: true,
        }
    }

    /// Append an already-loaded model and select it
    pub fn place_model(&mut self, attrs: ModelAttrs, model: LoadedModel, at: Point3) -> ObjectId {
        let id = self.scene.place_model(attrs, model, at);
        self.selection.select(id.clone());
        self.refresh_collision();
        id
    }

    // ── Selection & manipulation ──────────────────────────────

    pub fn select(&mut self, id: &str) -> bool {
        if self.scene.get(id).is_some() {
            self.selection.select(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.current().cloned() else {
            return false;
        };
        if self.scene.delete(&id) {
            self.selection.clear();
            true
        } else {
            false
        }
    }

    pub fn clone_selected(&mut self) -> Option<ObjectId> {
        let id = self.selection.current().cloned()?;
        let clone_id = self.scene.clone_entity(&id)?;
        self.selection.select(clone_id.clone());
        self.refresh_collision();
        Some(clone_id)
    }

    pub fn toggle_lock_selected(&mut self) -> Option<bool> {
        let id = self.selection.current().cloned()?;
        self.scene.toggle_locked(&id)
    }

    pub fn toggle_collides_selected(&mut self) -> Option<bool> {
        let id = self.selection.current().cloned()?;
        let result = self.scene.toggle_collides(&id);
        self.refresh_collision();
        result
    }

    pub fn begin_drag_selected(&mut self) -> bool {
        match self.selection.current() {
            Some(id) => {
                let id = id.clone();
                self.scene.begin_drag(&id)
            }
            None => false,
        }
    }

    pub fn translate_selected(&mut self, dx: f64, dy: f64, dz: f64) -> bool {
        let Some(id) = self.selection.current().cloned() else {
            return false;
        };
        let moved = self.scene.translate(&id, dx, dy, dz);
        if moved {
            self.refresh_collision();
        }
        moved
    }

    /// End the drag gesture; the selection flag mirrors the outcome
    pub fn end_drag(&mut self) -> DragOutcome {
        let outcome = self.scene.end_drag();
        if outcome == DragOutcome::Reverted {
            self.selection.colliding = false;
        }
        outcome
    }

    /// Re-evaluate the advisory collision flag for the selection
    pub fn refresh_collision(&mut self) {
        let colliding = match self.selection.current() {
            Some(id) => collision::check_collision(&self.scene, id),
            None => false,
        };
        self.selection.colliding = colliding;
    }

    // ── History ───────────────────────────────────────────────

    pub fn undo(&mut self, loader: &mut dyn ModelLoader) {
        self.scene.undo(loader);
        self.selection.clear();
    }

    pub fn redo(&mut self, loader: &mut dyn ModelLoader) {
        self.scene.redo(loader);
        self.selection.clear();
    }

    /// Reset the whole editor: scene, drafts, and selection
    pub fn reset(&mut self) {
        self.scene.reset();
        self.draft.clear_all();
        self.selection.clear();
    }
}
