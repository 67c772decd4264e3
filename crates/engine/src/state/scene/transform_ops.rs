//! Transform/drag operations. Collision is only evaluated at gesture end;
//! a hit reverts the transform to its pre-drag value instead of blocking the
//! live manipulation.

use shared::Transform;

use crate::collision;

use super::SceneState;

/// Result of ending a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drag was in progress
    NoDrag,
    /// Transform accepted and committed
    Committed,
    /// Collision detected; transform restored to its pre-drag value
    Reverted,
}

impl SceneState {
    /// Capture the pre-drag transform. Locked entities refuse the gesture.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        match self.get(id) {
            Some(entity) if !entity.info().locked => {
                self.drag_origin = Some((entity.id.clone(), entity.transform.clone()));
                true
            }
            _ => false,
        }
    }

    /// Apply a translation delta to a non-locked entity
    pub fn translate(&mut self, id: &str, dx: f64, dy: f64, dz: f64) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        if entity.info().locked {
            return false;
        }
        entity.transform.position[0] += dx;
        entity.transform.position[1] += dy;
        entity.transform.position[2] += dz;
        self.version += 1;
        true
    }

    pub fn set_rotation(&mut self, id: &str, rx: f64, ry: f64, rz: f64) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        if entity.info().locked {
            return false;
        }
        entity.transform.rotation = [rx, ry, rz];
        self.version += 1;
        true
    }

    pub fn set_scale(&mut self, id: &str, sx: f64, sy: f64, sz: f64) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        if entity.info().locked {
            return false;
        }
        entity.transform.scale = [sx, sy, sz];
        self.version += 1;
        true
    }

    /// Finish the drag: commit on success, revert on collision
    pub fn end_drag(&mut self) -> DragOutcome {
        let Some((id, origin)) = self.drag_origin.take() else {
            return DragOutcome::NoDrag;
        };

        if collision::check_collision(self, &id) {
            if let Some(entity) = self.get_mut(&id) {
                entity.transform = origin;
            }
            self.version += 1;
            DragOutcome::Reverted
        } else {
            self.commit();
            DragOutcome::Committed
        }
    }

    /// Pre-drag transform of the gesture in progress, if any
    pub fn drag_origin(&self) -> Option<&(shared::ObjectId, Transform)> {
        self.drag_origin.as_ref()
    }

    /// Drop the entity so its world bounds rest on the ground plane
    pub fn snap_to_ground(&mut self, id: &str) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        if entity.is_floor() {
            return false;
        }
        let Some(bounds) = collision::world_aabb(entity) else {
            return false;
        };
        if bounds.min.y.abs() > 0.01 {
            let shift = bounds.min.y;
            if let Some(entity) = self.get_mut(id) {
                entity.transform.position[1] -= shift;
            }
            self.version += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{BoxLoader, ModelLoader, ModelSource};
    use shared::{EntityInfo, ModelAttrs, Point3};

    fn place_box_at(scene: &mut SceneState, x: f64, z: f64, price: f64) -> shared::ObjectId {
        let attrs = ModelAttrs {
            info: EntityInfo::new("Box", "BX", price),
            model_file: Some("box.glb".to_string()),
            asset_id: None,
            payload: None,
            imported: false,
        };
        let model = BoxLoader::new().load(ModelSource::Url("box.glb")).unwrap();
        scene.place_model(attrs, model, Point3::new(x, 0.0, z))
    }

    #[test]
    fn test_translate_moves_entity() {
        let mut scene = SceneState::new();
        let id = place_box_at(&mut scene, 0.0, 0.0, 10.0);
        assert!(scene.translate(&id, 2.0, 0.0, -1.0));
        let entity = scene.get(&id).unwrap();
        assert_eq!(entity.transform.position[0], 2.0);
        assert_eq!(entity.transform.position[2], -1.0);
    }

    #[test]
    fn test_locked_entity_refuses_transform() {
        let mut scene = SceneState::new();
        let id = place_box_at(&mut scene, 0.0, 0.0, 10.0);
        scene.toggle_locked(&id);
        assert!(!scene.translate(&id, 1.0, 0.0, 0.0));
        assert!(!scene.begin_drag(&id));
    }

    #[test]
    fn test_drag_commit_on_clear_placement() {
        let mut scene = SceneState::new();
        let id = place_box_at(&mut scene, 0.0, 0.0, 10.0);
        let history_before = scene.history_len();

        assert!(scene.begin_drag(&id));
        scene.translate(&id, 5.0, 0.0, 0.0);
        assert_eq!(scene.end_drag(), DragOutcome::Committed);
        assert_eq!(scene.history_len(), history_before + 1);
        assert_eq!(scene.get(&id).unwrap().transform.position[0], 5.0);
    }

    #[test]
    fn test_drag_reverts_on_collision() {
        let mut scene = SceneState::new();
        let a = place_box_at(&mut scene, 0.0, 0.0, 10.0);
        let _b = place_box_at(&mut scene, 5.0, 0.0, 20.0);
        let history_before = scene.history_len();

        assert!(scene.begin_drag(&a));
        // Move a onto b
        scene.translate(&a, 4.9, 0.0, 0.0);
        assert_eq!(scene.end_drag(), DragOutcome::Reverted);
        // Transform restored, nothing committed
        assert_eq!(scene.get(&a).unwrap().transform.position[0], 0.0);
        assert_eq!(scene.history_len(), history_before);
    }

    #[test]
    fn test_end_drag_without_begin() {
        let mut scene = SceneState::new();
        assert_eq!(scene.end_drag(), DragOutcome::NoDrag);
    }

    #[test]
    fn test_snap_to_ground_ignores_floors() {
        let mut scene = SceneState::new();
        let id = scene
            .create_rect_floor(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 4.0), 40.0)
            .unwrap();
        assert!(!scene.snap_to_ground(&id));
    }
}
