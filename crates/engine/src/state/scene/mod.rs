//! Scene state: the owned entity list, asset cache, running price total, and
//! the undo/redo snapshot stack.

mod display;
mod entity_ops;
mod history;
mod persistence;
mod transform_ops;

pub use display::{entity_display_name, short_id};
pub use transform_ops::DragOutcome;

use std::collections::HashMap;

use shared::{AssetId, EntityInfo, FenceAttrs, FloorAttrs, ModelAttrs, ObjectId, SceneItem, Transform};

use crate::build::{FenceBuild, FloorGeometry};
use crate::loader::LoadedModel;

/// History snapshots kept; older entries are evicted from the head
pub const HISTORY_CAPACITY: usize = 50;

/// Variant payload of a placed entity: serializable attributes plus the owned
/// built graphics
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPayload {
    Floor {
        attrs: FloorAttrs,
        geometry: FloorGeometry,
    },
    Fence {
        attrs: FenceAttrs,
        build: FenceBuild,
    },
    Model {
        attrs: ModelAttrs,
        model: LoadedModel,
    },
}

/// One entity owned by the scene entity list
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEntity {
    pub id: ObjectId,
    pub transform: Transform,
    pub payload: EntityPayload,
}

impl PlacedEntity {
    pub fn info(&self) -> &EntityInfo {
        match &self.payload {
            EntityPayload::Floor { attrs, .. } => &attrs.info,
            EntityPayload::Fence { attrs, .. } => &attrs.info,
            EntityPayload::Model { attrs, .. } => &attrs.info,
        }
    }

    pub fn info_mut(&mut self) -> &mut EntityInfo {
        match &mut self.payload {
            EntityPayload::Floor { attrs, .. } => &mut attrs.info,
            EntityPayload::Fence { attrs, .. } => &mut attrs.info,
            EntityPayload::Model { attrs, .. } => &mut attrs.info,
        }
    }

    pub fn price(&self) -> f64 {
        self.info().price
    }

    pub fn is_floor(&self) -> bool {
        matches!(self.payload, EntityPayload::Floor { .. })
    }

    pub fn is_fence(&self) -> bool {
        matches!(self.payload, EntityPayload::Fence { .. })
    }

    /// Serializable record of this entity (type tag + transform + attributes)
    pub fn to_item(&self) -> SceneItem {
        match &self.payload {
            EntityPayload::Floor { attrs, .. } => SceneItem::Floor {
                transform: self.transform.clone(),
                attrs: attrs.clone(),
            },
            EntityPayload::Fence { attrs, .. } => SceneItem::Fence {
                transform: self.transform.clone(),
                attrs: attrs.clone(),
            },
            EntityPayload::Model { attrs, .. } => SceneItem::Model {
                transform: self.transform.clone(),
                attrs: attrs.clone(),
            },
        }
    }

    /// Synchronously release owned graphics buffers. Must run before the
    /// entity is dropped from the list so memory stays bounded across
    /// repeated undo/redo cycles.
    pub fn release_graphics(&mut self) {
        match &mut self.payload {
            EntityPayload::Floor { geometry, .. } => geometry.release(),
            EntityPayload::Fence { build, .. } => build.release(),
            EntityPayload::Model { model, .. } => model.release(),
        }
    }
}

/// The scene: entity list, asset cache, price total, and history stack.
/// All mutation goes through the operations on this type; collaborators only
/// read.
pub struct SceneState {
    entities: Vec<PlacedEntity>,
    /// Deduplicated binary payloads shared by entities and snapshots
    pub asset_cache: HashMap<AssetId, String>,
    total_price: f64,
    /// Serialized snapshots, oldest first
    history: Vec<String>,
    /// Index of the snapshot matching the current state
    cursor: usize,
    /// Monotonically increasing change counter for cache invalidation
    version: u64,
    drag_origin: Option<(ObjectId, Transform)>,
    autosave_warned: bool,
}

impl SceneState {
    /// Empty scene with the initial empty snapshot committed
    pub fn new() -> Self {
        let mut state = Self {
            entities: Vec::new(),
            asset_cache: HashMap::new(),
            total_price: 0.0,
            history: Vec::new(),
            cursor: 0,
            version: 0,
            drag_origin: None,
            autosave_warned: false,
        };
        state.history.push(state.snapshot_json());
        state
    }

    pub fn entities(&self) -> &[PlacedEntity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn get(&self, id: &str) -> Option<&PlacedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlacedEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> usize {
        self.cursor
    }

    /// Recompute the running total from the entity list. Called explicitly
    /// after every list mutation instead of reacting to field writes.
    pub fn recompute_total(&mut self) {
        self.total_price = self.entities.iter().map(PlacedEntity::price).sum();
    }

    pub(crate) fn next_id() -> ObjectId {
        uuid::Uuid::new_v4().to_string()
    }

    pub(crate) fn push_entity(&mut self, entity: PlacedEntity) {
        self.entities.push(entity);
        self.recompute_total();
        self.version += 1;
    }

    /// Release and drop every entity; price resets to zero
    pub(crate) fn clear_entities(&mut self) {
        for entity in &mut self.entities {
            entity.release_graphics();
        }
        self.entities.clear();
        self.total_price = 0.0;
        self.version += 1;
    }

    pub(crate) fn remove_entity(&mut self, id: &str) -> Option<PlacedEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        let mut entity = self.entities.remove(index);
        entity.release_graphics();
        self.recompute_total();
        self.version += 1;
        Some(entity)
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}
