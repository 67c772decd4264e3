//! Entity CRUD: builder-backed creation, placement, clone, delete, and
//! attribute toggles.

use glam::DVec3;
use shared::{
    AssetId, BoundaryPoint, EntityInfo, FenceAttrs, FenceColors, FenceStyleKind, FloorAttrs,
    FloorShape, ModelAttrs, ObjectId, Point3, TextureMapping, Transform,
};

use crate::build::{
    build_fence, floor_price, point_to_vec, rectangle_outline, resolve_boundary, FloorGeometry,
};
use crate::loader::LoadedModel;
use crate::presets;

use super::{EntityPayload, PlacedEntity, SceneState};

/// Smallest accepted rectangle floor edge
const MIN_RECT_EDGE: f64 = 0.2;

impl SceneState {
    /// Build a fence along `points` and append it. Returns None (and commits
    /// nothing) when the polyline is degenerate.
    pub fn create_fence(
        &mut self,
        points: Vec<Point3>,
        style: FenceStyleKind,
        colors: Option<FenceColors>,
    ) -> Option<ObjectId> {
        let preset = presets::fence_style(style);
        let colors = colors.unwrap_or(preset.default_colors);

        let path: Vec<DVec3> = points.iter().map(point_to_vec).collect();
        let build = build_fence(&path, style, &colors)?;

        let mut info = EntityInfo::new(preset.name, preset.reference, build.price);
        info.dims = format!("{:.2}m", build.total_length);

        let attrs = FenceAttrs {
            info,
            points,
            style,
            colors,
            length: build.total_length,
        };

        let id = Self::next_id();
        self.push_entity(PlacedEntity {
            id: id.clone(),
            transform: Transform::new(),
            payload: EntityPayload::Fence { attrs, build },
        });
        self.commit();
        Some(id)
    }

    /// Fence with the style's default colors
    pub fn create_fence_default(&mut self, points: Vec<Point3>) -> Option<ObjectId> {
        self.create_fence(points, FenceStyleKind::Wood, None)
    }

    /// Resolve a drawn boundary into a priced floor surface.
    /// Returns None for fewer than 3 points.
    pub fn create_boundary_floor(
        &mut self,
        points: Vec<BoundaryPoint>,
        rate: f64,
    ) -> Option<ObjectId> {
        let resolved = resolve_boundary(&points)?;
        let price = floor_price(resolved.area, rate);

        let mut info = EntityInfo::new("Mixed Surface", "FLR-MIX", price);
        info.dims = format!("{:.2} m2", resolved.area);

        let attrs = FloorAttrs {
            info,
            shape: FloorShape::Boundary { points },
            area: resolved.area,
            color: presets::FLOOR_GARNET,
            image: None,
            mapping: None,
        };

        let id = Self::next_id();
        self.push_entity(PlacedEntity {
            id: id.clone(),
            // Boundary points are world-space; the surface floats just above
            // the ground plane
            transform: Transform::at(0.0, 0.01, 0.0),
            payload: EntityPayload::Floor {
                attrs,
                geometry: FloorGeometry::new(resolved.boundary),
            },
        });
        self.commit();
        Some(id)
    }

    /// Rectangle floor from a corner drag. Degenerate drags (either edge under
    /// 0.2) are rejected.
    pub fn create_rect_floor(&mut self, from: Point3, to: Point3, rate: f64) -> Option<ObjectId> {
        let width = (to.x - from.x).abs();
        let depth = (to.z - from.z).abs();
        if width < MIN_RECT_EDGE || depth < MIN_RECT_EDGE {
            return None;
        }
        let center_x = (from.x + to.x) / 2.0;
        let center_z = (from.z + to.z) / 2.0;

        let area = width * depth;
        let price = floor_price(area, rate);

        let mut info = EntityInfo::new("Rectangular Surface", "FLR-RECT", price);
        info.dims = format!("{width:.2}x{depth:.2}");

        let attrs = FloorAttrs {
            info,
            shape: FloorShape::Rectangle {
                width,
                height: depth,
            },
            area,
            color: presets::FLOOR_GARNET,
            image: None,
            mapping: None,
        };

        let id = Self::next_id();
        self.push_entity(PlacedEntity {
            id: id.clone(),
            transform: Transform::at(center_x, 0.01, center_z),
            payload: EntityPayload::Floor {
                attrs,
                geometry: FloorGeometry::new(rectangle_outline(width, depth)),
            },
        });
        self.commit();
        Some(id)
    }

    /// Image-backed plane with explicit dimensions; priced at zero
    pub fn create_image_floor(
        &mut self,
        name: &str,
        width: f64,
        height: f64,
        payload: Option<String>,
    ) -> ObjectId {
        let mut info = EntityInfo::new(format!("Floor: {name}"), "IMG", 0.0);
        info.dims = format!("{width:.2}x{height:.2}");

        let attrs = FloorAttrs {
            info,
            shape: FloorShape::ImagePlane { width, height },
            area: width * height,
            color: 0xffffff,
            image: payload,
            mapping: None,
        };

        let id = Self::next_id();
        self.push_entity(PlacedEntity {
            id: id.clone(),
            transform: Transform::at(0.0, 0.05, 0.0),
            payload: EntityPayload::Floor {
                attrs,
                geometry: FloorGeometry::new(rectangle_outline(width, height)),
            },
        });
        self.commit();
        id
    }

    /// Store an imported payload in the asset cache under a fresh id
    pub fn register_asset(&mut self, payload: String) -> AssetId {
        let asset_id = format!("import_{}", uuid::Uuid::new_v4());
        self.asset_cache.insert(asset_id.clone(), payload);
        self.version += 1;
        asset_id
    }

    /// Append an already-loaded model at a ground position. The loader was
    /// awaited by the caller; nothing is mutated on load failure upstream.
    pub fn place_model(
        &mut self,
        mut attrs: ModelAttrs,
        model: LoadedModel,
        at: Point3,
    ) -> ObjectId {
        // The cache already holds the payload; keep only the reference
        if attrs.asset_id.is_some() {
            attrs.payload = None;
        }

        let id = Self::next_id();
        self.push_entity(PlacedEntity {
            id: id.clone(),
            transform: Transform::at(at.x, 0.0, at.z),
            payload: EntityPayload::Model { attrs, model },
        });
        self.snap_to_ground(&id);
        self.commit();
        id
    }

    /// Delete an entity unless it is locked
    pub fn delete(&mut self, id: &str) -> bool {
        match self.get(id) {
            Some(entity) if entity.info().locked => return false,
            Some(_) => {}
            None => return false,
        }
        self.remove_entity(id);
        self.commit();
        true
    }

    /// Duplicate an entity with a fresh id, offset one unit on x and z.
    /// Floors are not cloneable.
    pub fn clone_entity(&mut self, id: &str) -> Option<ObjectId> {
        let source = self.get(id)?;

        let payload = match &source.payload {
            EntityPayload::Floor { .. } => return None,
            EntityPayload::Fence { attrs, build } => EntityPayload::Fence {
                attrs: attrs.clone(),
                build: build.clone(),
            },
            EntityPayload::Model { attrs, model } => EntityPayload::Model {
                attrs: clone_model_attrs(attrs),
                model: model.clone(),
            },
        };

        let mut transform = source.transform.clone();
        transform.position[0] += 1.0;
        transform.position[2] += 1.0;

        let new_id = Self::next_id();
        self.push_entity(PlacedEntity {
            id: new_id.clone(),
            transform,
            payload,
        });
        self.snap_to_ground(&new_id);
        self.commit();
        Some(new_id)
    }

    /// Toggle the transform/delete lock; returns the new state
    pub fn toggle_locked(&mut self, id: &str) -> Option<bool> {
        let info = self.get_mut(id)?.info_mut();
        info.locked = !info.locked;
        let locked = info.locked;
        self.version += 1;
        self.commit();
        Some(locked)
    }

    /// Toggle participation in spatial checks; returns the new state
    pub fn toggle_collides(&mut self, id: &str) -> Option<bool> {
        let info = self.get_mut(id)?.info_mut();
        info.collides = !info.collides;
        let collides = info.collides;
        self.version += 1;
        self.commit();
        Some(collides)
    }

    /// Recolor a generated floor surface
    pub fn set_floor_color(&mut self, id: &str, color: u32) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        let EntityPayload::Floor { attrs, .. } = &mut entity.payload else {
            return false;
        };
        attrs.color = color;
        self.version += 1;
        self.commit();
        true
    }

    /// Apply a texture payload to a floor; renames it after the source file
    pub fn apply_floor_texture(&mut self, id: &str, payload: String, filename: &str) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        let EntityPayload::Floor { attrs, .. } = &mut entity.payload else {
            return false;
        };
        attrs.image = Some(payload);
        attrs.mapping = Some(TextureMapping::default());
        attrs.info.name = format!("Floor: {filename}");
        self.version += 1;
        self.commit();
        true
    }

    /// Live texture-mapping adjustment; not a committed mutation
    pub fn set_texture_mapping(&mut self, id: &str, mapping: TextureMapping) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        let EntityPayload::Floor { attrs, .. } = &mut entity.payload else {
            return false;
        };
        attrs.mapping = Some(mapping);
        self.version += 1;
        true
    }
}

/// Explicit model-attribute copy: every field duplicated, transient blob URLs
/// dropped so the clone never references a handle it does not own
fn clone_model_attrs(attrs: &ModelAttrs) -> ModelAttrs {
    let mut copy = attrs.clone();
    if copy
        .model_file
        .as_deref()
        .is_some_and(|url| url.starts_with("blob:"))
    {
        copy.model_file = None;
    }
    copy
}
