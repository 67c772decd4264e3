use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier of an entity in the scene
pub type ObjectId = String;

/// Identifier of a cached binary asset payload
pub type AssetId = String;

fn default_true() -> bool {
    true
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// Object transform (Euler XYZ rotation, radians)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Identity transform at a given position
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
            ..Self::new()
        }
    }
}

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A floor boundary vertex; curve-flagged vertices are smoothed through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub pos: Point3,
    #[serde(default)]
    pub is_curve: bool,
}

impl BoundaryPoint {
    pub fn straight(x: f64, y: f64, z: f64) -> Self {
        Self {
            pos: Point3::new(x, y, z),
            is_curve: false,
        }
    }

    pub fn curved(x: f64, y: f64, z: f64) -> Self {
        Self {
            pos: Point3::new(x, y, z),
            is_curve: true,
        }
    }
}

/// Descriptive attributes shared by every placed entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Display name
    pub name: String,
    /// Catalog reference code
    #[serde(default)]
    pub reference: String,
    /// Price in currency units
    pub price: f64,
    /// Human-readable dimension string ("10.00x8.00", "12.50m", ...)
    #[serde(default)]
    pub dims: String,
    /// Locked entities reject transform and delete
    #[serde(default)]
    pub locked: bool,
    /// Entities with collides = false are ignored by spatial checks
    #[serde(default = "default_true")]
    pub collides: bool,
}

impl EntityInfo {
    pub fn new(name: impl Into<String>, reference: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            price,
            dims: String::new(),
            locked: false,
            collides: true,
        }
    }
}

/// Texture placement settings for image-backed floors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureMapping {
    pub repeat: f64,
    pub rotation: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for TextureMapping {
    fn default() -> Self {
        Self {
            repeat: 1.0,
            rotation: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Geometric form of a floor surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FloorShape {
    /// Closed boundary of straight/curved vertices (at least 3)
    Boundary { points: Vec<BoundaryPoint> },
    /// Axis-aligned rectangle, centered on the entity position
    Rectangle { width: f64, height: f64 },
    /// Image-backed plane with explicit real-world dimensions
    ImagePlane { width: f64, height: f64 },
}

/// Floor surface attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorAttrs {
    #[serde(flatten)]
    pub info: EntityInfo,
    pub shape: FloorShape,
    /// Surface area in square units
    pub area: f64,
    /// Surface color as 0xRRGGBB
    pub color: u32,
    /// Inline texture payload (data URI), if a texture was applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<TextureMapping>,
}

/// Fence style selector; geometry rules live in the engine preset table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FenceStyleKind {
    #[default]
    Wood,
    MetalSlats,
    WidePanel,
    GamePanel,
}

/// Per-part color overrides as 0xRRGGBB; missing slat colors fall back to slat_a
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenceColors {
    pub post: u32,
    pub slat_a: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slat_b: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slat_c: Option<u32>,
}

/// Fence run attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenceAttrs {
    #[serde(flatten)]
    pub info: EntityInfo,
    /// Polyline the fence follows (at least 2 points)
    pub points: Vec<Point3>,
    pub style: FenceStyleKind,
    pub colors: FenceColors,
    /// Total polyline length
    pub length: f64,
}

/// Catalog or imported model attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAttrs {
    #[serde(flatten)]
    pub info: EntityInfo,
    /// Source URL of the mesh asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file: Option<String>,
    /// Asset-cache reference; when set, `payload` is stripped from snapshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<AssetId>,
    /// Inline base64 model data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// true for user-imported models (vs. catalog placements)
    #[serde(default)]
    pub imported: bool,
}

/// Serialized record of one placed entity: type tag + transform + attributes.
/// Used both for history snapshots and project files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneItem {
    Floor {
        transform: Transform,
        attrs: FloorAttrs,
    },
    Fence {
        transform: Transform,
        attrs: FenceAttrs,
    },
    Model {
        transform: Transform,
        attrs: ModelAttrs,
    },
}

impl SceneItem {
    pub fn transform(&self) -> &Transform {
        match self {
            SceneItem::Floor { transform, .. } => transform,
            SceneItem::Fence { transform, .. } => transform,
            SceneItem::Model { transform, .. } => transform,
        }
    }

    pub fn info(&self) -> &EntityInfo {
        match self {
            SceneItem::Floor { attrs, .. } => &attrs.info,
            SceneItem::Fence { attrs, .. } => &attrs.info,
            SceneItem::Model { attrs, .. } => &attrs.info,
        }
    }

    pub fn price(&self) -> f64 {
        self.info().price
    }
}

/// Persisted project payload: entity records plus the deduplicated asset cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectData {
    pub items: Vec<SceneItem>,
    #[serde(default)]
    pub asset_cache: HashMap<AssetId, String>,
    #[serde(default)]
    pub total_price: f64,
}
