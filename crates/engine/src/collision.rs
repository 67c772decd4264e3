//! Spatial queries: oriented bounding boxes, separating-axis tests, and the
//! fence segment-distance check.
//!
//! Fences are deliberately treated as zero-width polylines with a fixed
//! clearance, not as boxes; nearby placement stays legal even where the
//! rendered fence has thickness.

use glam::{DMat3, DMat4, DQuat, DVec3, EulerRot};
use shared::Transform;

use crate::build::point_to_vec;
use crate::mesh::MeshData;
use crate::state::scene::{EntityPayload, PlacedEntity, SceneState};

/// Other entities further away than this are not tested at all
pub const BROAD_PHASE_RADIUS: f64 = 20.0;

/// OBBs are shrunk by 5% so touching surfaces do not count as hits
pub const OBB_SHRINK: f64 = 0.95;

/// Hit distance between a moving entity's centre and a fence segment
pub const FENCE_CLEARANCE: f64 = 0.8;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every vertex of the mesh (9-float stride)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);

        let stride = 9;
        let count = data.vertices.len() / stride;
        for i in 0..count {
            let base = i * stride;
            let p = DVec3::new(
                data.vertices[base] as f64,
                data.vertices[base + 1] as f64,
                data.vertices[base + 2] as f64,
            );
            min = min.min(p);
            max = max.max(p);
        }

        if count == 0 {
            return Self::new(DVec3::ZERO, DVec3::ZERO);
        }
        Self { min, max }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn expand(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Oriented bounding box: centre, half extents, and world-space axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    pub center: DVec3,
    pub half: DVec3,
    pub axes: DMat3,
}

/// TRS matrix of an entity transform
pub fn transform_matrix(t: &Transform) -> DMat4 {
    DMat4::from_scale_rotation_translation(
        DVec3::from(t.scale),
        DQuat::from_euler(EulerRot::XYZ, t.rotation[0], t.rotation[1], t.rotation[2]),
        DVec3::from(t.position),
    )
}

fn rotation_matrix(euler: [f64; 3]) -> DMat3 {
    DMat3::from_euler(EulerRot::XYZ, euler[0], euler[1], euler[2])
}

/// Component-wise absolute value of a rotation matrix (AABB of a rotated box)
fn abs_mat(m: DMat3) -> DMat3 {
    DMat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs())
}

/// Bounds of an entity's own geometry with rotation zeroed and scale applied,
/// relative to the entity origin
pub fn entity_local_bounds(entity: &PlacedEntity) -> Option<Aabb> {
    let mut bounds: Option<Aabb> = None;
    let mut grow = |min: DVec3, max: DVec3| {
        let b = Aabb::new(min, max);
        bounds = Some(match &bounds {
            Some(existing) => existing.union(&b),
            None => b,
        });
    };

    match &entity.payload {
        EntityPayload::Fence { build, .. } => {
            for group in &build.groups {
                let ext = group.geometry.extents();
                for inst in &group.transforms {
                    let rot = DMat3::from_euler(
                        EulerRot::XYZ,
                        inst.rotation.x,
                        inst.rotation.y,
                        inst.rotation.z,
                    );
                    let half = abs_mat(rot) * (ext * inst.scale * 0.5);
                    grow(inst.position - half, inst.position + half);
                }
            }
        }
        EntityPayload::Floor { geometry, .. } => {
            for p in &geometry.outline {
                grow(DVec3::new(p.x, 0.0, p.y), DVec3::new(p.x, 0.05, p.y));
            }
        }
        EntityPayload::Model { model, .. } => {
            grow(model.bounds.min, model.bounds.max);
        }
    }

    bounds.map(|b| {
        let scale = DVec3::from(entity.transform.scale);
        Aabb::new(b.min * scale, b.max * scale)
    })
}

/// Build the entity's OBB: local bounds with rotation zeroed, shrunk by 5%,
/// then re-oriented and positioned in world space
pub fn obb_from_entity(entity: &PlacedEntity) -> Option<Obb> {
    let local = entity_local_bounds(entity)?;
    let half = local.size() * OBB_SHRINK * 0.5;
    let rot = rotation_matrix(entity.transform.rotation);
    let offset = rot * local.center();
    let center = DVec3::from(entity.transform.position) + offset;
    Some(Obb {
        center,
        half,
        axes: rot,
    })
}

/// World-space AABB of an entity (unshrunk), for ground snapping
pub fn world_aabb(entity: &PlacedEntity) -> Option<Aabb> {
    let local = entity_local_bounds(entity)?;
    let rot = rotation_matrix(entity.transform.rotation);
    let center = DVec3::from(entity.transform.position) + rot * local.center();
    let half = abs_mat(rot) * (local.size() * 0.5);
    Some(Aabb::new(center - half, center + half))
}

/// OBB-OBB intersection via the 15-axis separating-axis test
pub fn obb_intersects(a: &Obb, b: &Obb) -> bool {
    const EPS: f64 = 1e-10;

    let a_axes = [a.axes.col(0), a.axes.col(1), a.axes.col(2)];
    let b_axes = [b.axes.col(0), b.axes.col(1), b.axes.col(2)];

    // b's frame expressed in a's frame, plus epsilon against parallel axes
    let mut r = [[0.0; 3]; 3];
    let mut abs_r = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = a_axes[i].dot(b_axes[j]);
            abs_r[i][j] = r[i][j].abs() + EPS;
        }
    }

    let t_world = b.center - a.center;
    let t = [
        t_world.dot(a_axes[0]),
        t_world.dot(a_axes[1]),
        t_world.dot(a_axes[2]),
    ];
    let ae = [a.half.x, a.half.y, a.half.z];
    let be = [b.half.x, b.half.y, b.half.z];

    // a's face axes
    for i in 0..3 {
        let ra = ae[i];
        let rb = be[0] * abs_r[i][0] + be[1] * abs_r[i][1] + be[2] * abs_r[i][2];
        if t[i].abs() > ra + rb {
            return false;
        }
    }

    // b's face axes
    for j in 0..3 {
        let ra = ae[0] * abs_r[0][j] + ae[1] * abs_r[1][j] + ae[2] * abs_r[2][j];
        let rb = be[j];
        if (t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j]).abs() > ra + rb {
            return false;
        }
    }

    // edge-edge cross axes
    for i in 0..3 {
        for j in 0..3 {
            let i1 = (i + 1) % 3;
            let i2 = (i + 2) % 3;
            let j1 = (j + 1) % 3;
            let j2 = (j + 2) % 3;
            let ra = ae[i1] * abs_r[i2][j] + ae[i2] * abs_r[i1][j];
            let rb = be[j1] * abs_r[i][j2] + be[j2] * abs_r[i][j1];
            if (t[i2] * r[i1][j] - t[i1] * r[i2][j]).abs() > ra + rb {
                return false;
            }
        }
    }

    true
}

/// Distance from a point to a segment
pub fn point_segment_distance(p: DVec3, a: DVec3, b: DVec3) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Test a moving entity against every other collidable, non-floor entity.
/// Advisory: the caller decides whether to revert the pending transform.
pub fn check_collision(scene: &SceneState, id: &str) -> bool {
    let me = match scene.get(id) {
        Some(e) => e,
        None => return false,
    };
    if !me.info().collides {
        return false;
    }
    let my_obb = match obb_from_entity(me) {
        Some(o) => o,
        None => return false,
    };
    let my_pos = DVec3::from(me.transform.position);

    for other in scene.entities() {
        if other.id == id {
            continue;
        }
        if !other.info().collides || other.is_floor() {
            continue;
        }
        let other_pos = DVec3::from(other.transform.position);
        if other_pos.distance(my_pos) > BROAD_PHASE_RADIUS {
            continue;
        }

        let hit = if let EntityPayload::Fence { attrs, .. } = &other.payload {
            // Fence: distance from our centre to its polyline in world space
            let mat = transform_matrix(&other.transform);
            attrs.points.windows(2).any(|pair| {
                let p1 = mat.transform_point3(point_to_vec(&pair[0]));
                let p2 = mat.transform_point3(point_to_vec(&pair[1]));
                point_segment_distance(my_pos, p1, p2) < FENCE_CLEARANCE
            })
        } else {
            obb_from_entity(other).is_some_and(|o| obb_intersects(&my_obb, &o))
        };

        if hit {
            return true;
        }
    }
    false
}
