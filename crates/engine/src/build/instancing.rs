//! Batched instance groups: one shared geometry per part type, per-instance
//! transform and color. Draw-call count stays constant however long the run is.

use glam::{DMat4, DQuat, DVec3, EulerRot};

/// Distinct fence part types; each gets at most one instance group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Post,
    Rail,
    Slat,
}

/// Shared local-space geometry of an instance group
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartGeometry {
    /// Box with full extents, centered on the origin
    Box { x: f64, y: f64, z: f64 },
    /// Cylinder with its height along Y (posts)
    CylinderY { radius: f64, height: f64, segments: u32 },
    /// Cylinder with its height along Z (rails laid along the run)
    CylinderZ { radius: f64, height: f64, segments: u32 },
}

impl PartGeometry {
    /// Local-space bounding extents (x, y, z)
    pub fn extents(&self) -> DVec3 {
        match self {
            PartGeometry::Box { x, y, z } => DVec3::new(*x, *y, *z),
            PartGeometry::CylinderY { radius, height, .. } => {
                DVec3::new(radius * 2.0, *height, radius * 2.0)
            }
            PartGeometry::CylinderZ { radius, height, .. } => {
                DVec3::new(radius * 2.0, radius * 2.0, *height)
            }
        }
    }
}

/// One instance placement: TRS with Euler XYZ rotation in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl InstanceTransform {
    pub fn new(position: DVec3, rotation: DVec3, scale: DVec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            self.scale,
            DQuat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            self.position,
        )
    }
}

/// A batch of instances sharing one geometry
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceGroup {
    pub part: PartKind,
    pub geometry: PartGeometry,
    pub transforms: Vec<InstanceTransform>,
    /// Per-instance color as 0xRRGGBB, parallel to `transforms`
    pub colors: Vec<u32>,
}

impl InstanceGroup {
    pub fn new(part: PartKind, geometry: PartGeometry) -> Self {
        Self {
            part,
            geometry,
            transforms: Vec::new(),
            colors: Vec::new(),
        }
    }

    pub fn push(&mut self, transform: InstanceTransform, color: u32) {
        self.transforms.push(transform);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Drop the instance buffers; the geometry descriptor stays
    pub fn release(&mut self) {
        self.transforms = Vec::new();
        self.colors = Vec::new();
    }
}

/// 0xRRGGBB → linear-ish [r, g, b] floats for the renderer
pub fn color_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_buffers_parallel() {
        let mut group = InstanceGroup::new(
            PartKind::Post,
            PartGeometry::Box {
                x: 0.1,
                y: 1.0,
                z: 0.1,
            },
        );
        group.push(
            InstanceTransform::new(DVec3::ZERO, DVec3::ZERO, DVec3::ONE),
            0xff0000,
        );
        group.push(
            InstanceTransform::new(DVec3::X, DVec3::ZERO, DVec3::ONE),
            0x00ff00,
        );
        assert_eq!(group.len(), 2);
        assert_eq!(group.transforms.len(), group.colors.len());
    }

    #[test]
    fn test_release_clears_instances() {
        let mut group = InstanceGroup::new(
            PartKind::Slat,
            PartGeometry::Box {
                x: 0.02,
                y: 1.0,
                z: 0.1,
            },
        );
        group.push(
            InstanceTransform::new(DVec3::ZERO, DVec3::ZERO, DVec3::ONE),
            0x123456,
        );
        group.release();
        assert!(group.is_empty());
        assert!(group.colors.is_empty());
    }

    #[test]
    fn test_matrix_applies_translation() {
        let t = InstanceTransform::new(DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO, DVec3::ONE);
        let m = t.matrix();
        let p = m.transform_point3(DVec3::ZERO);
        assert!((p - DVec3::new(1.0, 2.0, 3.0)).length() < 1e-12);
    }

    #[test]
    fn test_cylinder_extents() {
        let g = PartGeometry::CylinderZ {
            radius: 0.03,
            height: 1.0,
            segments: 8,
        };
        assert_eq!(g.extents(), DVec3::new(0.06, 0.06, 1.0));
    }

    #[test]
    fn test_color_rgb() {
        let [r, g, b] = color_rgb(0xff8000);
        assert!((r - 1.0).abs() < 1e-6);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert!(b.abs() < 1e-6);
    }
}
