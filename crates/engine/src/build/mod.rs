//! Procedural construction: polylines to instanced fences, boundary points to
//! priced floor surfaces.

mod fence;
mod floor;
mod instancing;
mod spline;

pub use fence::{build_fence, FenceBuild, MODULE_LENGTH};
pub use floor::{
    floor_price, rectangle_outline, resolve_boundary, shoelace_area, FloorGeometry,
    ResolvedBoundary,
};
pub use instancing::{InstanceGroup, InstanceTransform, PartGeometry, PartKind};
pub use spline::CatmullRom;

use glam::DVec3;
use shared::Point3;

/// shared::Point3 → glam world vector
pub fn point_to_vec(p: &Point3) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

/// glam world vector → shared::Point3
pub fn vec_to_point(v: DVec3) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}
