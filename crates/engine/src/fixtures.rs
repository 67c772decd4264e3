//! Factory functions for test data: boundaries, polylines, attributes, and
//! project payloads.

use shared::{BoundaryPoint, EntityInfo, ModelAttrs, Point3};

// ── Polylines ───────────────────────────────────────────────

/// Straight fence run of the given length along +X
pub fn straight_run(length: f64) -> Vec<Point3> {
    vec![Point3::new(0.0, 0.0, 0.0), Point3::new(length, 0.0, 0.0)]
}

/// L-shaped fence run
pub fn l_shaped_run() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(6.0, 0.0, 0.0),
        Point3::new(6.0, 0.0, 4.0),
    ]
}

// ── Boundaries ──────────────────────────────────────────────

/// Axis-aligned rectangle boundary, straight corners
pub fn rect_boundary(width: f64, depth: f64) -> Vec<BoundaryPoint> {
    vec![
        BoundaryPoint::straight(0.0, 0.0, 0.0),
        BoundaryPoint::straight(width, 0.0, 0.0),
        BoundaryPoint::straight(width, 0.0, depth),
        BoundaryPoint::straight(0.0, 0.0, depth),
    ]
}

/// Boundary with one curved side
pub fn mixed_boundary() -> Vec<BoundaryPoint> {
    vec![
        BoundaryPoint::straight(0.0, 0.0, 0.0),
        BoundaryPoint::straight(10.0, 0.0, 0.0),
        BoundaryPoint::curved(12.0, 0.0, 4.0),
        BoundaryPoint::straight(10.0, 0.0, 8.0),
        BoundaryPoint::straight(0.0, 0.0, 8.0),
    ]
}

// ── Attributes ──────────────────────────────────────────────

/// Catalog model attributes with a plain URL source
pub fn catalog_model_attrs(name: &str, price: f64) -> ModelAttrs {
    ModelAttrs {
        info: EntityInfo::new(name, "CAT-01", price),
        model_file: Some(format!("https://example.com/{name}.glb")),
        asset_id: None,
        payload: None,
        imported: false,
    }
}

/// Imported model attributes referencing an asset-cache entry
pub fn imported_model_attrs(name: &str, asset_id: &str, price: f64) -> ModelAttrs {
    ModelAttrs {
        info: EntityInfo::new(name, "IMP-01", price),
        model_file: None,
        asset_id: Some(asset_id.to_string()),
        payload: None,
        imported: true,
    }
}
