//! Floor surface construction: mixed straight/curved boundaries, rectangles,
//! and image-backed planes, all priced by area.

use glam::DVec3;
use kurbo::Point;
use shared::BoundaryPoint;

use super::point_to_vec;
use super::spline::CatmullRom;

/// Spline samples per point of a curve run
const CURVE_SAMPLES_PER_POINT: usize = 10;

/// A resolved closed boundary in the ground plane plus its area
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBoundary {
    /// Closed outline, projected to (x, z)
    pub boundary: Vec<Point>,
    pub area: f64,
}

/// Owned floor outline geometry, released on entity destruction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloorGeometry {
    pub outline: Vec<Point>,
}

impl FloorGeometry {
    pub fn new(outline: Vec<Point>) -> Self {
        Self { outline }
    }

    pub fn release(&mut self) {
        self.outline = Vec::new();
    }
}

/// Resolve a drawn boundary into a closed outline and area.
/// Returns None for degenerate input (< 3 points).
///
/// Each maximal run of curve-flagged points is widened by its neighbouring
/// anchors and replaced with centripetal spline samples; duplicated endpoints
/// shared with adjacent sub-sequences are trimmed before concatenation.
pub fn resolve_boundary(points: &[BoundaryPoint]) -> Option<ResolvedBoundary> {
    if points.len() < 3 {
        return None;
    }

    let n = points.len();
    let mut resolved: Vec<DVec3> = Vec::new();
    let mut i = 0;

    while i < n {
        if points[i].is_curve {
            // Anchor before the run, the run itself, anchor after (wrapping)
            let mut seq = vec![
                point_to_vec(&points[(i + n - 1) % n].pos),
                point_to_vec(&points[i].pos),
            ];
            let mut j = i + 1;
            while j < n && points[j].is_curve {
                seq.push(point_to_vec(&points[j].pos));
                j += 1;
            }
            seq.push(point_to_vec(&points[j % n].pos));

            let divisions = seq.len() * CURVE_SAMPLES_PER_POINT;
            let mut samples = CatmullRom::new(seq).spaced_points(divisions);
            // Trim endpoints shared with the neighbouring sub-sequences
            if !resolved.is_empty() {
                samples.remove(0);
            }
            samples.pop();
            resolved.extend(samples);
            i = j;
        } else {
            resolved.push(point_to_vec(&points[i].pos));
            i += 1;
        }
    }

    let boundary: Vec<Point> = resolved.iter().map(|p| Point::new(p.x, p.z)).collect();
    let area = shoelace_area(&boundary);

    Some(ResolvedBoundary { boundary, area })
}

/// Shoelace area of a closed polygon; winding-independent
pub fn shoelace_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    (sum * 0.5).abs()
}

/// Price a surface area at the given rate
pub fn floor_price(area: f64, rate: f64) -> f64 {
    (area * rate).round()
}

/// Centered rectangle outline in the ground plane
pub fn rectangle_outline(width: f64, height: f64) -> Vec<Point> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    vec![
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(hw, hh),
        Point::new(-hw, hh),
    ]
}
