//! Draft state: click-point accumulation for fence and floor drawing, before
//! a builder turns the draft into a persistent entity.

use glam::DVec3;
use shared::{BoundaryPoint, Point3};

use crate::build::{point_to_vec, vec_to_point};

/// Active floor drawing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloorMode {
    #[default]
    Poly,
    Curve,
    Rect,
}

/// Accumulated draft points for the active drawing gesture
#[derive(Default)]
pub struct DraftState {
    fence_points: Vec<Point3>,
    floor_points: Vec<BoundaryPoint>,
    pub floor_mode: FloorMode,
    rect_start: Option<Point3>,
}

impl DraftState {
    // ── Fence draft ───────────────────────────────────────────

    pub fn add_fence_point(&mut self, p: Point3) {
        self.fence_points.push(p);
    }

    pub fn fence_points(&self) -> &[Point3] {
        &self.fence_points
    }

    pub fn can_finish_fence(&self) -> bool {
        self.fence_points.len() >= 2
    }

    /// Running length of the drafted polyline, for the preview label
    pub fn fence_preview_length(&self) -> f64 {
        self.fence_points
            .windows(2)
            .map(|pair| point_to_vec(&pair[0]).distance(point_to_vec(&pair[1])))
            .sum()
    }

    pub fn take_fence_points(&mut self) -> Vec<Point3> {
        std::mem::take(&mut self.fence_points)
    }

    pub fn clear_fence(&mut self) {
        self.fence_points.clear();
    }

    // ── Floor draft ───────────────────────────────────────────

    /// Add a click point; the active mode decides whether it is curve-flagged
    pub fn add_floor_point(&mut self, p: Point3) {
        self.floor_points.push(BoundaryPoint {
            pos: p,
            is_curve: self.floor_mode == FloorMode::Curve,
        });
    }

    /// Add a point by distance and turn angle (degrees) relative to the last
    /// drawn segment. The first point starts at the origin heading +X.
    pub fn add_floor_point_polar(&mut self, distance: f64, angle_deg: f64) -> bool {
        if distance <= 0.0 {
            return false;
        }
        let last = match self.floor_points.last() {
            Some(p) => point_to_vec(&p.pos),
            None => DVec3::ZERO,
        };

        let mut dir = DVec3::X;
        if self.floor_points.len() >= 2 {
            let prev = point_to_vec(&self.floor_points[self.floor_points.len() - 2].pos);
            dir = (last - prev).normalize_or(DVec3::X);
            let angle = angle_deg.to_radians();
            // Turn about the vertical axis
            let (sin, cos) = angle.sin_cos();
            dir = DVec3::new(dir.x * cos + dir.z * sin, dir.y, -dir.x * sin + dir.z * cos);
        }

        self.add_floor_point(vec_to_point(last + dir * distance));
        true
    }

    pub fn undo_last_floor_point(&mut self) -> bool {
        self.floor_points.pop().is_some()
    }

    pub fn floor_points(&self) -> &[BoundaryPoint] {
        &self.floor_points
    }

    pub fn can_finish_floor(&self) -> bool {
        self.floor_points.len() >= 3
    }

    /// Distance to the cursor and turn angle (rounded degrees) for the
    /// preview label
    pub fn floor_preview(&self, cursor: Point3) -> Option<(f64, i32)> {
        let last = self.floor_points.last()?;
        let last_v = point_to_vec(&last.pos);
        let cursor_v = point_to_vec(&cursor);
        let distance = last_v.distance(cursor_v);

        let mut angle = 0;
        if self.floor_points.len() >= 2 {
            let prev = point_to_vec(&self.floor_points[self.floor_points.len() - 2].pos);
            let a = (last_v - prev).normalize_or(DVec3::X);
            let b = (cursor_v - last_v).normalize_or(DVec3::X);
            angle = a.dot(b).clamp(-1.0, 1.0).acos().to_degrees().round() as i32;
        }
        Some((distance, angle))
    }

    pub fn take_floor_points(&mut self) -> Vec<BoundaryPoint> {
        std::mem::take(&mut self.floor_points)
    }

    pub fn clear_floor(&mut self) {
        self.floor_points.clear();
        self.rect_start = None;
    }

    // ── Rectangle drag ────────────────────────────────────────

    pub fn start_rect(&mut self, corner: Point3) {
        self.rect_start = Some(corner);
    }

    /// Current drag dimensions and centre, for the preview
    pub fn rect_preview(&self, cursor: Point3) -> Option<(f64, f64, Point3)> {
        let start = self.rect_start?;
        let width = (cursor.x - start.x).abs();
        let depth = (cursor.z - start.z).abs();
        let center = Point3::new((start.x + cursor.x) / 2.0, 0.0, (start.z + cursor.z) / 2.0);
        Some((width, depth, center))
    }

    pub fn take_rect_start(&mut self) -> Option<Point3> {
        self.rect_start.take()
    }

    /// Drop every draft in progress
    pub fn clear_all(&mut self) {
        self.clear_fence();
        self.clear_floor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_preview_length() {
        let mut draft = DraftState::default();
        draft.add_fence_point(Point3::new(0.0, 0.0, 0.0));
        assert!(!draft.can_finish_fence());
        draft.add_fence_point(Point3::new(3.0, 0.0, 0.0));
        draft.add_fence_point(Point3::new(3.0, 0.0, 4.0));
        assert!(draft.can_finish_fence());
        assert!((draft.fence_preview_length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_floor_mode_flags_curve_points() {
        let mut draft = DraftState::default();
        draft.add_floor_point(Point3::new(0.0, 0.0, 0.0));
        draft.floor_mode = FloorMode::Curve;
        draft.add_floor_point(Point3::new(1.0, 0.0, 0.0));
        assert!(!draft.floor_points()[0].is_curve);
        assert!(draft.floor_points()[1].is_curve);
    }

    #[test]
    fn test_undo_last_floor_point() {
        let mut draft = DraftState::default();
        draft.add_floor_point(Point3::new(0.0, 0.0, 0.0));
        assert!(draft.undo_last_floor_point());
        assert!(!draft.undo_last_floor_point());
    }

    #[test]
    fn test_polar_entry_walks_a_rectangle() {
        let mut draft = DraftState::default();
        draft.add_floor_point(Point3::new(0.0, 0.0, 0.0));
        // First polar point continues along +X
        assert!(draft.add_floor_point_polar(10.0, 0.0));
        // Then three 90-degree turns
        assert!(draft.add_floor_point_polar(8.0, 90.0));
        assert!(draft.add_floor_point_polar(10.0, 90.0));

        let pts = draft.floor_points();
        assert_eq!(pts.len(), 4);
        assert!((pts[1].pos.x - 10.0).abs() < 1e-9);
        let last = pts[3].pos;
        assert!(last.x.abs() < 1e-9);
        assert!((last.z.abs() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_polar_entry_rejects_non_positive_distance() {
        let mut draft = DraftState::default();
        assert!(!draft.add_floor_point_polar(0.0, 45.0));
        assert!(draft.floor_points().is_empty());
    }

    #[test]
    fn test_floor_preview_angle() {
        let mut draft = DraftState::default();
        draft.add_floor_point(Point3::new(0.0, 0.0, 0.0));
        draft.add_floor_point(Point3::new(10.0, 0.0, 0.0));
        let (dist, angle) = draft.floor_preview(Point3::new(10.0, 0.0, 8.0)).unwrap();
        assert!((dist - 8.0).abs() < 1e-9);
        assert_eq!(angle, 90);
    }

    #[test]
    fn test_rect_preview() {
        let mut draft = DraftState::default();
        draft.start_rect(Point3::new(1.0, 0.0, 1.0));
        let (w, d, center) = draft.rect_preview(Point3::new(5.0, 0.0, 4.0)).unwrap();
        assert_eq!(w, 4.0);
        assert_eq!(d, 3.0);
        assert_eq!(center.x, 3.0);
        assert_eq!(center.z, 2.5);
    }

    #[test]
    fn test_take_drains_draft() {
        let mut draft = DraftState::default();
        draft.add_fence_point(Point3::new(0.0, 0.0, 0.0));
        draft.add_fence_point(Point3::new(1.0, 0.0, 0.0));
        let taken = draft.take_fence_points();
        assert_eq!(taken.len(), 2);
        assert!(draft.fence_points().is_empty());
    }
}
