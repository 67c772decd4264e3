//! Centripetal Catmull-Rom interpolation through a control point sequence.
//!
//! Centripetal parameterization avoids the overshoot and cusps that uniform
//! Catmull-Rom produces on unevenly spaced boundary clicks.

use glam::DVec3;

/// Samples used to build the arc-length table for spaced sampling
const ARC_DIVISIONS: usize = 200;

/// Open centripetal Catmull-Rom curve through a point sequence
pub struct CatmullRom {
    points: Vec<DVec3>,
}

impl CatmullRom {
    pub fn new(points: Vec<DVec3>) -> Self {
        Self { points }
    }

    /// Evaluate at curve parameter t in [0, 1] (parameter-uniform)
    pub fn point_at(&self, t: f64) -> DVec3 {
        let pts = &self.points;
        if pts.len() == 1 {
            return pts[0];
        }

        let p = (pts.len() - 1) as f64 * t;
        let seg = (p.floor() as usize).min(pts.len() - 2);
        let local_t = p - seg as f64;

        // Open curve: reflect the endpoints to synthesise outer controls
        let p0 = if seg > 0 {
            pts[seg - 1]
        } else {
            pts[0] * 2.0 - pts[1]
        };
        let p1 = pts[seg];
        let p2 = pts[seg + 1];
        let p3 = if seg + 2 < pts.len() {
            pts[seg + 2]
        } else {
            pts[pts.len() - 1] * 2.0 - pts[pts.len() - 2]
        };

        centripetal_segment(p0, p1, p2, p3, local_t)
    }

    /// `divisions + 1` points spaced uniformly by arc length, endpoints included
    pub fn spaced_points(&self, divisions: usize) -> Vec<DVec3> {
        if self.points.len() < 2 {
            return self.points.clone();
        }

        let lengths = self.arc_lengths();
        let total = lengths[lengths.len() - 1];

        (0..=divisions)
            .map(|i| {
                let target = total * i as f64 / divisions as f64;
                self.point_at(self.param_at_length(&lengths, target))
            })
            .collect()
    }

    /// Cumulative chord lengths over a fine parameter-uniform tessellation
    fn arc_lengths(&self) -> Vec<f64> {
        let mut lengths = Vec::with_capacity(ARC_DIVISIONS + 1);
        let mut sum = 0.0;
        let mut last = self.point_at(0.0);
        lengths.push(0.0);
        for i in 1..=ARC_DIVISIONS {
            let current = self.point_at(i as f64 / ARC_DIVISIONS as f64);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }

    /// Invert the arc-length table: target length → curve parameter
    fn param_at_length(&self, lengths: &[f64], target: f64) -> f64 {
        let total = lengths[lengths.len() - 1];
        if total <= 0.0 {
            return 0.0;
        }
        let target = target.clamp(0.0, total);

        // Binary search for the bracketing table entry
        let (mut low, mut high) = (0, lengths.len() - 1);
        while low + 1 < high {
            let mid = (low + high) / 2;
            if lengths[mid] < target {
                low = mid;
            } else {
                high = mid;
            }
        }

        let span = lengths[high] - lengths[low];
        let frac = if span > 0.0 {
            (target - lengths[low]) / span
        } else {
            0.0
        };
        (low as f64 + frac) / (lengths.len() - 1) as f64
    }
}

/// Hermite evaluation of one centripetal Catmull-Rom segment between p1 and p2
fn centripetal_segment(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    // Knot intervals: |p_{i+1} - p_i|^0.5
    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);

    // Degenerate knots collapse to safe values
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    let tt = t * t;
    let ttt = tt * t;

    p1 * (2.0 * ttt - 3.0 * tt + 1.0)
        + t1 * (ttt - 2.0 * tt + t)
        + p2 * (-2.0 * ttt + 3.0 * tt)
        + t2 * (ttt - tt)
}
