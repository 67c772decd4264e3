//! Fence construction: user polyline → batched, priced instance groups.

use glam::DVec3;
use shared::{FenceColors, FenceStyleKind};

use crate::presets::{self, FenceStyle, FillPolicy, RailProfile};

use super::instancing::{InstanceGroup, InstanceTransform, PartGeometry, PartKind};

/// Nominal span of one fence module; segments subdivide so no module exceeds it
pub const MODULE_LENGTH: f64 = 2.0;

/// Rail inset from the top of the post / the ground
const RAIL_INSET: f64 = 0.15;

/// A fully built fence: instance groups plus derived length and price
#[derive(Debug, Clone, PartialEq)]
pub struct FenceBuild {
    pub groups: Vec<InstanceGroup>,
    pub total_length: f64,
    pub price: f64,
}

impl FenceBuild {
    pub fn group(&self, part: PartKind) -> Option<&InstanceGroup> {
        self.groups.iter().find(|g| g.part == part)
    }

    pub fn part_count(&self, part: PartKind) -> usize {
        self.group(part).map_or(0, |g| g.len())
    }

    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    /// Drop all instance buffers
    pub fn release(&mut self) {
        for group in &mut self.groups {
            group.release();
        }
    }
}

fn post_geometry(style: &FenceStyle) -> PartGeometry {
    match style.post {
        presets::PostProfile::Square { width } => PartGeometry::Box {
            x: width,
            y: style.post_height,
            z: width,
        },
        presets::PostProfile::Round { radius } => PartGeometry::CylinderY {
            radius,
            height: style.post_height,
            segments: 12,
        },
    }
}

/// Unit-length rail geometry; instances stretch it along Z to the module span
fn rail_geometry(rail: &RailProfile) -> PartGeometry {
    match rail {
        RailProfile::Square { thickness } => PartGeometry::Box {
            x: *thickness,
            y: *thickness,
            z: 1.0,
        },
        RailProfile::Round { radius } => PartGeometry::CylinderZ {
            radius: *radius,
            height: 1.0,
            segments: 8,
        },
    }
}

/// Unit-height slat geometry; instances stretch Y to the fill height
fn slat_geometry(style: &FenceStyle) -> PartGeometry {
    let width = match style.fill {
        FillPolicy::FixedCount { slat_width, .. } => slat_width,
        FillPolicy::Density { slat_width, .. } => slat_width,
        // Panels use a unit base scaled to the span per instance
        FillPolicy::SolidPanel => 1.0,
    };
    PartGeometry::Box {
        x: style.slat_thickness,
        y: 1.0,
        z: width,
    }
}

/// Build a fence along `points`. Returns None for degenerate input (< 2 points).
///
/// Identical `(points, style, colors)` always produce an identical instance
/// set; history restore and export rely on that.
pub fn build_fence(
    points: &[DVec3],
    kind: FenceStyleKind,
    colors: &FenceColors,
) -> Option<FenceBuild> {
    if points.len() < 2 {
        return None;
    }

    let style = presets::fence_style(kind);

    let mut posts = InstanceGroup::new(PartKind::Post, post_geometry(style));
    let mut rails = style
        .rail
        .as_ref()
        .map(|r| InstanceGroup::new(PartKind::Rail, rail_geometry(r)));
    let mut slats = InstanceGroup::new(PartKind::Slat, slat_geometry(style));

    let top_rail_y = style.post_height - RAIL_INSET;
    let bot_rail_y = RAIL_INSET;
    let rail_cross = style.rail.as_ref().map_or(0.0, |r| r.cross_size());
    let slat_height = top_rail_y - bot_rail_y - rail_cross;
    let slat_center_y = (top_rail_y + bot_rail_y) / 2.0;
    let slat_colors = [
        colors.slat_a,
        colors.slat_b.unwrap_or(colors.slat_a),
        colors.slat_c.unwrap_or(colors.slat_a),
    ];
    let post_thickness = style.post.thickness();
    let post_center = DVec3::new(0.0, style.post_height / 2.0, 0.0);

    let mut total_length = 0.0;

    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let dist = start.distance(end);
        total_length += dist;

        let modules = (dist / MODULE_LENGTH).ceil() as usize;
        if modules == 0 {
            continue;
        }
        let module_len = dist / modules as f64;

        let dir = (end - start) / dist;
        let angle = dir.x.atan2(dir.z);
        let yaw = DVec3::new(0.0, angle, 0.0);

        for m in 0..modules {
            let t_start = m as f64 / modules as f64;
            let t_end = (m + 1) as f64 / modules as f64;
            let mod_start = start.lerp(end, t_start);
            let mod_end = start.lerp(end, t_end);
            let mod_center = mod_start.lerp(mod_end, 0.5);

            posts.push(
                InstanceTransform::new(mod_start + post_center, DVec3::ZERO, DVec3::ONE),
                colors.post,
            );

            let rail_len = module_len - post_thickness + 0.02;

            if let Some(group) = rails.as_mut() {
                for y in [top_rail_y, bot_rail_y] {
                    group.push(
                        InstanceTransform::new(
                            DVec3::new(mod_center.x, y, mod_center.z),
                            yaw,
                            DVec3::new(1.0, 1.0, rail_len),
                        ),
                        colors.post,
                    );
                }
            }

            match style.fill {
                FillPolicy::SolidPanel => {
                    let panel_width = rail_len - 0.02;
                    slats.push(
                        InstanceTransform::new(
                            DVec3::new(mod_center.x, slat_center_y, mod_center.z),
                            yaw,
                            DVec3::new(1.0, slat_height, panel_width),
                        ),
                        slat_colors[0],
                    );
                }
                FillPolicy::FixedCount { count, slat_width } => {
                    let total_slat_width = count as f64 * slat_width;
                    let gap = (rail_len - total_slat_width) / (count + 1) as f64;
                    // Mask the span to the interior between the half-posts
                    let mask_start = (post_thickness / 2.0) / module_len;
                    let mask_end = 1.0 - (post_thickness / 2.0) / module_len;

                    for k in 0..count {
                        let local = gap + slat_width / 2.0 + k as f64 * (slat_width + gap);
                        let t = mask_start + local / rail_len * (mask_end - mask_start);
                        let mut pos = mod_start.lerp(mod_end, t);
                        pos.y = slat_center_y;
                        slats.push(
                            InstanceTransform::new(pos, yaw, DVec3::new(1.0, slat_height, 1.0)),
                            slat_colors[k % 3],
                        );
                    }
                }
                FillPolicy::Density { slat_width, gap } => {
                    let unit = slat_width + gap;
                    let count = (rail_len / unit).floor() as usize;
                    let start_offset = (module_len - count as f64 * unit) / 2.0;

                    for k in 0..count {
                        let t = (start_offset + k as f64 * unit + slat_width / 2.0) / module_len;
                        let mut pos = mod_start.lerp(mod_end, t);
                        pos.y = if style.rail.is_none() {
                            slat_height / 2.0 + 0.05
                        } else {
                            slat_center_y
                        };
                        slats.push(
                            InstanceTransform::new(pos, yaw, DVec3::new(1.0, slat_height, 1.0)),
                            slat_colors[k % 3],
                        );
                    }
                }
            }
        }
    }

    // Closing post at the end of the whole run
    posts.push(
        InstanceTransform::new(points[points.len() - 1] + post_center, DVec3::ZERO, DVec3::ONE),
        colors.post,
    );

    let price = (total_length * style.rate).round();

    let mut groups = vec![posts];
    if let Some(rails) = rails {
        groups.push(rails);
    }
    if !slats.is_empty() {
        groups.push(slats);
    }

    Some(FenceBuild {
        groups,
        total_length,
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wood_colors() -> FenceColors {
        presets::fence_style(FenceStyleKind::Wood).default_colors
    }

    fn straight_10m() -> Vec<DVec3> {
        vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(10.0, 0.0, 0.0)]
    }

    #[test]
    fn test_rejects_degenerate_polyline() {
        assert!(build_fence(&[], FenceStyleKind::Wood, &wood_colors()).is_none());
        assert!(build_fence(&[DVec3::ZERO], FenceStyleKind::Wood, &wood_colors()).is_none());
    }

    #[test]
    fn test_module_subdivision_and_posts() {
        // 10 units / 2.0 nominal span = 5 modules, post per module start + 1 final
        let build = build_fence(&straight_10m(), FenceStyleKind::Wood, &wood_colors()).unwrap();
        assert_eq!(build.part_count(PartKind::Post), 6);
        assert_eq!(build.part_count(PartKind::Rail), 10);
    }

    #[test]
    fn test_odd_length_keeps_modules_under_nominal_span() {
        let points = vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(5.0, 0.0, 0.0)];
        let build = build_fence(&points, FenceStyleKind::Wood, &wood_colors()).unwrap();
        // ceil(5 / 2) = 3 modules of 1.667 each
        assert_eq!(build.part_count(PartKind::Post), 4);
        let posts = build.group(PartKind::Post).unwrap();
        let step = posts.transforms[1].position.x - posts.transforms[0].position.x;
        assert!((step - 5.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_interior_vertex_gets_single_post() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 4.0),
        ];
        let build = build_fence(&points, FenceStyleKind::Wood, &wood_colors()).unwrap();
        // 2 + 2 modules -> 4 module-start posts + 1 final
        assert_eq!(build.part_count(PartKind::Post), 5);
    }

    #[test]
    fn test_fixed_count_slats_per_module() {
        let style = presets::fence_style(FenceStyleKind::MetalSlats);
        let build = build_fence(
            &straight_10m(),
            FenceStyleKind::MetalSlats,
            &style.default_colors,
        )
        .unwrap();
        // 9 slats per module, 5 modules
        assert_eq!(build.part_count(PartKind::Slat), 45);
    }

    #[test]
    fn test_fixed_count_gap_law() {
        let style = presets::fence_style(FenceStyleKind::WidePanel);
        let (count, slat_width) = match style.fill {
            FillPolicy::FixedCount { count, slat_width } => (count, slat_width),
            _ => panic!("expected fixed-count fill"),
        };
        let rail_len = 2.0 - style.post.thickness() + 0.02;
        let gap = (rail_len - count as f64 * slat_width) / (count + 1) as f64;
        assert!(gap >= 0.0);
        let reassembled = count as f64 * slat_width + (count + 1) as f64 * gap;
        assert!((reassembled - rail_len).abs() < 1e-9);
    }

    #[test]
    fn test_solid_panel_fill() {
        let style = presets::fence_style(FenceStyleKind::GamePanel);
        let build = build_fence(
            &straight_10m(),
            FenceStyleKind::GamePanel,
            &style.default_colors,
        )
        .unwrap();
        // One panel per module
        assert_eq!(build.part_count(PartKind::Slat), 5);
        let panels = build.group(PartKind::Slat).unwrap();
        let expected_width = (10.0 / 5.0) - style.post.thickness() + 0.02 - 0.02;
        assert!((panels.transforms[0].scale.z - expected_width).abs() < 1e-9);
    }

    #[test]
    fn test_slat_colors_cycle() {
        let style = presets::fence_style(FenceStyleKind::MetalSlats);
        let build = build_fence(
            &straight_10m(),
            FenceStyleKind::MetalSlats,
            &style.default_colors,
        )
        .unwrap();
        let slats = build.group(PartKind::Slat).unwrap();
        let c = &style.default_colors;
        assert_eq!(slats.colors[0], c.slat_a);
        assert_eq!(slats.colors[1], c.slat_b.unwrap());
        assert_eq!(slats.colors[2], c.slat_c.unwrap());
        assert_eq!(slats.colors[3], c.slat_a);
    }

    #[test]
    fn test_price_rounding() {
        let build = build_fence(&straight_10m(), FenceStyleKind::Wood, &wood_colors()).unwrap();
        assert_eq!(build.total_length, 10.0);
        assert_eq!(build.price, 360.0);
    }

    #[test]
    fn test_determinism() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.3, 0.0, 1.1),
            DVec3::new(7.8, 0.0, -2.4),
        ];
        let colors = wood_colors();
        let a = build_fence(&points, FenceStyleKind::Wood, &colors).unwrap();
        let b = build_fence(&points, FenceStyleKind::Wood, &colors).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_diagonal_run_yaw() {
        let points = vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(3.0, 0.0, 3.0)];
        let build = build_fence(&points, FenceStyleKind::Wood, &wood_colors()).unwrap();
        let rails = build.group(PartKind::Rail).unwrap();
        // atan2(x, z) for a 45 degree run
        assert!((rails.transforms[0].rotation.y - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }
}
