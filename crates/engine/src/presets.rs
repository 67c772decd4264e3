//! Fence style catalog and floor pricing constants.

use shared::{FenceColors, FenceStyleKind};

/// Price per square unit of generated rubber flooring
pub const PRICE_PER_M2: f64 = 40.0;

/// Default color for generated floor surfaces
pub const FLOOR_GARNET: u32 = 0xA04040;

/// Post cross-section profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostProfile {
    Square { width: f64 },
    Round { radius: f64 },
}

impl PostProfile {
    /// Footprint size across the run direction
    pub fn thickness(&self) -> f64 {
        match self {
            PostProfile::Square { width } => *width,
            PostProfile::Round { radius } => radius * 2.0,
        }
    }
}

/// Rail cross-section profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RailProfile {
    Square { thickness: f64 },
    Round { radius: f64 },
}

impl RailProfile {
    /// Vertical size of the rail cross-section
    pub fn cross_size(&self) -> f64 {
        match self {
            RailProfile::Square { thickness } => *thickness,
            RailProfile::Round { radius } => radius * 2.0,
        }
    }
}

/// How the span between rails is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillPolicy {
    /// One solid panel per module
    SolidPanel,
    /// Exactly `count` slats per module, gap solved from the rail span
    FixedCount { count: usize, slat_width: f64 },
    /// As many slats as fit at the given width + gap, block centered
    Density { slat_width: f64, gap: f64 },
}

/// Geometry and pricing rules for one fence style
#[derive(Debug, Clone, PartialEq)]
pub struct FenceStyle {
    pub name: &'static str,
    pub reference: &'static str,
    /// Price per unit of fence length
    pub rate: f64,
    pub post: PostProfile,
    pub post_height: f64,
    pub rail: Option<RailProfile>,
    pub fill: FillPolicy,
    pub slat_thickness: f64,
    pub default_colors: FenceColors,
}

const WOOD: FenceStyle = FenceStyle {
    name: "Classic Wood Fence",
    reference: "FEN-WD-01",
    rate: 36.0,
    post: PostProfile::Square { width: 0.1 },
    post_height: 1.0,
    rail: Some(RailProfile::Square { thickness: 0.08 }),
    fill: FillPolicy::Density {
        slat_width: 0.1,
        gap: 0.05,
    },
    slat_thickness: 0.02,
    default_colors: FenceColors {
        post: 0x8D6E63,
        slat_a: 0x8D6E63,
        slat_b: Some(0x8D6E63),
        slat_c: None,
    },
};

const METAL_SLATS: FenceStyle = FenceStyle {
    name: "Thin Metal Fence",
    reference: "FEN-MS-01",
    rate: 42.0,
    post: PostProfile::Round { radius: 0.04 },
    post_height: 1.0,
    rail: Some(RailProfile::Round { radius: 0.03 }),
    fill: FillPolicy::FixedCount {
        count: 9,
        slat_width: 0.08,
    },
    slat_thickness: 0.01,
    default_colors: FenceColors {
        post: 0x2c3e50,
        slat_a: 0xe74c3c,
        slat_b: Some(0xf1c40f),
        slat_c: Some(0x3498db),
    },
};

const WIDE_PANEL: FenceStyle = FenceStyle {
    name: "Wide Metal Fence",
    reference: "FEN-WP-01",
    rate: 45.0,
    post: PostProfile::Round { radius: 0.04 },
    post_height: 1.0,
    rail: Some(RailProfile::Round { radius: 0.04 }),
    fill: FillPolicy::FixedCount {
        count: 6,
        slat_width: 0.20,
    },
    slat_thickness: 0.02,
    default_colors: FenceColors {
        post: 0x27ae60,
        slat_a: 0x3498db,
        slat_b: Some(0x95a5a6),
        slat_c: Some(0xf1c40f),
    },
};

const GAME_PANEL: FenceStyle = FenceStyle {
    name: "Smooth Panel Fence",
    reference: "FEN-PA-01",
    rate: 61.0,
    post: PostProfile::Round { radius: 0.04 },
    post_height: 1.0,
    rail: Some(RailProfile::Round { radius: 0.03 }),
    fill: FillPolicy::SolidPanel,
    slat_thickness: 0.05,
    default_colors: FenceColors {
        post: 0xbdc3c7,
        slat_a: 0x27ae60,
        slat_b: None,
        slat_c: None,
    },
};

/// Look up the style table entry for a style selector
pub fn fence_style(kind: FenceStyleKind) -> &'static FenceStyle {
    match kind {
        FenceStyleKind::Wood => &WOOD,
        FenceStyleKind::MetalSlats => &METAL_SLATS,
        FenceStyleKind::WidePanel => &WIDE_PANEL,
        FenceStyleKind::GamePanel => &GAME_PANEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_resolves() {
        for kind in [
            FenceStyleKind::Wood,
            FenceStyleKind::MetalSlats,
            FenceStyleKind::WidePanel,
            FenceStyleKind::GamePanel,
        ] {
            let style = fence_style(kind);
            assert!(style.rate > 0.0);
            assert!(style.post_height > 0.0);
        }
    }

    #[test]
    fn test_wood_rate_matches_catalog() {
        assert_eq!(fence_style(FenceStyleKind::Wood).rate, 36.0);
    }

    #[test]
    fn test_post_thickness() {
        assert_eq!(PostProfile::Square { width: 0.1 }.thickness(), 0.1);
        assert_eq!(PostProfile::Round { radius: 0.04 }.thickness(), 0.08);
    }

    #[test]
    fn test_fixed_count_styles_have_positive_slack() {
        // A nominal 2.0 module must fit the fixed slat count with a non-negative gap
        for kind in [FenceStyleKind::MetalSlats, FenceStyleKind::WidePanel] {
            let style = fence_style(kind);
            if let FillPolicy::FixedCount { count, slat_width } = style.fill {
                let rail_len = 2.0 - style.post.thickness() + 0.02;
                assert!(rail_len - count as f64 * slat_width >= 0.0);
            }
        }
    }
}
