//! Fence build validation utilities.
//!
//! `FenceValidator` checks a built fence for internal consistency: parallel
//! instance buffers, finite transforms, and the fixed-count spacing law.

use crate::build::{FenceBuild, PartKind};

/// Solved gap for `n` slats of width `w` in a rail span `s`
pub fn fixed_count_gap(rail_span: f64, count: usize, slat_width: f64) -> f64 {
    (rail_span - count as f64 * slat_width) / (count + 1) as f64
}

/// Validator for `FenceBuild` integrity checks.
pub struct FenceValidator<'a> {
    build: &'a FenceBuild,
}

impl<'a> FenceValidator<'a> {
    pub fn new(build: &'a FenceBuild) -> Self {
        Self { build }
    }

    pub fn part_count(&self, part: PartKind) -> usize {
        self.build.part_count(part)
    }

    pub fn instance_count(&self) -> usize {
        self.build.instance_count()
    }

    /// Color buffers must stay parallel to the transform buffers
    pub fn are_buffers_parallel(&self) -> bool {
        self.build
            .groups
            .iter()
            .all(|g| g.transforms.len() == g.colors.len())
    }

    /// Every transform component must be finite
    pub fn are_transforms_finite(&self) -> bool {
        self.build.groups.iter().all(|g| {
            g.transforms.iter().all(|t| {
                t.position.is_finite() && t.rotation.is_finite() && t.scale.is_finite()
            })
        })
    }

    /// Posts bracket the run: at least one per module plus the closing post
    pub fn has_posts(&self) -> bool {
        self.part_count(PartKind::Post) >= 2
    }

    /// Price must equal round(length × rate)
    pub fn price_matches(&self, rate: f64) -> bool {
        (self.build.price - (self.build.total_length * rate).round()).abs() < f64::EPSILON
    }

    /// Run all checks and return a list of error messages.
    /// An empty list means the build is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.has_posts() {
            errors.push(format!(
                "fence has {} posts; at least 2 expected",
                self.part_count(PartKind::Post)
            ));
        }

        if !self.are_buffers_parallel() {
            errors.push("instance color buffer diverges from transforms".to_string());
        }

        if !self.are_transforms_finite() {
            errors.push("non-finite instance transform".to_string());
        }

        if self.build.total_length <= 0.0 {
            errors.push(format!(
                "non-positive total length {}",
                self.build.total_length
            ));
        }

        errors
    }
}
