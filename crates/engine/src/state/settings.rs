//! Editor settings persisted to the platform config directory.

use serde::{Deserialize, Serialize};
use shared::FenceStyleKind;

use crate::presets;

/// Gizmo snapping increments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSettings {
    pub enabled: bool,
    /// Translation step when snapping is on
    pub translate_step: f64,
    /// Rotation step (degrees) when snapping is on
    pub rotate_step_deg: f64,
    /// Rotation step (degrees) when snapping is off
    pub free_rotate_step_deg: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            translate_step: 0.5,
            rotate_step_deg: 45.0,
            free_rotate_step_deg: 15.0,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Price per square unit for generated floor surfaces
    pub floor_rate: f64,
    /// Style preselected when fence drawing starts
    pub default_fence_style: FenceStyleKind,
    pub snap: SnapSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            floor_rate: presets::PRICE_PER_M2,
            default_fence_style: FenceStyleKind::Wood,
            snap: SnapSettings::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from file, or return defaults if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "playscape", "playscape") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "playscape", "playscape") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.floor_rate, 40.0);
        assert_eq!(settings.default_fence_style, FenceStyleKind::Wood);
        assert!(!settings.snap.enabled);
        assert_eq!(settings.snap.translate_step, 0.5);
    }

    #[test]
    fn test_serde_roundtrip() {
        let settings = AppSettings {
            floor_rate: 55.0,
            default_fence_style: FenceStyleKind::GamePanel,
            snap: SnapSettings {
                enabled: true,
                ..SnapSettings::default()
            },
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.floor_rate, 55.0);
        assert!(back.snap.enabled);
    }
}
