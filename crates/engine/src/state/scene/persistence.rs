//! Project save/load and autosave.

use shared::ProjectData;

use crate::loader::ModelLoader;

use super::SceneState;

impl SceneState {
    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "playscape", "playscape")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// The persisted project payload: entity records plus the asset cache
    pub fn project_data(&self) -> ProjectData {
        ProjectData {
            items: self.snapshot_items(),
            asset_cache: self.asset_cache.clone(),
            total_price: self.total_price(),
        }
    }

    pub fn save_project_json(&self) -> String {
        serde_json::to_string(&self.project_data()).unwrap_or_else(|e| {
            tracing::error!("project serialization failed: {e}");
            String::new()
        })
    }

    /// Replace the scene with a loaded project. The incoming asset cache is
    /// merged first so records can resolve their payloads during rebuild.
    pub fn load_project(&mut self, data: ProjectData, loader: &mut dyn ModelLoader) {
        self.asset_cache.extend(data.asset_cache);
        self.restore_items(data.items, loader);
        self.commit();
    }

    pub fn load_project_json(
        &mut self,
        json: &str,
        loader: &mut dyn ModelLoader,
    ) -> Result<(), String> {
        let data: ProjectData =
            serde_json::from_str(json).map_err(|e| format!("invalid project JSON: {e}"))?;
        self.load_project(data, loader);
        Ok(())
    }

    /// Write the autosave file. Failures are non-fatal: the scene is
    /// untouched and the warning is only logged once.
    pub fn autosave(&mut self) {
        let Some(path) = Self::autosave_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&path, self.save_project_json()) {
            if !self.autosave_warned {
                tracing::warn!("autosave failed (storage unavailable?): {e}");
                self.autosave_warned = true;
            }
        }
    }

    /// Read the autosave payload back, if one exists
    pub fn load_autosave() -> Option<ProjectData> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }

    pub fn has_autosave() -> bool {
        Self::autosave_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Full reset: release everything, drop the asset cache, commit the
    /// empty scene
    pub fn reset(&mut self) {
        self.clear_entities();
        self.asset_cache.clear();
        self.commit();
    }
}
