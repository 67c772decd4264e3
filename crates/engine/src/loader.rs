//! Model loading seam. The real GLB decoder lives in a collaborator crate;
//! the engine only depends on this trait and on the loaded node tree.

use glam::DVec3;

use crate::collision::Aabb;
use crate::mesh::{self, MeshData};

/// Where the model bytes come from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelSource<'a> {
    /// Remote or local file URL
    Url(&'a str),
    /// Inline base64 payload (imported model or asset-cache entry)
    Payload(&'a str),
}

/// One node of a loaded model hierarchy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelNode {
    pub name: String,
    pub mesh: Option<MeshData>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    /// Release mesh buffers across the whole subtree, visiting each node once
    pub fn release(&mut self) {
        if let Some(mesh) = &mut self.mesh {
            mesh.release();
        }
        for child in &mut self.children {
            child.release();
        }
    }

    /// Total node count of the subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }

    fn collect_bounds(&self, out: &mut Option<Aabb>) {
        if let Some(mesh) = &self.mesh {
            if !mesh.is_empty() {
                let b = Aabb::from_mesh(mesh);
                *out = Some(match out {
                    Some(existing) => existing.union(&b),
                    None => b,
                });
            }
        }
        for child in &self.children {
            child.collect_bounds(out);
        }
    }
}

/// A decoded model: node tree plus precomputed local bounds
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub root: ModelNode,
    pub bounds: Aabb,
}

impl LoadedModel {
    pub fn new(root: ModelNode) -> Self {
        let mut bounds = None;
        root.collect_bounds(&mut bounds);
        let bounds = bounds.unwrap_or(Aabb::new(DVec3::ZERO, DVec3::ZERO));
        Self { root, bounds }
    }

    /// Release every owned mesh buffer
    pub fn release(&mut self) {
        self.root.release();
    }
}

/// Asynchronously completed by the collaborator; the engine awaits the result
/// at the call site and only mutates the scene once it resolves.
pub trait ModelLoader {
    fn load(&mut self, source: ModelSource<'_>) -> Result<LoadedModel, String>;
}

/// Stand-in loader producing a unit box for any source. Used by the headless
/// binary and the test harness; `fail_next` simulates a decode error.
#[derive(Debug, Default)]
pub struct BoxLoader {
    pub fail_next: bool,
    pub loads: usize,
}

impl BoxLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelLoader for BoxLoader {
    fn load(&mut self, source: ModelSource<'_>) -> Result<LoadedModel, String> {
        if self.fail_next {
            self.fail_next = false;
            let what = match source {
                ModelSource::Url(url) => url.to_string(),
                ModelSource::Payload(_) => "<inline payload>".to_string(),
            };
            return Err(format!("failed to decode model: {what}"));
        }
        self.loads += 1;
        let root = ModelNode {
            name: "box".to_string(),
            mesh: Some(mesh::cube(1.0, 1.0, 1.0, [0.6, 0.6, 0.6])),
            children: Vec::new(),
        };
        Ok(LoadedModel::new(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_loader_bounds() {
        let mut loader = BoxLoader::new();
        let model = loader.load(ModelSource::Url("tower.glb")).unwrap();
        assert!((model.bounds.size() - DVec3::ONE).length() < 1e-6);
        assert_eq!(loader.loads, 1);
    }

    #[test]
    fn test_box_loader_forced_failure() {
        let mut loader = BoxLoader::new();
        loader.fail_next = true;
        assert!(loader.load(ModelSource::Url("broken.glb")).is_err());
        // Next load succeeds again
        assert!(loader.load(ModelSource::Url("ok.glb")).is_ok());
    }

    #[test]
    fn test_release_walks_tree_once() {
        let child = ModelNode {
            name: "wheel".to_string(),
            mesh: Some(mesh::cube(0.5, 0.5, 0.5, [0.2; 3])),
            children: Vec::new(),
        };
        let root = ModelNode {
            name: "root".to_string(),
            mesh: Some(mesh::cube(1.0, 1.0, 1.0, [0.2; 3])),
            children: vec![child],
        };
        let mut model = LoadedModel::new(root);
        assert_eq!(model.root.node_count(), 2);
        model.release();
        assert!(model.root.mesh.as_ref().unwrap().is_empty());
        assert!(model.root.children[0].mesh.as_ref().unwrap().is_empty());
    }
}
