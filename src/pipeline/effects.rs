use std::sync::Arc;

use crate::effect::{EffectDescriptor, EffectOverrides};
use crate::errors::{PipelineError, Result};
use crate::pipeline::PipelineContext;
use crate::renderer::pass::Pass;
use crate::scene::{NodeHandle, NodeKind, Scene};

/// Effect applied to the scene root before any other effect.
pub const DEFAULT_EFFECT: &str = "effects/default.json";
/// Effect used by the default skybox.
pub const SKYBOX_EFFECT: &str = "effects/skybox.json";
/// Base sort of the default skybox effect.
pub const SKYBOX_SORT: i32 = 1000;

impl PipelineContext {
    /// Applies an effect to `node` and its subtree.
    ///
    /// Each pass is bound (or hidden, if the effect disables it) at
    /// `sort + pass offset`. A node keeps its existing binding for a pass when
    /// that binding has a higher sort.
    ///
    /// Resolution errors are logged and returned without touching any
    /// binding.
    pub fn apply_effect(
        &mut self,
        scene: &mut Scene,
        node: NodeHandle,
        path: &str,
        overrides: &EffectOverrides,
        sort: i32,
    ) -> Result<Arc<EffectDescriptor>> {
        if !scene.contains(node) {
            return Err(PipelineError::InvalidNode(format!("{node:?}")));
        }

        let descriptor = self.effects.resolve(path, overrides).inspect_err(|e| {
            log::error!("Could not apply effect '{path}': {e}");
        })?;

        for pass in Pass::ALL {
            let pass_sort = pass.sort_for(sort);
            match descriptor.shader(pass) {
                Some(shader) => {
                    self.tag_mgr
                        .apply_state(scene, node, pass, shader, descriptor.id(), pass_sort);
                }
                None => {
                    self.tag_mgr.hide(scene, node, pass, pass_sort);
                }
            }
        }

        log::debug!("Applied effect '{path}' (#{}) to {node:?} at sort {sort}", descriptor.id());
        Ok(descriptor)
    }

    /// Applies the fallback effect to the scene root.
    pub fn set_default_effect(&mut self, scene: &mut Scene) -> Result<()> {
        let root = scene.root();
        let sort = self.settings.default_effect_sort;
        self.apply_effect(scene, root, DEFAULT_EFFECT, &EffectOverrides::new(), sort)?;
        Ok(())
    }

    /// Creates a renderable `skybox` node under the root, scaled to `size`,
    /// drawn only in the gbuffer pass.
    pub fn create_default_skybox(&mut self, scene: &mut Scene, size: f32) -> Result<NodeHandle> {
        let skybox = scene
            .build_node("skybox")
            .with_kind(NodeKind::Renderable)
            .with_scale(size)
            .build();

        if let Err(e) = self.apply_effect(
            scene,
            skybox,
            SKYBOX_EFFECT,
            &EffectOverrides::gbuffer_only(),
            SKYBOX_SORT,
        ) {
            scene.remove_node(skybox);
            return Err(e);
        }
        Ok(skybox)
    }
}
