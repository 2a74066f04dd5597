//! Tag State Manager
//!
//! Binds per-pass shader state to scene nodes and toggles their per-pass
//! visibility. The pipeline talks to it only through [`TagStateManager`], so
//! hosts can route bindings to their own camera/state system.

use rustc_hash::FxHashMap;

use crate::effect::EffectId;
use crate::renderer::pass::{Pass, PassMask};
use crate::renderer::pipeline::ShaderHandle;
use crate::scene::{NodeHandle, PassBinding, Scene, ShaderState};

pub trait TagStateManager {
    /// Camera draw mask bit of a pass.
    fn mask(&self, pass: Pass) -> PassMask {
        pass.mask()
    }

    fn gbuffer_mask(&self) -> PassMask {
        self.mask(Pass::GBuffer)
    }

    fn shadow_mask(&self) -> PassMask {
        self.mask(Pass::Shadows)
    }

    fn voxelize_mask(&self) -> PassMask {
        self.mask(Pass::Voxelize)
    }

    fn envmap_mask(&self) -> PassMask {
        self.mask(Pass::Envmap)
    }

    /// Binds `shader` to `node` in `pass` at `sort` and shows the node.
    ///
    /// Returns `false` when a higher-sort binding already exists on the node.
    fn apply_state(
        &mut self,
        scene: &mut Scene,
        node: NodeHandle,
        pass: Pass,
        shader: ShaderHandle,
        effect_id: EffectId,
        sort: i32,
    ) -> bool;

    /// Hides `node` from `pass` at `sort`.
    fn hide(&mut self, scene: &mut Scene, node: NodeHandle, pass: Pass, sort: i32) -> bool;
}

/// Default [`TagStateManager`] writing bindings straight onto scene nodes.
///
/// Keeps one state table per pass, keyed by effect id, so nodes sharing an
/// effect share a registered state.
#[derive(Debug, Default)]
pub struct TagMaskManager {
    states: [FxHashMap<EffectId, ShaderHandle>; Pass::COUNT],
}

impl TagMaskManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shader registered for `effect_id` in `pass`, if any.
    #[must_use]
    pub fn state(&self, pass: Pass, effect_id: EffectId) -> Option<ShaderHandle> {
        self.states[pass.index()].get(&effect_id).copied()
    }

    #[must_use]
    pub fn state_count(&self, pass: Pass) -> usize {
        self.states[pass.index()].len()
    }
}

impl TagStateManager for TagMaskManager {
    fn apply_state(
        &mut self,
        scene: &mut Scene,
        node: NodeHandle,
        pass: Pass,
        shader: ShaderHandle,
        effect_id: EffectId,
        sort: i32,
    ) -> bool {
        if !scene.contains(node) {
            log::warn!("apply_state: node {node:?} is not in the scene");
            return false;
        }
        self.states[pass.index()].entry(effect_id).or_insert(shader);

        let applied = scene.set_pass_binding(
            node,
            pass,
            PassBinding::Bound(ShaderState {
                shader,
                effect_id,
                sort,
            }),
        );
        if !applied {
            log::debug!("Kept higher-sort {pass} binding on {node:?} (rejected sort {sort})");
        }
        applied
    }

    fn hide(&mut self, scene: &mut Scene, node: NodeHandle, pass: Pass, sort: i32) -> bool {
        scene.set_pass_binding(node, pass, PassBinding::Hidden { sort })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectId;

    #[test]
    fn test_state_table_shared_by_effect() {
        let mut scene = Scene::new();
        let a = scene.build_node("a").build();
        let b = scene.build_node("b").build();

        let mut tags = TagMaskManager::new();
        let shader = ShaderHandle(3);
        assert!(tags.apply_state(&mut scene, a, Pass::Shadows, shader, EffectId(7), 25));
        assert!(tags.apply_state(&mut scene, b, Pass::Shadows, shader, EffectId(7), 25));

        assert_eq!(tags.state_count(Pass::Shadows), 1);
        assert_eq!(tags.state(Pass::Shadows, EffectId(7)), Some(shader));
        assert_eq!(tags.state_count(Pass::GBuffer), 0);
    }

    #[test]
    fn test_hide_respects_sort() {
        let mut scene = Scene::new();
        let a = scene.build_node("a").build();
        let mut tags = TagMaskManager::new();

        assert!(tags.apply_state(&mut scene, a, Pass::GBuffer, ShaderHandle(0), EffectId(0), 10));
        assert!(!tags.hide(&mut scene, a, Pass::GBuffer, 5));
        assert!(scene.is_visible_in(a, Pass::GBuffer));
        assert!(tags.hide(&mut scene, a, Pass::GBuffer, 10));
        assert!(!scene.is_visible_in(a, Pass::GBuffer));
    }

    #[test]
    fn test_masks() {
        let tags = TagMaskManager::new();
        assert_eq!(tags.shadow_mask(), PassMask::SHADOW);
        assert_eq!(tags.envmap_mask(), PassMask::ENVMAP);
    }
}
