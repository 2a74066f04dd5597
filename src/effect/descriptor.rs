use crate::effect::options::{EffectOption, EffectOverrides, ResolvedOptions};
use crate::renderer::pass::Pass;
use crate::renderer::pipeline::ShaderHandle;

/// Identity of a resolved effect. Used as the tag value in the per-pass
/// state tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub(crate) u32);

impl EffectId {
    #[inline]
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved effect: final option values and one shader per enabled pass.
///
/// Immutable once built. The resolver hands out `Arc<EffectDescriptor>` so
/// repeated resolutions share the same instance.
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    pub(crate) id: EffectId,
    pub(crate) source: String,
    pub(crate) overrides: EffectOverrides,
    pub(crate) options: ResolvedOptions,
    pub(crate) shaders: [Option<ShaderHandle>; Pass::COUNT],
}

impl EffectDescriptor {
    #[inline]
    #[must_use]
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Logical path of the effect document.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn overrides(&self) -> &EffectOverrides {
        &self.overrides
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    #[inline]
    #[must_use]
    pub fn option(&self, option: EffectOption) -> bool {
        self.options.get(option)
    }

    /// Effective enable flag of a pass.
    #[inline]
    #[must_use]
    pub fn is_pass_enabled(&self, pass: Pass) -> bool {
        self.options.get(pass.option())
    }

    /// Shader for `pass`; `None` exactly when the pass is disabled.
    #[inline]
    #[must_use]
    pub fn shader(&self, pass: Pass) -> Option<ShaderHandle> {
        self.shaders[pass.index()]
    }

    /// Same flags and shaders, regardless of identity.
    #[must_use]
    pub fn is_equivalent(&self, other: &EffectDescriptor) -> bool {
        self.options == other.options && self.shaders == other.shaders
    }
}
