//! Conditional Render Passes
//!
//! Every renderable takes part in four per-object passes. Each pass can be
//! enabled or disabled per effect, carries its own shader, and owns one bit in
//! the camera draw mask.
//!
//! | Pass | Option | Sort offset | Mask bit |
//! |------|--------|-------------|----------|
//! | `GBuffer` | `render_gbuffer` | +0 | `GBUFFER` |
//! | `Shadows` | `render_shadows` | +25 | `SHADOW` |
//! | `Voxelize` | `render_voxel` | +35 | `VOXELIZE` |
//! | `Envmap` | `render_envmap` | +45 | `ENVMAP` |

use bitflags::bitflags;

use crate::effect::EffectOption;

bitflags! {
    /// Camera draw mask bits, one per conditional pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PassMask: u32 {
        const GBUFFER  = 1 << 0;
        const SHADOW   = 1 << 1;
        const VOXELIZE = 1 << 2;
        const ENVMAP   = 1 << 3;
    }
}

/// One of the four conditional per-object passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Pass {
    GBuffer = 0,
    Shadows = 1,
    Voxelize = 2,
    Envmap = 3,
}

impl Pass {
    /// All passes in application order.
    pub const ALL: [Pass; 4] = [Pass::GBuffer, Pass::Shadows, Pass::Voxelize, Pass::Envmap];

    pub const COUNT: usize = 4;

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used in effect documents and shader template lookup.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GBuffer => "gbuffer",
            Self::Shadows => "shadows",
            Self::Voxelize => "voxelize",
            Self::Envmap => "envmap",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Fixed priority shift added to the caller's base sort.
    #[inline]
    #[must_use]
    pub const fn sort_offset(self) -> i32 {
        match self {
            Self::GBuffer => 0,
            Self::Shadows => 25,
            Self::Voxelize => 35,
            Self::Envmap => 45,
        }
    }

    /// Effective sort priority for a caller-supplied base sort.
    #[inline]
    #[must_use]
    pub const fn sort_for(self, base_sort: i32) -> i32 {
        base_sort.saturating_add(self.sort_offset())
    }

    /// The effect option that toggles this pass.
    #[inline]
    #[must_use]
    pub const fn option(self) -> EffectOption {
        match self {
            Self::GBuffer => EffectOption::RenderGBuffer,
            Self::Shadows => EffectOption::RenderShadows,
            Self::Voxelize => EffectOption::RenderVoxel,
            Self::Envmap => EffectOption::RenderEnvmap,
        }
    }

    #[inline]
    #[must_use]
    pub const fn mask(self) -> PassMask {
        match self {
            Self::GBuffer => PassMask::GBUFFER,
            Self::Shadows => PassMask::SHADOW,
            Self::Voxelize => PassMask::VOXELIZE,
            Self::Envmap => PassMask::ENVMAP,
        }
    }
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
