//! Downscale-Z Stage
//!
//! Builds a hierarchical depth chain from the GBuffer depth. Each mip stores
//! the farthest depth of the 2×2 texels below it, down to 1×1.

use glam::UVec2;

use crate::errors::{PipelineError, Result};
use crate::renderer::graph::stage::{RenderTargetDesc, Stage, StageContext, TargetFormat};
use crate::renderer::graph::stages::gbuffer::GBUFFER_DEPTH;
use crate::renderer::graph::stages::{DOWNSCALED_DEPTH_PIPE, GBUFFER_PIPE};

#[derive(Default)]
pub struct DownscaleZStage {
    targets: Vec<RenderTargetDesc>,
}

impl DownscaleZStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Number of mips needed to reduce `size` to 1×1.
#[must_use]
pub fn mip_count(size: UVec2) -> u32 {
    let largest = size.max_element().max(1);
    u32::BITS - largest.leading_zeros()
}

impl Stage for DownscaleZStage {
    fn name(&self) -> &str {
        "DownscaleZStage"
    }

    fn required_pipes(&self) -> &[&'static str] {
        &[GBUFFER_PIPE]
    }

    fn produced_pipes(&self) -> &[&'static str] {
        &[DOWNSCALED_DEPTH_PIPE]
    }

    fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
        let depth_size = ctx
            .pipe(GBUFFER_PIPE)?
            .target(GBUFFER_DEPTH)
            .map(|t| t.size)
            .ok_or_else(|| {
                PipelineError::stage_init(self.name(), format!("pipe '{GBUFFER_PIPE}' has no depth target"))
            })?;

        self.targets = vec![
            RenderTargetDesc::new(DOWNSCALED_DEPTH_PIPE, depth_size, TargetFormat::R32Float)
                .with_mip_levels(mip_count(depth_size)),
        ];
        ctx.publish(DOWNSCALED_DEPTH_PIPE, self.targets.clone());
        Ok(())
    }

    fn targets(&self) -> &[RenderTargetDesc] {
        &self.targets
    }
}
