//! Combine-Velocity Stage
//!
//! Merges per-object motion vectors from the GBuffer with camera motion.

use crate::errors::Result;
use crate::renderer::graph::stage::{RenderTargetDesc, Stage, StageContext, TargetFormat};
use crate::renderer::graph::stages::{COMBINED_VELOCITY_PIPE, GBUFFER_PIPE};

#[derive(Default)]
pub struct CombineVelocityStage {
    targets: Vec<RenderTargetDesc>,
}

impl CombineVelocityStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for CombineVelocityStage {
    fn name(&self) -> &str {
        "CombineVelocityStage"
    }

    fn required_pipes(&self) -> &[&'static str] {
        &[GBUFFER_PIPE]
    }

    fn produced_pipes(&self) -> &[&'static str] {
        &[COMBINED_VELOCITY_PIPE]
    }

    fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
        self.targets = vec![RenderTargetDesc::new(
            COMBINED_VELOCITY_PIPE,
            ctx.render_size(),
            TargetFormat::Rg16Float,
        )];
        ctx.publish(COMBINED_VELOCITY_PIPE, self.targets.clone());
        Ok(())
    }

    fn targets(&self) -> &[RenderTargetDesc] {
        &self.targets
    }
}
