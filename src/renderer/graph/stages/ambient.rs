//! Ambient Stage
//!
//! Applies ambient lighting to the geometry buffer and publishes the lit
//! scene color.

use crate::errors::Result;
use crate::renderer::graph::stage::{RenderTargetDesc, Stage, StageContext, TargetFormat};
use crate::renderer::graph::stages::{GBUFFER_PIPE, SHADED_SCENE_PIPE};

#[derive(Default)]
pub struct AmbientStage {
    targets: Vec<RenderTargetDesc>,
}

impl AmbientStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for AmbientStage {
    fn name(&self) -> &str {
        "AmbientStage"
    }

    fn required_pipes(&self) -> &[&'static str] {
        &[GBUFFER_PIPE]
    }

    fn produced_pipes(&self) -> &[&'static str] {
        &[SHADED_SCENE_PIPE]
    }

    fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
        // The GBuffer is bound at draw time, so only the output is sized here.
        self.targets = vec![RenderTargetDesc::new(
            SHADED_SCENE_PIPE,
            ctx.render_size(),
            TargetFormat::Rgba16Float,
        )];
        ctx.publish(SHADED_SCENE_PIPE, self.targets.clone());
        Ok(())
    }

    fn targets(&self) -> &[RenderTargetDesc] {
        &self.targets
    }
}
