//! Final Stage
//!
//! Writes the shaded scene into the output image at native resolution.

use crate::errors::Result;
use crate::renderer::graph::stage::{RenderTargetDesc, Stage, StageContext, TargetFormat};
use crate::renderer::graph::stages::{FINAL_IMAGE_PIPE, SHADED_SCENE_PIPE};

#[derive(Default)]
pub struct FinalStage {
    targets: Vec<RenderTargetDesc>,
}

impl FinalStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for FinalStage {
    fn name(&self) -> &str {
        "FinalStage"
    }

    fn required_pipes(&self) -> &[&'static str] {
        &[SHADED_SCENE_PIPE]
    }

    fn produced_pipes(&self) -> &[&'static str] {
        &[FINAL_IMAGE_PIPE]
    }

    fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
        self.targets = vec![RenderTargetDesc::new(
            FINAL_IMAGE_PIPE,
            ctx.native_size(),
            TargetFormat::Rgba8Unorm,
        )];
        ctx.publish(FINAL_IMAGE_PIPE, self.targets.clone());
        Ok(())
    }

    fn targets(&self) -> &[RenderTargetDesc] {
        &self.targets
    }
}
