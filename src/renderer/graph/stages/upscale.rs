//! Upscale Stage
//!
//! Resamples the shaded scene from render resolution to native resolution
//! and republishes it, so later consumers of `ShadedScene` see native size.
//! Only registered when the resolution scale is not close to `1.0`.

use crate::errors::{PipelineError, Result};
use crate::renderer::graph::stage::{RenderTargetDesc, Stage, StageContext};
use crate::renderer::graph::stages::SHADED_SCENE_PIPE;

#[derive(Default)]
pub struct UpscaleStage {
    targets: Vec<RenderTargetDesc>,
}

impl UpscaleStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for UpscaleStage {
    fn name(&self) -> &str {
        "UpscaleStage"
    }

    fn required_pipes(&self) -> &[&'static str] {
        &[SHADED_SCENE_PIPE]
    }

    fn produced_pipes(&self) -> &[&'static str] {
        &[SHADED_SCENE_PIPE]
    }

    fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
        let format = ctx
            .pipe(SHADED_SCENE_PIPE)?
            .primary()
            .map(|t| t.format)
            .ok_or_else(|| {
                PipelineError::stage_init(self.name(), format!("pipe '{SHADED_SCENE_PIPE}' is empty"))
            })?;

        self.targets = vec![RenderTargetDesc::new(SHADED_SCENE_PIPE, ctx.native_size(), format)];
        ctx.publish(SHADED_SCENE_PIPE, self.targets.clone());
        Ok(())
    }

    fn targets(&self) -> &[RenderTargetDesc] {
        &self.targets
    }
}
