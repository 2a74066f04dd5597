use crate::errors::Result;
use crate::pipeline::PipelineContext;
use crate::renderer::graph::stages::{
    AmbientStage, CombineVelocityStage, DownscaleZStage, FinalStage, GBufferStage, UpscaleStage,
};

impl PipelineContext {
    /// Registers the stages every pipeline needs, in order:
    /// ambient, gbuffer, final, downscale-z, combine-velocity, and the
    /// upscaler when the resolution scale is not close to `1.0`.
    pub fn init_common_stages(&mut self) -> Result<()> {
        self.stage_mgr.add_stage(Box::new(AmbientStage::new()))?;
        self.stage_mgr.add_stage(Box::new(GBufferStage::new()))?;
        self.stage_mgr.add_stage(Box::new(FinalStage::new()))?;
        self.stage_mgr.add_stage(Box::new(DownscaleZStage::new()))?;
        self.stage_mgr.add_stage(Box::new(CombineVelocityStage::new()))?;

        if self.settings.needs_resampling() {
            log::info!(
                "Resolution scale {} needs resampling, adding upscale stage",
                self.settings.resolution_scale
            );
            self.stage_mgr.add_stage(Box::new(UpscaleStage::new()))?;
        }
        Ok(())
    }
}
