//! GBuffer Stage
//!
//! Owns the geometry buffer every deferred stage reads:
//!
//! | Target | Format |
//! |--------|--------|
//! | `GBuffer.Depth` | `Depth32Float` |
//! | `GBuffer.Data0` | `Rgba16Float` |
//! | `GBuffer.Data1` | `Rgba16Float` |
//! | `GBuffer.Data2` | `Rgba16Float` |

use crate::errors::Result;
use crate::renderer::graph::stage::{RenderTargetDesc, Stage, StageContext, TargetFormat};
use crate::renderer::graph::stages::GBUFFER_PIPE;

pub const GBUFFER_DEPTH: &str = "GBuffer.Depth";

const DATA_TARGETS: [&str; 3] = ["GBuffer.Data0", "GBuffer.Data1", "GBuffer.Data2"];

#[derive(Default)]
pub struct GBufferStage {
    targets: Vec<RenderTargetDesc>,
}

impl GBufferStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for GBufferStage {
    fn name(&self) -> &str {
        "GBufferStage"
    }

    fn produced_pipes(&self) -> &[&'static str] {
        &[GBUFFER_PIPE]
    }

    fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
        let size = ctx.render_size();
        let mut targets = Vec::with_capacity(1 + DATA_TARGETS.len());
        targets.push(RenderTargetDesc::new(GBUFFER_DEPTH, size, TargetFormat::Depth32Float));
        targets.extend(
            DATA_TARGETS
                .iter()
                .map(|name| RenderTargetDesc::new(*name, size, TargetFormat::Rgba16Float)),
        );
        self.targets = targets;
        ctx.publish(GBUFFER_PIPE, self.targets.clone());
        Ok(())
    }

    fn targets(&self) -> &[RenderTargetDesc] {
        &self.targets
    }
}
