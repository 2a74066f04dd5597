//! Built-in Stages
//!
//! The common stages every pipeline registers, plus the optional upscaler.

mod ambient;
mod combine_velocity;
mod downscale_z;
mod final_stage;
mod gbuffer;
mod upscale;

pub use ambient::AmbientStage;
pub use combine_velocity::CombineVelocityStage;
pub use downscale_z::DownscaleZStage;
pub use final_stage::FinalStage;
pub use gbuffer::{GBUFFER_DEPTH, GBufferStage};
pub use upscale::UpscaleStage;

/// Pipe holding the geometry buffer (depth + three data targets).
pub const GBUFFER_PIPE: &str = "GBuffer";
/// Pipe holding the lit scene color.
pub const SHADED_SCENE_PIPE: &str = "ShadedScene";
/// Pipe holding the final output image.
pub const FINAL_IMAGE_PIPE: &str = "FinalImage";
/// Pipe holding the hierarchical depth chain.
pub const DOWNSCALED_DEPTH_PIPE: &str = "DownscaledDepth";
/// Pipe holding the combined camera + object velocity.
pub const COMBINED_VELOCITY_PIPE: &str = "CombinedVelocity";
