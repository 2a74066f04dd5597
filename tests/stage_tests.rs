//! Stage registry tests
//!
//! Tests for:
//! - Common stage order and the optional upscaler
//! - Registration errors (duplicates, late additions)
//! - Pipe validation during setup
//! - Render target sizes

use glam::UVec2;
use prism::errors::{PipelineError, Result};
use prism::pipeline::PipelineContext;
use prism::renderer::graph::stages::{
    DOWNSCALED_DEPTH_PIPE, FINAL_IMAGE_PIPE, GBUFFER_DEPTH, GBUFFER_PIPE, SHADED_SCENE_PIPE,
};
use prism::renderer::graph::{RenderTargetDesc, Stage, StageContext, StageManager, TargetFormat};
use prism::renderer::{HostInfo, PipelineSettings};
use prism::scene::Scene;

// ============================================================================
// Helper
// ============================================================================

const COMMON_STAGES: [&str; 5] = [
    "AmbientStage",
    "GBufferStage",
    "FinalStage",
    "DownscaleZStage",
    "CombineVelocityStage",
];

fn settings_with_scale(scale: f32) -> PipelineSettings {
    PipelineSettings {
        resolution_scale: scale,
        native_resolution: UVec2::new(1920, 1080),
        create_default_skybox: false,
        ..Default::default()
    }
}

fn created(scale: f32) -> PipelineContext {
    let mut scene = Scene::new();
    let mut pipeline = PipelineContext::new(settings_with_scale(scale));
    pipeline.set_empty_loading_screen();
    pipeline.create(&mut scene, &HostInfo::default()).unwrap();
    pipeline
}

struct NamedStage {
    name: &'static str,
    requires: &'static [&'static str],
    produces: &'static [&'static str],
}

impl Stage for NamedStage {
    fn name(&self) -> &str {
        self.name
    }

    fn required_pipes(&self) -> &[&'static str] {
        self.requires
    }

    fn produced_pipes(&self) -> &[&'static str] {
        self.produces
    }

    fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
        for pipe in self.produces {
            let size = ctx.render_size();
            ctx.publish(pipe, vec![RenderTargetDesc::new(*pipe, size, TargetFormat::Rgba8Unorm)]);
        }
        Ok(())
    }
}

// ============================================================================
// Common Stages
// ============================================================================

#[test]
fn native_scale_registers_five_stages_in_order() {
    let pipeline = created(1.0);
    assert_eq!(pipeline.stage_manager().stage_names(), COMMON_STAGES);
}

#[test]
fn half_scale_adds_upscale_stage_last() {
    let pipeline = created(0.5);
    let names = pipeline.stage_manager().stage_names();
    assert_eq!(names.len(), 6);
    assert_eq!(&names[..5], COMMON_STAGES);
    assert_eq!(names[5], "UpscaleStage");
}

#[test]
fn scale_within_tolerance_skips_upscale() {
    assert_eq!(created(0.97).stage_manager().len(), 5);
    assert_eq!(created(1.04).stage_manager().len(), 5);
    assert_eq!(created(1.5).stage_manager().len(), 6);
}

#[test]
fn render_targets_follow_resolution_scale() {
    let pipeline = created(0.5);
    let stages = pipeline.stage_manager();

    let gbuffer = stages.pipe(GBUFFER_PIPE).unwrap();
    assert_eq!(gbuffer.targets.len(), 4);
    let depth = gbuffer.target(GBUFFER_DEPTH).unwrap();
    assert_eq!(depth.size, UVec2::new(960, 540));
    assert_eq!(depth.format, TargetFormat::Depth32Float);

    // The upscaler republishes the shaded scene at native size.
    let shaded = stages.pipe(SHADED_SCENE_PIPE).unwrap();
    assert_eq!(shaded.producer, "UpscaleStage");
    assert_eq!(stages.pipe_size(SHADED_SCENE_PIPE), Some(UVec2::new(1920, 1080)));

    assert_eq!(stages.pipe_size(FINAL_IMAGE_PIPE), Some(UVec2::new(1920, 1080)));

    let hiz = stages.pipe(DOWNSCALED_DEPTH_PIPE).unwrap().primary().unwrap();
    assert_eq!(hiz.size, UVec2::new(960, 540));
    assert_eq!(hiz.mip_levels, 10);
}

#[test]
fn stages_expose_created_targets() {
    let pipeline = created(1.0);
    let gbuffer = pipeline.stage_manager().stage("GBufferStage").unwrap();
    assert_eq!(gbuffer.targets().len(), 4);
    assert!(pipeline.stage_manager().stage("UpscaleStage").is_none());
}

// ============================================================================
// Registration Errors
// ============================================================================

#[test]
fn duplicate_stage_name_is_rejected() {
    let mut stages = StageManager::new();
    let bloom = || NamedStage { name: "Bloom", requires: &[], produces: &[] };

    stages.add_stage(Box::new(bloom())).unwrap();
    assert!(matches!(
        stages.add_stage(Box::new(bloom())),
        Err(PipelineError::StageRegistration { ref stage, .. }) if stage == "Bloom"
    ));
    assert_eq!(stages.len(), 1);
}

#[test]
fn init_common_stages_twice_is_rejected() {
    let mut pipeline = PipelineContext::new(settings_with_scale(1.0));
    pipeline.init_common_stages().unwrap();
    assert!(matches!(
        pipeline.init_common_stages(),
        Err(PipelineError::StageRegistration { .. })
    ));
}

#[test]
fn adding_after_create_is_rejected() {
    let mut pipeline = created(1.0);
    let late = NamedStage { name: "Late", requires: &[], produces: &[] };
    assert!(matches!(
        pipeline.stage_manager_mut().add_stage(Box::new(late)),
        Err(PipelineError::StageRegistration { .. })
    ));
}

// ============================================================================
// Pipe Validation
// ============================================================================

#[test]
fn unproduced_pipe_fails_setup() {
    let mut stages = StageManager::new();
    stages
        .add_stage(Box::new(NamedStage {
            name: "Reflections",
            requires: &["GBuffer", "Voxels"],
            produces: &["Reflections"],
        }))
        .unwrap();
    stages
        .add_stage(Box::new(NamedStage { name: "Geometry", requires: &[], produces: &["GBuffer"] }))
        .unwrap();

    match stages.setup(&PipelineSettings::default()) {
        Err(PipelineError::StageInit { stage, reason }) => {
            assert_eq!(stage, "Reflections");
            assert!(reason.contains("Voxels"));
        }
        other => panic!("expected StageInit, got {other:?}"),
    }
    assert!(!stages.is_setup());
}

#[test]
fn custom_stage_before_create_joins_pipeline() {
    let mut scene = Scene::new();
    let mut pipeline = PipelineContext::new(settings_with_scale(1.0));
    pipeline.set_empty_loading_screen();
    pipeline
        .stage_manager_mut()
        .add_stage(Box::new(NamedStage {
            name: "Bloom",
            requires: &["ShadedScene"],
            produces: &["Bloom"],
        }))
        .unwrap();

    pipeline.create(&mut scene, &HostInfo::default()).unwrap();
    let names = pipeline.stage_manager().stage_names();
    assert_eq!(names[0], "Bloom");
    assert_eq!(names.len(), 6);
    assert!(pipeline.stage_manager().pipe("Bloom").is_some());
}

#[test]
fn missing_stage_dependency_aborts_create() {
    let mut scene = Scene::new();
    let mut pipeline = PipelineContext::new(settings_with_scale(1.0));
    pipeline.set_empty_loading_screen();
    pipeline
        .stage_manager_mut()
        .add_stage(Box::new(NamedStage {
            name: "VolumetricClouds",
            requires: &["SkyAtmosphere"],
            produces: &[],
        }))
        .unwrap();

    assert!(matches!(
        pipeline.create(&mut scene, &HostInfo::default()),
        Err(PipelineError::StageInit { .. })
    ));
    assert!(!pipeline.is_created());
}
