//! Stage Manager
//!
//! Ordered registry of [`Stage`]s. Stages are appended once during pipeline
//! construction and never removed. [`StageManager::setup`] runs in two phases:
//!
//! 1. **Validate**: every required pipe must be produced by some registered
//!    stage, otherwise [`PipelineError::StageInit`].
//! 2. **Create**: stages create their targets in registration order. A stage
//!    that reads a pipe at creation time needs it published by an earlier
//!    stage.

use glam::UVec2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{PipelineError, Result};
use crate::renderer::graph::stage::{Pipe, Stage, StageContext};
use crate::renderer::settings::PipelineSettings;

#[derive(Default)]
pub struct StageManager {
    stages: Vec<Box<dyn Stage>>,
    pipes: FxHashMap<String, Pipe>,
    is_setup: bool,
}

impl StageManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    ///
    /// Fails with [`PipelineError::StageRegistration`] if a stage with the
    /// same name is already registered or setup has already run.
    pub fn add_stage(&mut self, stage: Box<dyn Stage>) -> Result<()> {
        let name = stage.name().to_string();
        if self.is_setup {
            return Err(PipelineError::StageRegistration {
                stage: name,
                reason: "stages cannot be added after setup".to_string(),
            });
        }
        if self.has_stage(&name) {
            return Err(PipelineError::StageRegistration {
                stage: name,
                reason: "a stage with this name is already registered".to_string(),
            });
        }
        log::debug!("Registered stage '{name}'");
        self.stages.push(stage);
        Ok(())
    }

    /// Validates the pipe contract and creates every stage's targets.
    pub fn setup(&mut self, settings: &PipelineSettings) -> Result<()> {
        if self.is_setup {
            log::warn!("StageManager::setup called twice; ignoring");
            return Ok(());
        }

        let produced: FxHashSet<&str> = self
            .stages
            .iter()
            .flat_map(|s| s.produced_pipes().iter().copied())
            .collect();
        for stage in &self.stages {
            if let Some(missing) = stage
                .required_pipes()
                .iter()
                .find(|pipe| !produced.contains(*pipe))
            {
                return Err(PipelineError::stage_init(
                    stage.name(),
                    format!("required pipe '{missing}' is not produced by any stage"),
                ));
            }
        }

        let render_size = settings.render_resolution();
        let native_size = settings.native_resolution;
        for stage in &mut self.stages {
            let name = stage.name().to_string();
            let mut ctx = StageContext {
                stage: &name,
                render_size,
                native_size,
                pipes: &mut self.pipes,
            };
            stage.create(&mut ctx)?;
            log::debug!("Created stage '{name}' ({} targets)", stage.targets().len());
        }

        self.is_setup = true;
        log::info!(
            "Stage setup complete: {} stages, render {}x{}, native {}x{}",
            self.stages.len(),
            render_size.x,
            render_size.y,
            native_size.x,
            native_size.y
        );
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    #[must_use]
    pub fn has_stage(&self, name: &str) -> bool {
        self.stages.iter().any(|s| s.name() == name)
    }

    /// Stage names in registration order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&dyn Stage> {
        self.stages
            .iter()
            .find(|s| s.name() == name)
            .map(|s| &**s)
    }

    /// A pipe as last published during setup.
    #[must_use]
    pub fn pipe(&self, name: &str) -> Option<&Pipe> {
        self.pipes.get(name)
    }

    /// Size of the first target of a published pipe.
    #[must_use]
    pub fn pipe_size(&self, name: &str) -> Option<UVec2> {
        self.pipe(name).and_then(Pipe::primary).map(|t| t.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::graph::stage::{RenderTargetDesc, TargetFormat};

    struct Producer;

    impl Stage for Producer {
        fn name(&self) -> &str {
            "Producer"
        }
        fn produced_pipes(&self) -> &[&'static str] {
            &["Color"]
        }
        fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
            let size = ctx.render_size();
            ctx.publish(
                "Color",
                vec![RenderTargetDesc::new("Color", size, TargetFormat::Rgba8Unorm)],
            );
            Ok(())
        }
    }

    struct Consumer;

    impl Stage for Consumer {
        fn name(&self) -> &str {
            "Consumer"
        }
        fn required_pipes(&self) -> &[&'static str] {
            &["Color"]
        }
        fn create(&mut self, ctx: &mut StageContext) -> Result<()> {
            ctx.pipe("Color")?;
            Ok(())
        }
    }

    #[test]
    fn test_consumer_before_producer_fails_at_create() {
        let mut manager = StageManager::new();
        manager.add_stage(Box::new(Consumer)).unwrap();
        manager.add_stage(Box::new(Producer)).unwrap();
        let err = manager.setup(&PipelineSettings::default()).unwrap_err();
        assert!(matches!(err, PipelineError::StageInit { ref stage, .. } if stage == "Consumer"));
    }

    #[test]
    fn test_add_after_setup_rejected() {
        let mut manager = StageManager::new();
        manager.add_stage(Box::new(Producer)).unwrap();
        manager.setup(&PipelineSettings::default()).unwrap();
        assert!(matches!(
            manager.add_stage(Box::new(Consumer)),
            Err(PipelineError::StageRegistration { .. })
        ));
    }
}
