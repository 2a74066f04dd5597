//! Pipeline Context
//!
//! [`PipelineContext`] is the host-facing entry point. It owns every
//! pipeline subsystem and wires them together:
//!
//! ```text
//! PipelineContext
//!  ├── PipelineSettings      (consumed at create)
//!  ├── LoadingScreen         (progress during create)
//!  ├── StageManager          (ordered stages, pipes)
//!  ├── TagStateManager       (per-pass bindings on scene nodes)
//!  ├── EffectResolver        (effect documents → descriptors)
//!  ├── LightManager          (lights, shadow sources)
//!  ├── ProbeManager          (environment probes)
//!  └── IesProfileManager     (IES profile handles)
//! ```
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let mut scene = Scene::new();
//! let mut pipeline = PipelineContext::new(PipelineSettings::default());
//! pipeline.create(&mut scene, &HostInfo::default())?;
//!
//! let prepared = pipeline.prepare_scene(&mut scene, scene.root());
//! pipeline.apply_effect(&mut scene, mesh, "effects/default.json", &EffectOverrides::new(), 0)?;
//! ```
//!
//! All operations are synchronous and need `&mut self`.

mod effects;
mod ingest;
pub mod loading_screen;
mod stages;

pub use ingest::PreparedScene;
pub use loading_screen::{EmptyLoadingScreen, LoadingScreen, LogLoadingScreen};

use crate::effect::{EffectResolver, FsEffectSource};
use crate::errors::Result;
use crate::lighting::{IesProfileManager, LightManager, NullProbe, ProbeManager};
use crate::renderer::{HostInfo, PipelineSettings, StageManager, TagMaskManager, TagStateManager};
use crate::scene::{NodeHandle, Scene};

pub struct PipelineContext {
    settings: PipelineSettings,
    loading_screen: Box<dyn LoadingScreen>,
    stage_mgr: StageManager,
    tag_mgr: Box<dyn TagStateManager>,
    effects: EffectResolver,
    light_mgr: LightManager,
    probe_mgr: ProbeManager,
    ies_profiles: IesProfileManager,
    null_probe: NullProbe,
    skybox: Option<NodeHandle>,
    is_created: bool,
}

impl PipelineContext {
    #[must_use]
    pub fn new(settings: PipelineSettings) -> Self {
        let mut effects = EffectResolver::new();
        for path in &settings.effect_search_paths {
            effects.add_source(FsEffectSource::new(path));
        }

        Self {
            settings,
            loading_screen: Box::new(LogLoadingScreen::new()),
            stage_mgr: StageManager::new(),
            tag_mgr: Box::new(TagMaskManager::new()),
            effects,
            light_mgr: LightManager::new(),
            probe_mgr: ProbeManager::new(),
            ies_profiles: IesProfileManager::new(),
            null_probe: NullProbe,
            skybox: None,
            is_created: false,
        }
    }

    /// Builds the pipeline.
    ///
    /// Order: host check → settings check → loading screen → common stages →
    /// stage setup → default effect on the scene root → default skybox →
    /// loading screen removed.
    ///
    /// Fails with [`PipelineError::VersionUnsupported`](crate::errors::PipelineError::VersionUnsupported)
    /// before any stage is touched when the host lacks a required feature.
    pub fn create(&mut self, scene: &mut Scene, host: &HostInfo) -> Result<()> {
        if self.is_created {
            log::warn!("PipelineContext::create called twice; ignoring");
            return Ok(());
        }

        host.check()?;
        self.settings.validate()?;

        self.loading_screen.create();

        self.loading_screen.progress("Initializing stages");
        self.init_common_stages()?;

        self.loading_screen.progress("Creating render targets");
        self.stage_mgr.setup(&self.settings)?;

        self.loading_screen.progress("Applying default effect");
        self.set_default_effect(scene)?;

        if self.settings.create_default_skybox {
            self.loading_screen.progress("Creating default skybox");
            let size = self.settings.skybox_size;
            self.skybox = Some(self.create_default_skybox(scene, size)?);
        }

        self.loading_screen.remove();
        self.is_created = true;
        log::info!(
            "Pipeline created on host {} with stages: {}",
            host.version,
            self.stage_mgr.stage_names().join(", ")
        );
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.is_created
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    // ========================================================================
    // Loading screen
    // ========================================================================

    pub fn set_loading_screen(&mut self, screen: Box<dyn LoadingScreen>) {
        self.loading_screen = screen;
    }

    pub fn set_default_loading_screen(&mut self) {
        self.loading_screen = Box::new(LogLoadingScreen::new());
    }

    pub fn set_empty_loading_screen(&mut self) {
        self.loading_screen = Box::new(EmptyLoadingScreen);
    }

    #[must_use]
    pub fn loading_screen(&self) -> &dyn LoadingScreen {
        self.loading_screen.as_ref()
    }

    // ========================================================================
    // Subsystems
    // ========================================================================

    /// Replaces the tag manager. Bindings already written stay on the nodes.
    pub fn set_tag_manager(&mut self, manager: Box<dyn TagStateManager>) {
        self.tag_mgr = manager;
    }

    #[must_use]
    pub fn tag_manager(&self) -> &dyn TagStateManager {
        self.tag_mgr.as_ref()
    }

    #[must_use]
    pub fn stage_manager(&self) -> &StageManager {
        &self.stage_mgr
    }

    /// Mutable stage access, for registering custom stages before `create`.
    #[must_use]
    pub fn stage_manager_mut(&mut self) -> &mut StageManager {
        &mut self.stage_mgr
    }

    #[must_use]
    pub fn effects(&self) -> &EffectResolver {
        &self.effects
    }

    #[must_use]
    pub fn effects_mut(&mut self) -> &mut EffectResolver {
        &mut self.effects
    }

    #[must_use]
    pub fn light_manager(&self) -> &LightManager {
        &self.light_mgr
    }

    #[must_use]
    pub fn probe_manager(&self) -> &ProbeManager {
        &self.probe_mgr
    }

    #[must_use]
    pub fn ies_profiles(&self) -> &IesProfileManager {
        &self.ies_profiles
    }

    /// The skybox node created during `create`, if any.
    #[must_use]
    pub fn skybox(&self) -> Option<NodeHandle> {
        self.skybox
    }
}
