//! Pipeline Settings & Host Description
//!
//! [`PipelineSettings`] is consumed once when the pipeline is created. It can
//! be built in code or loaded from a JSON document:
//!
//! ```rust,ignore
//! use prism::renderer::PipelineSettings;
//!
//! let settings = PipelineSettings {
//!     resolution_scale: 0.75,
//!     ..Default::default()
//! };
//!
//! let from_file = PipelineSettings::load("config/pipeline.json")?;
//! ```
//!
//! Missing keys fall back to their defaults:
//!
//! | Field | Default |
//! |-------|---------|
//! | `resolution_scale` | `1.0` |
//! | `native_resolution` | `1920 × 1080` |
//! | `enabled_plugins` | `["env_probes"]` |
//! | `effect_search_paths` | empty |
//! | `create_default_skybox` | `true` |
//! | `skybox_size` | `40000.0` |
//! | `default_effect_sort` | `-10` |

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use glam::UVec2;
use serde::Deserialize;

use crate::errors::{PipelineError, Result};

/// Plugin id of the environment probe capability.
pub const ENV_PROBES_PLUGIN: &str = "env_probes";

/// Resolution scales closer to `1.0` than this render at native resolution.
pub const RESOLUTION_SCALE_TOLERANCE: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Render resolution as a fraction of the native resolution.
    pub resolution_scale: f32,

    /// Output (window) resolution in pixels.
    pub native_resolution: UVec2,

    /// Ids of the plugins the host has activated.
    pub enabled_plugins: BTreeSet<String>,

    /// Directories searched for effect documents, in order, before the
    /// built-in effects.
    pub effect_search_paths: Vec<PathBuf>,

    /// Whether `create` adds the default skybox to the scene.
    pub create_default_skybox: bool,

    pub skybox_size: f32,

    /// Sort used for the fallback effect on the scene root.
    pub default_effect_sort: i32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            resolution_scale: 1.0,
            native_resolution: UVec2::new(1920, 1080),
            enabled_plugins: BTreeSet::from([ENV_PROBES_PLUGIN.to_string()]),
            effect_search_paths: Vec::new(),
            create_default_skybox: true,
            skybox_size: 40000.0,
            default_effect_sort: -10,
        }
    }
}

impl PipelineSettings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    #[must_use]
    pub fn is_plugin_enabled(&self, plugin: &str) -> bool {
        self.enabled_plugins.contains(plugin)
    }

    pub fn enable_plugin(&mut self, plugin: &str) {
        self.enabled_plugins.insert(plugin.to_string());
    }

    pub fn disable_plugin(&mut self, plugin: &str) -> bool {
        self.enabled_plugins.remove(plugin)
    }

    /// `true` when the render resolution differs enough from native to need
    /// a resampling stage.
    #[must_use]
    pub fn needs_resampling(&self) -> bool {
        (1.0 - self.resolution_scale).abs() > RESOLUTION_SCALE_TOLERANCE
    }

    /// Resolution the scene is rendered at, never below 1×1.
    #[must_use]
    pub fn render_resolution(&self) -> UVec2 {
        let scaled = self.native_resolution.as_vec2() * self.resolution_scale;
        scaled.round().as_uvec2().max(UVec2::ONE)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.resolution_scale.is_finite() && self.resolution_scale > 0.0) {
            return Err(PipelineError::InvalidSettings(format!(
                "invalid resolution scale {}",
                self.resolution_scale
            )));
        }
        if self.native_resolution.min_element() == 0 {
            return Err(PipelineError::InvalidSettings(
                "native resolution must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

bitflags! {
    /// Capabilities reported by the host engine.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct HostFeatures: u32 {
        /// Native lights expose the shadow caster flag and buffer size.
        const LIGHT_SHADOW_CASTER = 1 << 0;
        /// Native spotlights expose the cone exponent.
        const SPOTLIGHT_EXPONENT  = 1 << 1;
    }
}

/// Description of the host engine, checked once at pipeline creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub version: String,
    pub features: HostFeatures,
}

impl HostInfo {
    /// Features without which scene ingestion cannot work.
    pub const REQUIRED: HostFeatures = HostFeatures::LIGHT_SHADOW_CASTER;

    #[must_use]
    pub fn new(version: &str, features: HostFeatures) -> Self {
        Self {
            version: version.to_string(),
            features,
        }
    }

    /// Fails with [`PipelineError::VersionUnsupported`] when a required
    /// feature is missing.
    pub fn check(&self) -> Result<()> {
        let missing = Self::REQUIRED - self.features;
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter_names().map(|(name, _)| name).collect();
        Err(PipelineError::VersionUnsupported {
            version: self.version.clone(),
            missing: names.join(", "),
        })
    }
}

impl Default for HostInfo {
    fn default() -> Self {
        Self::new("unknown", HostFeatures::all())
    }
}
