//! Stage Trait & Pipes
//!
//! A [`Stage`] is a named contributor of render passes. Stages talk to each
//! other only through *pipes*: named bundles of render targets that one stage
//! publishes during [`Stage::create`] and later stages read.
//!
//! ```text
//!   GBufferStage ──► "GBuffer" ──┬──► AmbientStage ──► "ShadedScene" ──► FinalStage
//!                                ├──► DownscaleZStage ──► "DownscaledDepth"
//!                                └──► CombineVelocityStage ──► "CombinedVelocity"
//! ```
//!
//! The pipe contract is declared up front via [`Stage::required_pipes`] and
//! [`Stage::produced_pipes`]; the [`StageManager`](super::StageManager)
//! checks it before any stage is created.

use glam::UVec2;
use rustc_hash::FxHashMap;

use crate::errors::{PipelineError, Result};

/// Storage format of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Rgba8Unorm,
    Rgba16Float,
    Rg16Float,
    R32Float,
    Depth32Float,
}

impl TargetFormat {
    /// Bytes per texel at mip level 0.
    #[must_use]
    pub const fn texel_size(self) -> u32 {
        match self {
            Self::Rgba8Unorm | Self::Rg16Float | Self::R32Float | Self::Depth32Float => 4,
            Self::Rgba16Float => 8,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_depth(self) -> bool {
        matches!(self, Self::Depth32Float)
    }
}

/// Descriptor of one render target owned by a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargetDesc {
    pub name: String,
    pub size: UVec2,
    pub format: TargetFormat,
    pub mip_levels: u32,
}

impl RenderTargetDesc {
    #[must_use]
    pub fn new(name: impl Into<String>, size: UVec2, format: TargetFormat) -> Self {
        Self {
            name: name.into(),
            size,
            format,
            mip_levels: 1,
        }
    }

    #[must_use]
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels.max(1);
        self
    }
}

/// A published bundle of render targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipe {
    pub name: String,
    /// Stage that last published this pipe.
    pub producer: String,
    pub targets: Vec<RenderTargetDesc>,
}

impl Pipe {
    /// The first target of the pipe, which defines its nominal size.
    #[must_use]
    pub fn primary(&self) -> Option<&RenderTargetDesc> {
        self.targets.first()
    }

    #[must_use]
    pub fn target(&self, name: &str) -> Option<&RenderTargetDesc> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// Mutable view of pipeline resources handed to [`Stage::create`].
pub struct StageContext<'a> {
    pub(crate) stage: &'a str,
    pub(crate) render_size: UVec2,
    pub(crate) native_size: UVec2,
    pub(crate) pipes: &'a mut FxHashMap<String, Pipe>,
}

impl StageContext<'_> {
    /// Resolution the scene is rendered at.
    #[inline]
    #[must_use]
    pub fn render_size(&self) -> UVec2 {
        self.render_size
    }

    /// Output resolution.
    #[inline]
    #[must_use]
    pub fn native_size(&self) -> UVec2 {
        self.native_size
    }

    /// Looks up a pipe published by an earlier stage.
    ///
    /// Fails with [`PipelineError::StageInit`] when no earlier stage has
    /// published `name` yet.
    pub fn pipe(&self, name: &str) -> Result<&Pipe> {
        self.pipes.get(name).ok_or_else(|| {
            PipelineError::stage_init(
                self.stage,
                format!("pipe '{name}' has not been published by an earlier stage"),
            )
        })
    }

    /// Publishes (or republishes) a pipe under this stage's name.
    pub fn publish(&mut self, name: &str, targets: Vec<RenderTargetDesc>) {
        if let Some(previous) = self.pipes.get(name) {
            log::debug!(
                "Stage '{}' republishes pipe '{name}' (was '{}')",
                self.stage,
                previous.producer
            );
        }
        self.pipes.insert(
            name.to_string(),
            Pipe {
                name: name.to_string(),
                producer: self.stage.to_string(),
                targets,
            },
        );
    }
}

/// Named contributor of passes to the pipeline.
///
/// Stages are stateless with respect to renderables. Their state is the
/// render targets they create once during [`create`](Self::create).
pub trait Stage {
    /// Unique name of the stage.
    fn name(&self) -> &str;

    /// Pipes that must be produced by some registered stage.
    fn required_pipes(&self) -> &[&'static str] {
        &[]
    }

    /// Pipes this stage publishes during `create`.
    fn produced_pipes(&self) -> &[&'static str] {
        &[]
    }

    /// Creates the stage's render targets.
    fn create(&mut self, ctx: &mut StageContext) -> Result<()>;

    /// Descriptors of the render targets this stage created.
    fn targets(&self) -> &[RenderTargetDesc] {
        &[]
    }
}
