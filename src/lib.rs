#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Prism Pipeline
//!
//! Core of a deferred real-time render pipeline: per-object effects bound to
//! four conditional passes, an ordered stage registry, and ingestion of
//! host-side light and probe placeholders.

pub mod effect;
pub mod errors;
pub mod lighting;
pub mod pipeline;
pub mod renderer;
pub mod scene;

pub use effect::{EffectDescriptor, EffectOverrides, EffectResolver};
pub use errors::{PipelineError, Result};
pub use lighting::{Light, LightKind, LightManager};
pub use pipeline::{PipelineContext, PreparedScene};
pub use renderer::{HostFeatures, HostInfo, Pass, PassMask, PipelineSettings};
pub use scene::{Node, NodeHandle, NodeKind, Scene};
