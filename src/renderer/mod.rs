//! Renderer Core
//!
//! Pipeline-level building blocks shared by the effect system and the
//! pipeline context:
//!
//! - [`pass`]: the four conditional per-object passes and their masks
//! - [`pipeline`]: shader generation and deduplication
//! - [`graph`]: stage registry and the built-in stages
//! - [`tag_state`]: per-pass shader binding and visibility on scene nodes
//! - [`settings`]: pipeline settings and host description

pub mod graph;
pub mod pass;
pub mod pipeline;
pub mod settings;
pub mod tag_state;

pub use graph::{Stage, StageManager};
pub use pass::{Pass, PassMask};
pub use pipeline::{ShaderHandle, ShaderManager};
pub use settings::{HostFeatures, HostInfo, PipelineSettings};
pub use tag_state::{TagMaskManager, TagStateManager};
