//! Stage Graph
//!
//! Provides:
//! - [`Stage`]: named contributor of passes
//! - [`StageManager`]: ordered stage registry with a two-phase setup
//! - [`Pipe`] / [`RenderTargetDesc`]: render targets shared between stages
//! - [`stages`]: the built-in stages

pub mod stage;
pub mod stage_manager;
pub mod stages;

pub use stage::{Pipe, RenderTargetDesc, Stage, StageContext, TargetFormat};
pub use stage_manager::StageManager;
