//! Shader generation for the conditional passes.
//!
//! - shader_manager: template rendering and content-addressed program cache

pub mod shader_manager;

pub use shader_manager::{ShaderHandle, ShaderManager, ShaderProgram};
