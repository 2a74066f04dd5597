//! Error Types
//!
//! This module defines the error types used throughout the pipeline core.
//!
//! # Overview
//!
//! The main error type [`PipelineError`] covers all failure modes including:
//! - Effect loading and option validation
//! - Host capability and version checks
//! - Stage registration and initialization
//! - Configuration file I/O and parsing
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, PipelineError>`.
//!
//! ```rust,ignore
//! use prism::errors::{PipelineError, Result};
//!
//! fn build() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the pipeline core.
#[derive(Error, Debug)]
pub enum PipelineError {
    // ========================================================================
    // Effect Errors
    // ========================================================================
    /// The effect source is missing or malformed.
    #[error("Failed to load effect '{path}': {reason}")]
    Load {
        /// Logical path of the effect source
        path: String,
        /// What went wrong
        reason: String,
    },

    /// An option override names an option the effect system does not know.
    #[error("Unrecognized effect option '{option}' for '{path}'")]
    Config {
        /// Logical path of the effect source
        path: String,
        /// The offending option name
        option: String,
    },

    /// Shader template rendering failed.
    #[error("Shader generation error: {0}")]
    Shader(String),

    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// A plugin-provided capability is not enabled.
    #[error("Capability not available: {0}")]
    CapabilityUnavailable(String),

    /// The host engine lacks a capability the pipeline needs.
    #[error("Host engine version {version} is unsupported: missing {missing}")]
    VersionUnsupported {
        /// Host version string
        version: String,
        /// Description of the missing features
        missing: String,
    },

    /// Pipeline settings are out of range.
    #[error("Invalid pipeline settings: {0}")]
    InvalidSettings(String),

    // ========================================================================
    // Stage Errors
    // ========================================================================
    /// A stage could not be added to the registry.
    #[error("Cannot register stage '{stage}': {reason}")]
    StageRegistration {
        /// Stage name
        stage: String,
        /// What went wrong
        reason: String,
    },

    /// A stage failed to initialize. Always fatal.
    #[error("Stage '{stage}' failed to initialize: {reason}")]
    StageInit {
        /// Stage name
        stage: String,
        /// What went wrong
        reason: String,
    },

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// The node handle does not refer to a live node.
    #[error("Invalid scene node: {0}")]
    InvalidNode(String),

    // ========================================================================
    // I/O & Parsing Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn load(path: &str, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn stage_init(stage: &str, reason: impl Into<String>) -> Self {
        Self::StageInit {
            stage: stage.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<minijinja::Error> for PipelineError {
    fn from(err: minijinja::Error) -> Self {
        PipelineError::Shader(err.to_string())
    }
}

/// Alias for `Result<T, PipelineError>`.
pub type Result<T> = std::result::Result<T, PipelineError>;
