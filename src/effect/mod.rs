//! Effects
//!
//! An effect describes how a renderable takes part in each conditional pass:
//! which passes are enabled, which material features are compiled in, and
//! which code is injected into the pass shaders.
//!
//! - [`EffectResolver`]: loads, validates, resolves and caches effects
//! - [`EffectDescriptor`]: the immutable resolution result
//! - [`EffectSource`]: where effect documents come from

pub mod descriptor;
pub mod document;
pub mod options;
pub mod resolver;
pub mod source;

pub use descriptor::{EffectDescriptor, EffectId};
pub use document::{EffectDocument, PassInjections};
pub use options::{EffectOption, EffectOverrides, ResolvedOptions};
pub use resolver::EffectResolver;
pub use source::{EffectSource, EmbeddedEffectSource, FsEffectSource, MemoryEffectSource};
