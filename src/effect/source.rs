//! Effect Sources
//!
//! An [`EffectSource`] maps a logical effect path (`"effects/default.json"`)
//! to document text. The resolver asks its sources in order and takes the
//! first one that knows the path.
//!
//! | Source | Backing store |
//! |--------|---------------|
//! | [`FsEffectSource`] | Files below a root directory |
//! | [`EmbeddedEffectSource`] | Built-in effects compiled into the crate |
//! | [`MemoryEffectSource`] | Documents registered at runtime |

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use rustc_hash::FxHashMap;

use crate::errors::{PipelineError, Result};

/// Provides effect document text by logical path.
pub trait EffectSource {
    /// Returns `Ok(None)` when this source does not know `path`.
    fn read(&self, path: &str) -> Result<Option<Cow<'_, str>>>;
}

/// Reads effect documents from the filesystem.
#[derive(Debug, Clone)]
pub struct FsEffectSource {
    root: PathBuf,
}

impl FsEffectSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EffectSource for FsEffectSource {
    fn read(&self, path: &str) -> Result<Option<Cow<'_, str>>> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&full)?;
        Ok(Some(Cow::Owned(text)))
    }
}

#[derive(RustEmbed)]
#[folder = "assets/effects"]
#[prefix = "effects/"]
struct BuiltinEffects;

/// Effects shipped with the crate (`effects/default.json`, `effects/skybox.json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedEffectSource;

impl EffectSource for EmbeddedEffectSource {
    fn read(&self, path: &str) -> Result<Option<Cow<'_, str>>> {
        let Some(file) = BuiltinEffects::get(path) else {
            return Ok(None);
        };
        let text = String::from_utf8(file.data.into_owned())
            .map_err(|_| PipelineError::load(path, "built-in effect is not valid UTF-8"))?;
        Ok(Some(Cow::Owned(text)))
    }
}

/// In-memory effect documents, mainly for hosts that generate effects and
/// for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryEffectSource {
    documents: FxHashMap<String, String>,
}

impl MemoryEffectSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a document.
    pub fn insert(&mut self, path: &str, text: impl Into<String>) {
        self.documents.insert(path.to_string(), text.into());
    }

    #[must_use]
    pub fn with(mut self, path: &str, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.documents.remove(path).is_some()
    }
}

impl EffectSource for MemoryEffectSource {
    fn read(&self, path: &str) -> Result<Option<Cow<'_, str>>> {
        Ok(self.documents.get(path).map(|s| Cow::Borrowed(s.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_exist() {
        let source = EmbeddedEffectSource;
        assert!(source.read("effects/default.json").unwrap().is_some());
        assert!(source.read("effects/skybox.json").unwrap().is_some());
        assert!(source.read("effects/missing.json").unwrap().is_none());
    }

    #[test]
    fn test_memory_source() {
        let mut source = MemoryEffectSource::new().with("a.json", "{}");
        assert_eq!(source.read("a.json").unwrap().as_deref(), Some("{}"));
        assert!(source.remove("a.json"));
        assert!(source.read("a.json").unwrap().is_none());
    }

    #[test]
    fn test_fs_source_missing_file() {
        let source = FsEffectSource::new("/nonexistent-effect-root");
        assert!(source.read("effects/default.json").unwrap().is_none());
    }
}
