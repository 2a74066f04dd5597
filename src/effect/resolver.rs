//! Effect Resolver
//!
//! Turns `(path, overrides)` into an [`EffectDescriptor`]:
//!
//! 1. Validate override names (unknown name → [`PipelineError::Config`])
//! 2. Load the document from the first source that knows the path
//!    (missing or malformed → [`PipelineError::Load`])
//! 3. Resolve every option: override, else declared default, else built-in default
//! 4. Generate one shader per enabled pass
//!
//! Results are cached by `(path, overrides)`. The cache is only invalidated
//! through [`EffectResolver::reload`] and [`EffectResolver::clear_cache`].

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::effect::descriptor::{EffectDescriptor, EffectId};
use crate::effect::document::EffectDocument;
use crate::effect::options::{EffectOption, EffectOverrides, ResolvedOptions};
use crate::effect::source::{EffectSource, EmbeddedEffectSource};
use crate::errors::{PipelineError, Result};
use crate::renderer::pass::Pass;
use crate::renderer::pipeline::ShaderManager;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EffectKey {
    path: String,
    overrides: EffectOverrides,
}

pub struct EffectResolver {
    sources: Vec<Box<dyn EffectSource>>,
    builtin: EmbeddedEffectSource,
    shaders: ShaderManager,
    cache: FxHashMap<EffectKey, Arc<EffectDescriptor>>,
    next_id: u32,
}

impl Default for EffectResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectResolver {
    /// A resolver that only knows the built-in effects.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            builtin: EmbeddedEffectSource,
            shaders: ShaderManager::new(),
            cache: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Appends a source. Sources are searched in insertion order; the
    /// built-in effects are always searched last.
    pub fn add_source(&mut self, source: impl EffectSource + 'static) {
        self.sources.push(Box::new(source));
    }

    #[must_use]
    pub fn with_source(mut self, source: impl EffectSource + 'static) -> Self {
        self.add_source(source);
        self
    }

    /// Resolves an effect, returning the cached descriptor when the same
    /// `(path, overrides)` pair was resolved before.
    pub fn resolve(&mut self, path: &str, overrides: &EffectOverrides) -> Result<Arc<EffectDescriptor>> {
        validate_overrides(path, overrides)?;

        let key = EffectKey {
            path: path.to_string(),
            overrides: overrides.clone(),
        };
        if let Some(cached) = self.cache.get(&key) {
            return Ok(Arc::clone(cached));
        }

        let document = self.load_document(path)?;

        let mut options = ResolvedOptions::default();
        for (&option, &value) in &document.declared {
            options.set(option, value);
        }
        for (name, value) in overrides.iter() {
            // Names were validated above.
            if let Some(option) = EffectOption::from_name(name) {
                options.set(option, value);
            }
        }

        let mut shaders = [None; Pass::COUNT];
        for pass in Pass::ALL {
            if options.get(pass.option()) {
                let handle = self
                    .shaders
                    .generate(pass, &options, document.injections(pass))?;
                shaders[pass.index()] = Some(handle);
            }
        }

        let id = EffectId(self.next_id);
        self.next_id += 1;

        let descriptor = Arc::new(EffectDescriptor {
            id,
            source: key.path.clone(),
            overrides: key.overrides.clone(),
            options,
            shaders,
        });
        log::debug!("Resolved effect '{path}' as #{id}");

        self.cache.insert(key, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Drops every cached resolution of `path`. The next `resolve` reloads
    /// the document. Returns the number of dropped entries.
    pub fn reload(&mut self, path: &str) -> usize {
        let before = self.cache.len();
        self.cache.retain(|key, _| key.path != path);
        let dropped = before - self.cache.len();
        if dropped > 0 {
            log::info!("Reloading effect '{path}' ({dropped} cached variants dropped)");
        }
        dropped
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    #[inline]
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    #[must_use]
    pub fn shaders(&self) -> &ShaderManager {
        &self.shaders
    }

    fn load_document(&self, path: &str) -> Result<EffectDocument> {
        let builtin: &(dyn EffectSource + 'static) = &self.builtin;
        let sources = self.sources.iter().map(|s| &**s);
        for source in sources.chain(std::iter::once(builtin)) {
            let text = source
                .read(path)
                .map_err(|e| PipelineError::load(path, e.to_string()))?;
            if let Some(text) = text {
                return EffectDocument::parse(path, &text);
            }
        }
        Err(PipelineError::load(path, "not found in any effect source"))
    }
}

fn validate_overrides(path: &str, overrides: &EffectOverrides) -> Result<()> {
    match overrides.iter().find(|(name, _)| EffectOption::from_name(name).is_none()) {
        Some((name, _)) => Err(PipelineError::Config {
            path: path.to_string(),
            option: name.to_string(),
        }),
        None => Ok(()),
    }
}
