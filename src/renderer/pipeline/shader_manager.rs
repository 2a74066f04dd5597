//! Shader Template Manager
//!
//! Generates per-pass WGSL sources from minijinja templates and deduplicates
//! them by content.
//!
//! Each conditional pass has one template (`gbuffer`, `shadows`, `voxelize`,
//! `envmap`). Templates receive the effect's resolved options as `options.*`
//! and the effect's code injections as `vertex.*` / `fragment.*`. The final
//! source is hashed with xxh3-128; identical sources share one
//! [`ShaderHandle`], so two effects that differ only in unrelated options can
//! still share the same shadow shader.
//!
//! Compilation to GPU modules is the host's job; this manager owns generation
//! and identity only.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use minijinja::{Environment, Error, ErrorKind, context, syntax::SyntaxConfig};
use rust_embed::RustEmbed;
use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_128;

use crate::effect::document::{FRAGMENT_HOOKS, PassInjections, VERTEX_HOOKS};
use crate::effect::options::ResolvedOptions;
use crate::errors::Result;
use crate::renderer::pass::Pass;

static SHADER_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(RustEmbed)]
#[folder = "assets/shaders"]
struct ShaderAssets;

fn get_env() -> &'static Environment<'static> {
    SHADER_ENV.get_or_init(|| {
        let mut env = Environment::new();

        let syntax = SyntaxConfig::builder()
            .block_delimiters("{$", "$}")
            .variable_delimiters("{{", "}}")
            .line_statement_prefix("$$")
            .build()
            .expect("Failed to configure Jinja2 syntax");

        env.set_syntax(syntax);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);

        env.set_loader(shader_loader);
        env.set_path_join_callback(|name, _parent| format!("chunks/{name}").into());

        env
    })
}

fn shader_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let filename = if std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wgsl"))
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}.wgsl"))
    };

    #[cfg(debug_assertions)]
    {
        let path = std::path::Path::new("assets/shaders").join(filename.as_ref());
        if path.exists() {
            return match std::fs::read_to_string(&path) {
                Ok(source) => Ok(Some(source)),
                Err(e) => Err(Error::new(
                    ErrorKind::TemplateNotFound,
                    format!("Failed to read file: {e}"),
                )),
            };
        }
    }

    if let Some(file) = ShaderAssets::get(&filename)
        && let Ok(source) = std::str::from_utf8(file.data.as_ref())
    {
        return Ok(Some(source.to_string()));
    }

    Ok(None)
}

/// Opaque identity of a generated shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub(crate) u32);

impl ShaderHandle {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A generated shader source.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    pub pass: Pass,
    pub source: String,
    pub hash: u128,
}

/// Content-addressed shader program cache.
pub struct ShaderManager {
    programs: Vec<ShaderProgram>,
    lookup: FxHashMap<u128, ShaderHandle>,
}

impl Default for ShaderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            programs: Vec::with_capacity(32),
            lookup: FxHashMap::default(),
        }
    }

    /// Renders the template for `pass` and returns the handle of the
    /// resulting source, reusing an existing program with identical text.
    pub fn generate(
        &mut self,
        pass: Pass,
        options: &ResolvedOptions,
        injections: &PassInjections,
    ) -> Result<ShaderHandle> {
        let template = get_env().get_template(pass.name())?;
        let source = template.render(context! {
            pass => pass.name(),
            options => options,
            view_projection => view_projection_uniform(pass),
            vertex => hook_table(VERTEX_HOOKS, &injections.vertex),
            fragment => hook_table(FRAGMENT_HOOKS, &injections.fragment),
        })?;

        Ok(self.intern(pass, source))
    }

    /// Registers a raw source, deduplicating by content.
    pub fn intern(&mut self, pass: Pass, source: String) -> ShaderHandle {
        let hash = xxh3_128(source.as_bytes());
        if let Some(&handle) = self.lookup.get(&hash) {
            return handle;
        }

        let handle = ShaderHandle(self.programs.len() as u32);
        log::debug!("New {pass} shader program #{} ({:032x})", handle.0, hash);
        self.programs.push(ShaderProgram { pass, source, hash });
        self.lookup.insert(hash, handle);
        handle
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: ShaderHandle) -> Option<&ShaderProgram> {
        self.programs.get(handle.index())
    }

    #[inline]
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }
}

fn view_projection_uniform(pass: Pass) -> &'static str {
    match pass {
        Pass::GBuffer => "u_camera.view_projection",
        Pass::Shadows => "u_shadow.view_projection",
        Pass::Voxelize => "u_voxel.view_projection",
        Pass::Envmap => "u_envmap.view_projection",
    }
}

/// Every known hook is present so templates never see undefined values.
fn hook_table<'a>(
    known: &[&'static str],
    injected: &'a BTreeMap<String, String>,
) -> BTreeMap<&'static str, &'a str> {
    known
        .iter()
        .map(|&hook| (hook, injected.get(hook).map_or("", String::as_str)))
        .collect()
}
