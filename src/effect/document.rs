//! Effect document format.
//!
//! An effect is a JSON document with an optional `options` table declaring
//! default values and one optional table per pass holding shader code
//! injections:
//!
//! ```json
//! {
//!     "options": { "render_shadows": false, "alpha_testing": true },
//!     "gbuffer": {
//!         "vertex":   { "post_transform": "vOutput.position.z += 0.0;" },
//!         "fragment": { "material": "m.roughness = 0.4;" }
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effect::options::EffectOption;
use crate::errors::{PipelineError, Result};
use crate::renderer::pass::Pass;

/// Injection points exposed by the vertex templates.
pub const VERTEX_HOOKS: &[&str] = &["inout", "transform", "post_transform"];

/// Injection points exposed by the fragment templates.
pub const FRAGMENT_HOOKS: &[&str] = &["inout", "material", "main_end"];

/// Shader code injections for a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PassInjections {
    #[serde(default)]
    pub vertex: BTreeMap<String, String>,
    #[serde(default)]
    pub fragment: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    options: BTreeMap<String, serde_json::Value>,
    #[serde(flatten)]
    passes: BTreeMap<String, serde_json::Value>,
}

/// A parsed and validated effect document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectDocument {
    /// Option defaults declared by the document.
    pub declared: BTreeMap<EffectOption, bool>,
    /// Injections indexed by [`Pass::index`].
    pub injections: [PassInjections; Pass::COUNT],
}

impl EffectDocument {
    /// Parses `text` loaded from `path`.
    ///
    /// Every failure is reported as [`PipelineError::Load`]: a document that
    /// names unknown options, passes or hooks is malformed.
    pub fn parse(path: &str, text: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(text)
            .map_err(|e| PipelineError::load(path, format!("invalid JSON: {e}")))?;

        let mut doc = EffectDocument::default();

        for (name, value) in raw.options {
            let option = EffectOption::from_name(&name)
                .ok_or_else(|| PipelineError::load(path, format!("unknown option '{name}'")))?;
            let value = value.as_bool().ok_or_else(|| {
                PipelineError::load(path, format!("option '{name}' must be a boolean"))
            })?;
            doc.declared.insert(option, value);
        }

        for (name, value) in raw.passes {
            let pass = Pass::from_name(&name)
                .ok_or_else(|| PipelineError::load(path, format!("unknown pass '{name}'")))?;
            let injections: PassInjections = serde_json::from_value(value)
                .map_err(|e| PipelineError::load(path, format!("pass '{name}': {e}")))?;
            validate_hooks(path, pass, "vertex", &injections.vertex, VERTEX_HOOKS)?;
            validate_hooks(path, pass, "fragment", &injections.fragment, FRAGMENT_HOOKS)?;
            doc.injections[pass.index()] = injections;
        }

        Ok(doc)
    }

    #[inline]
    #[must_use]
    pub fn injections(&self, pass: Pass) -> &PassInjections {
        &self.injections[pass.index()]
    }
}

fn validate_hooks(
    path: &str,
    pass: Pass,
    stage: &str,
    hooks: &BTreeMap<String, String>,
    known: &[&str],
) -> Result<()> {
    match hooks.keys().find(|hook| !known.contains(&hook.as_str())) {
        Some(hook) => Err(PipelineError::load(
            path,
            format!("unknown {stage} hook '{hook}' in pass '{pass}'"),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let doc = EffectDocument::parse(
            "test.json",
            r#"{
                "options": { "render_shadows": false },
                "gbuffer": { "fragment": { "material": "m.roughness = 0.5;" } }
            }"#,
        )
        .unwrap();

        assert_eq!(doc.declared.get(&EffectOption::RenderShadows), Some(&false));
        assert_eq!(
            doc.injections(Pass::GBuffer).fragment.get("material").map(String::as_str),
            Some("m.roughness = 0.5;")
        );
        assert!(doc.injections(Pass::Shadows).vertex.is_empty());
    }

    #[test]
    fn test_empty_document_is_valid() {
        let doc = EffectDocument::parse("empty.json", "{}").unwrap();
        assert!(doc.declared.is_empty());
    }

    #[test]
    fn test_rejects_unknown_pass_and_hook() {
        let err = EffectDocument::parse("a.json", r#"{ "forward": {} }"#).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));

        let err = EffectDocument::parse("b.json", r#"{ "gbuffer": { "vertex": { "nope": "" } } }"#)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
    }

    #[test]
    fn test_rejects_non_boolean_option() {
        let err = EffectDocument::parse("c.json", r#"{ "options": { "render_voxel": 1 } }"#)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
    }
}
