//! Effect option set.
//!
//! The option set is closed: effect documents and caller overrides may only
//! name the options listed in [`EffectOption::ALL`].

use std::collections::BTreeMap;

use serde::Serialize;

/// A recognized effect option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectOption {
    RenderGBuffer,
    RenderShadows,
    RenderEnvmap,
    RenderVoxel,
    AlphaTesting,
    NormalMapping,
    ParallaxMapping,
}

impl EffectOption {
    pub const ALL: [EffectOption; 7] = [
        EffectOption::RenderGBuffer,
        EffectOption::RenderShadows,
        EffectOption::RenderEnvmap,
        EffectOption::RenderVoxel,
        EffectOption::AlphaTesting,
        EffectOption::NormalMapping,
        EffectOption::ParallaxMapping,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RenderGBuffer => "render_gbuffer",
            Self::RenderShadows => "render_shadows",
            Self::RenderEnvmap => "render_envmap",
            Self::RenderVoxel => "render_voxel",
            Self::AlphaTesting => "alpha_testing",
            Self::NormalMapping => "normal_mapping",
            Self::ParallaxMapping => "parallax_mapping",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }

    /// Value used when neither the document nor the caller sets the option.
    #[must_use]
    pub const fn builtin_default(self) -> bool {
        !matches!(self, Self::ParallaxMapping)
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Fully resolved option values, one per [`EffectOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedOptions {
    values: [bool; EffectOption::ALL.len()],
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        let mut values = [false; EffectOption::ALL.len()];
        for option in EffectOption::ALL {
            values[option.index()] = option.builtin_default();
        }
        Self { values }
    }
}

impl ResolvedOptions {
    #[inline]
    #[must_use]
    pub fn get(&self, option: EffectOption) -> bool {
        self.values[option.index()]
    }

    #[inline]
    pub fn set(&mut self, option: EffectOption, value: bool) {
        self.values[option.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectOption, bool)> + '_ {
        EffectOption::ALL.into_iter().map(|o| (o, self.get(o)))
    }

    /// Name → value view used as shader template context.
    #[must_use]
    pub fn to_template_map(&self) -> BTreeMap<&'static str, bool> {
        self.iter().map(|(o, v)| (o.name(), v)).collect()
    }
}

impl Serialize for ResolvedOptions {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_template_map().serialize(serializer)
    }
}

/// Caller-supplied option overrides, keyed by option name.
///
/// Names are validated at resolution time, not on insertion, so that an
/// unknown name surfaces as a configuration error of the resolving call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EffectOverrides {
    values: BTreeMap<String, bool>,
}

impl EffectOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: &str, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Overrides that switch off every optional pass and material feature,
    /// leaving only the gbuffer pass.
    #[must_use]
    pub fn gbuffer_only() -> Self {
        Self::new()
            .with("render_shadows", false)
            .with("render_envmap", false)
            .with("render_voxel", false)
            .with("alpha_testing", false)
            .with("normal_mapping", false)
            .with("parallax_mapping", false)
    }
}

impl<'a> FromIterator<(&'a str, bool)> for EffectOverrides {
    fn from_iter<T: IntoIterator<Item = (&'a str, bool)>>(iter: T) -> Self {
        let mut overrides = Self::new();
        for (name, value) in iter {
            overrides.set(name, value);
        }
        overrides
    }
}
