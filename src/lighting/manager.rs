//! Light Manager
//!
//! Owns every registered [`Light`]. Lights are sanitized on registration and
//! stay until removed explicitly. Registering two lights with identical
//! fields yields two distinct entries.

use slotmap::{SlotMap, new_key_type};

use crate::lighting::light::Light;
use crate::lighting::shadow::{ShadowSource, build_shadow_sources, shadow_source_count};

new_key_type! {
    pub struct LightKey;
}

#[derive(Debug, Default)]
pub struct LightManager {
    lights: SlotMap<LightKey, Light>,
}

impl LightManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, mut light: Light) -> LightKey {
        if light.sanitize() {
            log::warn!(
                "Light {} had out-of-range values and was clamped (radius {}, lumens {})",
                light.uuid,
                light.radius,
                light.lumens
            );
        }
        let key = self.lights.insert(light);
        log::debug!("Added light {key:?} ({} total)", self.lights.len());
        key
    }

    /// Removes a light, returning it. Unknown keys are ignored.
    pub fn remove_light(&mut self, key: LightKey) -> Option<Light> {
        let removed = self.lights.remove(key);
        if removed.is_none() {
            log::warn!("remove_light: light {key:?} is not registered");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    /// Mutable access. Edits made here are not re-sanitized.
    #[must_use]
    pub fn get_mut(&mut self, key: LightKey) -> Option<&mut Light> {
        self.lights.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: LightKey) -> bool {
        self.lights.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LightKey, &Light)> {
        self.lights.iter()
    }

    /// Total shadow sources required by all registered lights.
    #[must_use]
    pub fn shadow_source_count(&self) -> usize {
        self.lights.values().map(shadow_source_count).sum()
    }

    /// Shadow sources of every shadow-casting light, grouped by light.
    #[must_use]
    pub fn shadow_sources(&self) -> Vec<(LightKey, Vec<ShadowSource>)> {
        self.lights
            .iter()
            .filter(|(_, light)| light.casts_shadows)
            .map(|(key, light)| (key, build_shadow_sources(light)))
            .collect()
    }
}
