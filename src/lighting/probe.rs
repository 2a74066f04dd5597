//! Environment Probes
//!
//! Probes capture the surrounding scene into a cubemap used for local
//! reflections. They are provided by the `env_probes` plugin; when it is not
//! enabled callers receive [`ProbeHandle::Inert`], backed by a [`NullProbe`]
//! that absorbs every assignment.

use glam::{Affine3A, Vec3};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct ProbeKey;
}

/// Border smoothness applied to probes created from scene markers.
pub const DEFAULT_BORDER_SMOOTHNESS: f32 = 0.05;

/// Common interface of active and placeholder probes.
pub trait Probe {
    fn set_matrix(&mut self, matrix: Affine3A);

    fn matrix(&self) -> Affine3A;

    fn set_border_smoothness(&mut self, smoothness: f32);

    fn border_smoothness(&self) -> f32;

    fn set_parallax_correction(&mut self, enabled: bool);

    fn parallax_correction(&self) -> bool;

    /// `false` for placeholders.
    fn is_active(&self) -> bool {
        true
    }

    fn position(&self) -> Vec3 {
        self.matrix().translation.into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentProbe {
    matrix: Affine3A,
    border_smoothness: f32,
    parallax_correction: bool,
}

impl Default for EnvironmentProbe {
    fn default() -> Self {
        Self {
            matrix: Affine3A::IDENTITY,
            border_smoothness: 0.1,
            parallax_correction: true,
        }
    }
}

impl EnvironmentProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// World-space bounds of the probe's unit box.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            let p = self.matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }
}

impl Probe for EnvironmentProbe {
    fn set_matrix(&mut self, matrix: Affine3A) {
        self.matrix = matrix;
    }

    fn matrix(&self) -> Affine3A {
        self.matrix
    }

    fn set_border_smoothness(&mut self, smoothness: f32) {
        self.border_smoothness = smoothness.clamp(0.0, 1.0);
    }

    fn border_smoothness(&self) -> f32 {
        self.border_smoothness
    }

    fn set_parallax_correction(&mut self, enabled: bool) {
        self.parallax_correction = enabled;
    }

    fn parallax_correction(&self) -> bool {
        self.parallax_correction
    }
}

/// Placeholder returned when probes are unavailable. Setters are no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullProbe;

impl Probe for NullProbe {
    fn set_matrix(&mut self, _matrix: Affine3A) {}

    fn matrix(&self) -> Affine3A {
        Affine3A::IDENTITY
    }

    fn set_border_smoothness(&mut self, _smoothness: f32) {}

    fn border_smoothness(&self) -> f32 {
        0.0
    }

    fn set_parallax_correction(&mut self, _enabled: bool) {}

    fn parallax_correction(&self) -> bool {
        false
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// Result of requesting a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeHandle {
    /// Registered with the [`ProbeManager`].
    Active(ProbeKey),
    /// Capability unavailable; resolves to a [`NullProbe`].
    Inert,
}

impl ProbeHandle {
    #[inline]
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }

    #[inline]
    #[must_use]
    pub fn key(self) -> Option<ProbeKey> {
        match self {
            Self::Active(key) => Some(key),
            Self::Inert => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ProbeManager {
    probes: SlotMap<ProbeKey, EnvironmentProbe>,
}

impl ProbeManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_probe(&mut self, probe: EnvironmentProbe) -> ProbeKey {
        let key = self.probes.insert(probe);
        log::debug!("Added environment probe {key:?}");
        key
    }

    pub fn remove_probe(&mut self, key: ProbeKey) -> Option<EnvironmentProbe> {
        self.probes.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: ProbeKey) -> Option<&EnvironmentProbe> {
        self.probes.get(key)
    }

    #[must_use]
    pub fn get_mut(&mut self, key: ProbeKey) -> Option<&mut EnvironmentProbe> {
        self.probes.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProbeKey, &EnvironmentProbe)> {
        self.probes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_probe_absorbs_assignments() {
        let mut probe = NullProbe;
        probe.set_matrix(Affine3A::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        probe.set_border_smoothness(0.5);
        assert_eq!(probe.matrix(), Affine3A::IDENTITY);
        assert!(probe.border_smoothness().abs() < f32::EPSILON);
        assert!(!probe.is_active());
    }

    #[test]
    fn test_probe_bounds_follow_matrix() {
        let mut probe = EnvironmentProbe::new();
        probe.set_matrix(Affine3A::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(10.0, 0.0, 0.0),
        ));
        let (min, max) = probe.bounds();
        assert!((min - Vec3::new(8.0, -2.0, -2.0)).length() < 1e-5);
        assert!((max - Vec3::new(12.0, 2.0, 2.0)).length() < 1e-5);
        assert!((probe.position() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
    }
}
