//! Light & Probe Ingestion
//!
//! Converts host placeholder nodes into pipeline-owned objects:
//!
//! | Placeholder | Becomes |
//! |-------------|---------|
//! | `NodeKind::PointLight` | point [`Light`] |
//! | `NodeKind::Spotlight` | spot [`Light`] |
//! | node named `ENVPROBE*` | [`EnvironmentProbe`] (or an inert placeholder) |
//!
//! Placeholders are removed from the scene once every match has been
//! converted, so ingestion is one-shot. Removing a placeholder removes its
//! subtree; nested placeholders have already been converted by then.

use glam::Vec3;

use crate::errors::PipelineError;
use crate::lighting::probe::DEFAULT_BORDER_SMOOTHNESS;
use crate::lighting::{EnvironmentProbe, IesProfileHandle, Light, LightKey, Probe, ProbeHandle};
use crate::pipeline::PipelineContext;
use crate::renderer::settings::ENV_PROBES_PLUGIN;
use crate::scene::{LightNodeAttributes, NodeHandle, NodeKind, Scene};

/// IES profile loaded during ingestion.
pub const DEFAULT_IES_PROFILE: &str = "x_arrow_diffuse.ies";

/// Name pattern of environment probe markers.
pub const PROBE_MARKER_PATTERN: &str = "ENVPROBE*";

/// Scale from the host's brightness channel to lumens.
const LUMENS_PER_INTENSITY: f32 = 100.0;

/// Objects created by [`PipelineContext::prepare_scene`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedScene {
    pub lights: Vec<LightKey>,
    pub probes: Vec<ProbeHandle>,
}

impl PipelineContext {
    /// Converts every light and probe placeholder strictly below `root`.
    ///
    /// Never fails: unrecognized nodes are left alone, and probe markers
    /// become inert placeholders when probes are unavailable.
    pub fn prepare_scene(&mut self, scene: &mut Scene, root: NodeHandle) -> PreparedScene {
        // Loaded so the profile slot exists; not attached to ingested lights.
        let _ies_profile = self.load_ies_profile(DEFAULT_IES_PROFILE);

        let point_lights = scene.find_point_lights(root);
        let spotlights = scene.find_spotlights(root);
        let markers = scene.find_by_name(root, PROBE_MARKER_PATTERN);

        // Nothing is removed until every match has been converted.
        let mut prepared = PreparedScene::default();

        for &handle in &point_lights {
            let Some(NodeKind::PointLight(attrs)) = scene.get_node(handle).map(|n| n.kind.clone())
            else {
                continue;
            };
            let light = light_from_attributes(
                Light::new_point(scene.world_position(handle), attrs.max_distance),
                &attrs,
            );
            prepared.lights.push(self.add_light(light));
        }

        for &handle in &spotlights {
            let Some(NodeKind::Spotlight { light: attrs, exponent }) =
                scene.get_node(handle).map(|n| n.kind.clone())
            else {
                continue;
            };
            let world = scene.world_matrix(handle);
            let direction = world.transform_vector3(Vec3::NEG_Z);
            let fov = exponent / std::f32::consts::PI * 180.0;
            let light = light_from_attributes(
                Light::new_spot(world.translation.into(), attrs.max_distance, fov, direction),
                &attrs,
            );
            prepared.lights.push(self.add_light(light));
        }

        for &handle in &markers {
            let matrix = scene.world_matrix(handle);
            let probe = self.add_environment_probe();
            let target = self.probe_mut(probe);
            target.set_matrix(matrix);
            target.set_border_smoothness(DEFAULT_BORDER_SMOOTHNESS);
            prepared.probes.push(probe);
        }

        for handle in point_lights.into_iter().chain(spotlights).chain(markers) {
            scene.remove_node(handle);
        }

        log::info!(
            "Prepared scene: {} lights, {} probes",
            prepared.lights.len(),
            prepared.probes.len()
        );
        prepared
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.light_mgr.add_light(light)
    }

    pub fn remove_light(&mut self, key: LightKey) -> Option<Light> {
        self.light_mgr.remove_light(key)
    }

    pub fn load_ies_profile(&mut self, filename: &str) -> IesProfileHandle {
        self.ies_profiles.load(filename)
    }

    /// Creates an environment probe.
    ///
    /// Returns [`ProbeHandle::Inert`] with a warning when the probe plugin is
    /// not enabled.
    pub fn add_environment_probe(&mut self) -> ProbeHandle {
        if !self.settings.is_plugin_enabled(ENV_PROBES_PLUGIN) {
            let err = PipelineError::CapabilityUnavailable(format!(
                "plugin '{ENV_PROBES_PLUGIN}' is not enabled, can not add environment probe"
            ));
            log::warn!("{err}");
            return ProbeHandle::Inert;
        }
        ProbeHandle::Active(self.probe_mgr.add_probe(EnvironmentProbe::new()))
    }

    /// The probe behind a handle. Stale and inert handles resolve to the
    /// shared null probe.
    pub fn probe_mut(&mut self, handle: ProbeHandle) -> &mut dyn Probe {
        if let ProbeHandle::Active(key) = handle
            && let Some(probe) = self.probe_mgr.get_mut(key)
        {
            return probe;
        }
        &mut self.null_probe
    }

    #[must_use]
    pub fn probe(&self, handle: ProbeHandle) -> &dyn Probe {
        if let ProbeHandle::Active(key) = handle
            && let Some(probe) = self.probe_mgr.get(key)
        {
            return probe;
        }
        &self.null_probe
    }
}

fn light_from_attributes(light: Light, attrs: &LightNodeAttributes) -> Light {
    let mut light = light
        .with_color(attrs.color.truncate())
        .with_lumens(LUMENS_PER_INTENSITY * attrs.color.w);
    light.casts_shadows = attrs.shadow_caster;
    light.shadow_map_resolution = attrs.shadow_buffer_size.x;
    light
}
