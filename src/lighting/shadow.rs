//! Shadow Sources
//!
//! Every shadow-casting light owns one or more shadow sources: a view and
//! projection rendered into a shadow map of the light's resolution.
//!
//! | Light | Sources | Projection |
//! |-------|---------|------------|
//! | Spot  | 1 | perspective, cone fov |
//! | Point | 6 | perspective, 90° cube faces |

use glam::{Mat4, Vec3};

use crate::lighting::light::{Light, LightKind, SpotLight};

/// Near plane of every shadow projection.
pub const SHADOW_NEAR: f32 = 0.1;

/// Look direction and up vector of each cube face (+X, -X, +Y, -Y, +Z, -Z).
const CUBE_FACES: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Y),
    (Vec3::NEG_X, Vec3::NEG_Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::NEG_Z),
    (Vec3::Z, Vec3::NEG_Y),
    (Vec3::NEG_Z, Vec3::NEG_Y),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSource {
    pub resolution: u32,
    pub view: Mat4,
    pub projection: Mat4,
    pub near: f32,
    pub far: f32,
}

impl ShadowSource {
    #[inline]
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Number of shadow sources a light needs.
#[must_use]
pub fn shadow_source_count(light: &Light) -> usize {
    if !light.casts_shadows {
        return 0;
    }
    match light.kind {
        LightKind::Point(_) => CUBE_FACES.len(),
        LightKind::Spot(_) => 1,
    }
}

/// Builds the shadow sources of a light. Empty if it does not cast shadows.
#[must_use]
pub fn build_shadow_sources(light: &Light) -> Vec<ShadowSource> {
    if !light.casts_shadows {
        return Vec::new();
    }
    let far = light.radius.max(SHADOW_NEAR * 2.0);
    match &light.kind {
        LightKind::Spot(spot) => vec![build_spot_source(light, spot, far)],
        LightKind::Point(_) => {
            let projection =
                Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, SHADOW_NEAR, far);
            CUBE_FACES
                .iter()
                .map(|&(forward, up)| ShadowSource {
                    resolution: light.shadow_map_resolution,
                    view: Mat4::look_at_rh(light.position, light.position + forward, up),
                    projection,
                    near: SHADOW_NEAR,
                    far,
                })
                .collect()
        }
    }
}

fn build_spot_source(light: &Light, spot: &SpotLight, far: f32) -> ShadowSource {
    let dir = if spot.direction.length_squared() > 1e-6 {
        spot.direction.normalize()
    } else {
        -Vec3::Z
    };
    let up = if dir.y.abs() > 0.99 { Vec3::X } else { Vec3::Y };
    let fov = spot
        .fov
        .to_radians()
        .clamp(0.1, std::f32::consts::PI - 0.01);

    ShadowSource {
        resolution: light.shadow_map_resolution,
        view: Mat4::look_at_rh(light.position, light.position + dir, up),
        projection: Mat4::perspective_rh(fov, 1.0, SHADOW_NEAR, far),
        near: SHADOW_NEAR,
        far,
    }
}
