//! Light Data
//!
//! Pipeline-side lights. Both variants share position, radius, lumens,
//! color and shadow settings; spot lights add a cone.

use glam::Vec3;
use uuid::Uuid;
use xxhash_rust::xxh3::xxh3_64;

use crate::lighting::ies::IesProfileHandle;

/// Radius used when a light arrives with a non-positive or NaN radius.
pub const MIN_LIGHT_RADIUS: f32 = 0.01;
/// Radius given to lights with an unbounded (infinite) radius.
pub const MAX_LIGHT_RADIUS: f32 = 10_000.0;
/// Shadow map resolution used when a light reports zero.
pub const DEFAULT_SHADOW_MAP_RESOLUTION: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointLight;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// Full cone angle in degrees.
    pub fov: f32,
    /// World-space direction the cone points at (unit length).
    pub direction: Vec3,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            fov: 30.0,
            direction: -Vec3::Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Point(PointLight),
    Spot(SpotLight),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub uuid: Uuid,
    pub id: u64,
    pub position: Vec3,
    pub radius: f32,
    pub lumens: f32,
    pub color: Vec3,
    pub casts_shadows: bool,
    pub shadow_map_resolution: u32,
    pub ies_profile: Option<IesProfileHandle>,
    pub kind: LightKind,
}

impl Light {
    fn with_kind(position: Vec3, radius: f32, kind: LightKind) -> Self {
        let uuid = Uuid::new_v4();
        Self {
            uuid,
            id: xxh3_64(uuid.as_bytes()),
            position,
            radius,
            lumens: 20.0,
            color: Vec3::ONE,
            casts_shadows: false,
            shadow_map_resolution: DEFAULT_SHADOW_MAP_RESOLUTION,
            ies_profile: None,
            kind,
        }
    }

    #[must_use]
    pub fn new_point(position: Vec3, radius: f32) -> Self {
        Self::with_kind(position, radius, LightKind::Point(PointLight))
    }

    /// A spot light with a cone of `fov` degrees pointing along `direction`.
    #[must_use]
    pub fn new_spot(position: Vec3, radius: f32, fov: f32, direction: Vec3) -> Self {
        Self::with_kind(
            position,
            radius,
            LightKind::Spot(SpotLight {
                fov,
                direction: direction.normalize_or(-Vec3::Z),
            }),
        )
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_lumens(mut self, lumens: f32) -> Self {
        self.lumens = lumens;
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, resolution: u32) -> Self {
        self.casts_shadows = true;
        self.shadow_map_resolution = resolution;
        self
    }

    #[must_use]
    pub fn with_ies_profile(mut self, profile: IesProfileHandle) -> Self {
        self.ies_profile = Some(profile);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_spot(&self) -> bool {
        matches!(self.kind, LightKind::Spot(_))
    }

    #[must_use]
    pub fn as_spot(&self) -> Option<&SpotLight> {
        match &self.kind {
            LightKind::Spot(spot) => Some(spot),
            LightKind::Point(_) => None,
        }
    }

    /// Clamps fields into their valid ranges. Returns `true` if anything
    /// changed.
    ///
    /// Finite positive radii are kept as they are, however large.
    pub fn sanitize(&mut self) -> bool {
        let before = (self.radius, self.lumens, self.shadow_map_resolution);
        let before_kind = self.kind;

        if self.radius.is_nan() || self.radius <= 0.0 {
            self.radius = MIN_LIGHT_RADIUS;
        } else if self.radius.is_infinite() {
            self.radius = MAX_LIGHT_RADIUS;
        }
        if self.lumens.is_nan() || self.lumens < 0.0 {
            self.lumens = 0.0;
        }
        if self.shadow_map_resolution == 0 {
            self.shadow_map_resolution = DEFAULT_SHADOW_MAP_RESOLUTION;
        }
        if let LightKind::Spot(spot) = &mut self.kind {
            if !spot.direction.is_normalized() {
                spot.direction = spot.direction.normalize_or(-Vec3::Z);
            }
            spot.fov = if spot.fov.is_nan() {
                SpotLight::default().fov
            } else {
                spot.fov.clamp(0.1, 179.9)
            };
        }

        let after = (self.radius, self.lumens, self.shadow_map_resolution);
        before.0.to_bits() != after.0.to_bits()
            || before.1.to_bits() != after.1.to_bits()
            || before.2 != after.2
            || before_kind != self.kind
    }
}
