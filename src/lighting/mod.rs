//! Lighting
//!
//! Pipeline-owned lights, their shadow sources, IES profiles and
//! environment probes.

pub mod ies;
pub mod light;
pub mod manager;
pub mod probe;
pub mod shadow;

pub use ies::{IesProfileHandle, IesProfileManager};
pub use light::{Light, LightKind, PointLight, SpotLight};
pub use manager::{LightKey, LightManager};
pub use probe::{EnvironmentProbe, NullProbe, Probe, ProbeHandle, ProbeKey, ProbeManager};
pub use shadow::ShadowSource;
