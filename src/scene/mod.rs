//! Scene Graph
//!
//! A minimal hierarchical scene used as the host-facing scene format:
//! - [`Node`]: named node with a kind, a local transform and per-pass bindings
//! - [`Transform`]: local position/rotation/scale
//! - [`Scene`]: slot-map backed node storage with a single global root

pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use node::{LightNodeAttributes, Node, NodeKind, PassBinding, ShaderState};
pub use scene::{NodeBuilder, Scene};
pub use transform::Transform;

pub use crate::renderer::pass::{Pass, PassMask};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
