use glam::{UVec2, Vec4};

use crate::effect::EffectId;
use crate::renderer::pass::Pass;
use crate::renderer::pipeline::ShaderHandle;
use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// Light attributes as exported by the host scene format.
///
/// The alpha channel of `color` encodes brightness; ingestion converts it to
/// lumens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightNodeAttributes {
    pub color: Vec4,
    pub max_distance: f32,
    pub shadow_caster: bool,
    pub shadow_buffer_size: UVec2,
}

impl Default for LightNodeAttributes {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            max_distance: f32::INFINITY,
            shadow_caster: false,
            shadow_buffer_size: UVec2::splat(512),
        }
    }
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeKind {
    /// Grouping node with no payload.
    #[default]
    Empty,
    /// Geometry drawn by the render passes.
    Renderable,
    /// Engine-native point light placeholder.
    PointLight(LightNodeAttributes),
    /// Engine-native spotlight placeholder. `exponent` is the cone angle in radians.
    Spotlight {
        light: LightNodeAttributes,
        exponent: f32,
    },
}

/// Shader bound to a node for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderState {
    pub shader: ShaderHandle,
    pub effect_id: EffectId,
    pub sort: i32,
}

/// Per-pass state of a node. Hidden and bound are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassBinding {
    Hidden { sort: i32 },
    Bound(ShaderState),
}

impl PassBinding {
    #[inline]
    #[must_use]
    pub fn sort(&self) -> i32 {
        match self {
            Self::Hidden { sort } => *sort,
            Self::Bound(state) => state.sort,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden { .. })
    }

    #[inline]
    #[must_use]
    pub fn shader_state(&self) -> Option<&ShaderState> {
        match self {
            Self::Bound(state) => Some(state),
            Self::Hidden { .. } => None,
        }
    }
}

/// A scene graph node.
///
/// # Hierarchy
///
/// - `parent`: handle to the parent node (`None` only for the scene root)
/// - `children`: child handles in insertion order
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub(crate) bindings: [Option<PassBinding>; Pass::COUNT],
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_kind(name, NodeKind::Empty)
    }

    #[must_use]
    pub fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            transform: Transform::new(),
            parent: None,
            children: Vec::new(),
            bindings: [None; Pass::COUNT],
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// The binding applied directly on this node, ignoring ancestors.
    #[inline]
    #[must_use]
    pub fn binding(&self, pass: Pass) -> Option<&PassBinding> {
        self.bindings[pass.index()].as_ref()
    }

    /// Writes `binding` unless an existing binding has a higher sort.
    ///
    /// Returns whether the write took effect.
    pub(crate) fn set_binding(&mut self, pass: Pass, binding: PassBinding) -> bool {
        let slot = &mut self.bindings[pass.index()];
        match slot {
            Some(existing) if existing.sort() > binding.sort() => false,
            _ => {
                *slot = Some(binding);
                true
            }
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
