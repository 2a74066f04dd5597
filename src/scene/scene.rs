use glam::{Affine3A, Vec3};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::renderer::pass::{Pass, PassMask};
use crate::scene::NodeHandle;
use crate::scene::node::{Node, NodeKind, PassBinding};

/// Scene graph with a single global root.
///
/// Every node except the root has a parent. Per-pass bindings live on the
/// nodes themselves and are resolved against the ancestor chain by
/// [`Scene::effective_binding`].
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("render"));
        Self { nodes, root }
    }

    /// The global scene root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Starts building a node. It is parented to the root unless
    /// [`NodeBuilder::with_parent`] is called.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// Adds a node under the root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let root = self.root;
        self.add_to_parent(node, root)
    }

    /// Adds a node under `parent`, falling back to the root for stale parents.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            log::warn!("Parent node not found, attaching '{}' to the scene root", child.name);
            self.root
        };

        child.parent = Some(parent);
        child.children.clear();
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || child == self.root {
            log::warn!("Cannot attach the scene root or a node to itself");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("Attach called with a stale node handle");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach a node below its own descendant");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent
            && let Some(n) = self.nodes.get_mut(p)
            && let Some(i) = n.children.iter().position(|&x| x == child)
        {
            n.children.remove(i);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Removes a node and its whole subtree. The root cannot be removed.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if handle == self.root {
            log::warn!("The scene root cannot be removed");
            return;
        }
        let Some(node) = self.nodes.get(handle) else {
            return;
        };

        if let Some(parent) = node.parent
            && let Some(p) = self.nodes.get_mut(parent)
            && let Some(pos) = p.children.iter().position(|&x| x == handle)
        {
            p.children.remove(pos);
        }

        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            if let Some(removed) = self.nodes.remove(h) {
                stack.extend(removed.children);
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Number of live nodes, root included.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when `ancestor` lies on the parent chain of `node`
    /// (or is `node` itself).
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        false
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// World matrix of a node, composed from the root down.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Affine3A {
        let mut world = Affine3A::IDENTITY;
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            world = node.transform.local_matrix() * world;
            current = node.parent;
        }
        world
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Vec3 {
        self.world_matrix(handle).translation.into()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Depth-first, pre-order list of the nodes strictly below `root` that
    /// match `predicate`.
    pub fn find_descendants<F>(&self, root: NodeHandle, mut predicate: F) -> Vec<NodeHandle>
    where
        F: FnMut(&Node) -> bool,
    {
        let mut found = Vec::new();
        let Some(start) = self.nodes.get(root) else {
            return found;
        };

        let mut stack: Vec<NodeHandle> = start.children.iter().rev().copied().collect();
        while let Some(h) = stack.pop() {
            if let Some(node) = self.nodes.get(h) {
                if predicate(node) {
                    found.push(h);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    /// Nodes strictly below `root` whose name matches a `*` wildcard pattern.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, pattern: &str) -> Vec<NodeHandle> {
        self.find_descendants(root, |node| wildcard_match(pattern, &node.name))
    }

    /// Nodes strictly below `root` that are point light placeholders.
    #[must_use]
    pub fn find_point_lights(&self, root: NodeHandle) -> Vec<NodeHandle> {
        self.find_descendants(root, |node| matches!(node.kind, NodeKind::PointLight(_)))
    }

    /// Nodes strictly below `root` that are spotlight placeholders.
    #[must_use]
    pub fn find_spotlights(&self, root: NodeHandle) -> Vec<NodeHandle> {
        self.find_descendants(root, |node| matches!(node.kind, NodeKind::Spotlight { .. }))
    }

    // ========================================================================
    // Pass bindings
    // ========================================================================

    /// Writes a binding on `handle` for `pass`.
    ///
    /// An existing binding with a higher sort on the same node is kept.
    /// Returns whether the write took effect.
    pub fn set_pass_binding(&mut self, handle: NodeHandle, pass: Pass, binding: PassBinding) -> bool {
        match self.nodes.get_mut(handle) {
            Some(node) => node.set_binding(pass, binding),
            None => false,
        }
    }

    /// The binding that governs `handle` for `pass`.
    ///
    /// Walks the ancestor chain and returns the binding with the highest
    /// sort. On equal sorts the deeper node wins, so a descendant only
    /// overrides an ancestor when its sort is at least as high.
    #[must_use]
    pub fn effective_binding(&self, handle: NodeHandle, pass: Pass) -> Option<&PassBinding> {
        let mut chain: SmallVec<[&Node; 16]> = SmallVec::new();
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            chain.push(node);
            current = node.parent;
        }

        let mut best: Option<&PassBinding> = None;
        // Root first, so `>=` lets deeper nodes take over on ties.
        for node in chain.iter().rev() {
            if let Some(binding) = node.binding(pass)
                && best.is_none_or(|b| binding.sort() >= b.sort())
            {
                best = Some(binding);
            }
        }
        best
    }

    /// A node is visible in a pass unless its effective binding hides it.
    #[must_use]
    pub fn is_visible_in(&self, handle: NodeHandle, pass: Pass) -> bool {
        self.contains(handle)
            && !self
                .effective_binding(handle, pass)
                .is_some_and(PassBinding::is_hidden)
    }

    /// Passes in which `handle` is currently drawn.
    #[must_use]
    pub fn draw_mask(&self, handle: NodeHandle) -> PassMask {
        Pass::ALL
            .into_iter()
            .filter(|&pass| self.is_visible_in(handle, pass))
            .fold(PassMask::empty(), |mask, pass| mask | pass.mask())
    }
}

/// Matches `name` against a pattern where `*` stands for any run of characters.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return name.is_empty();
    };
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all: exact match.
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

/// Chainable node construction.
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            node: Node::new(name),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.node.kind = kind;
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.node.transform.position = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.node.transform.scale = Vec3::splat(s);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: glam::Quat) -> Self {
        self.node.transform.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn build(self) -> NodeHandle {
        match self.parent {
            Some(parent) => self.scene.add_to_parent(self.node, parent),
            None => self.scene.add_node(self.node),
        }
    }
}
