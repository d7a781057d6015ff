//! Scene graph: an arena-owned tree of typed nodes with cached world
//! transforms.
//!
//! Every node lives in the graph's arena and is addressed by [`NodeId`]. The
//! parent link is a plain handle, never an ownership edge, so detaching or
//! destroying a node cannot invalidate its former relatives. World transforms
//! always compose as `parent.world * local`, both when a subtree is attached
//! and when [`SceneGraph::update_world_transforms`] runs each frame.

mod arena;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod light;
pub mod node;

use std::fmt::Write as _;

use glam::Mat4;

use arena::NodeArena;
pub use arena::NodeId;
pub use camera::Camera;
pub use error::{SceneError, SceneResult};
pub use geometry::Geometry;
pub use light::PointLight;
pub use node::{Node, NodeKind};

pub const PATH_SEPARATOR: char = '/';

/// Depth `print_graph` stops at: root, children and grandchildren.
pub const DEFAULT_PRINT_DEPTH: u32 = 2;

#[derive(Debug, Default)]
pub struct SceneGraph {
    name: String,
    root: Option<NodeId>,
    nodes: NodeArena,
}

impl SceneGraph {
    /// An empty graph. [`root`](Self::root) is `None` until a root is set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
            nodes: NodeArena::default(),
        }
    }

    /// A graph whose root is a fresh generic node called `root_name`.
    pub fn with_root(name: impl Into<String>, root_name: impl Into<String>) -> Self {
        let mut graph = Self::new(name);
        let root = graph.create_node(Node::new(root_name));
        graph.root = Some(root);
        graph
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Install a detached node as the new root and hand the previous root back
    /// to the caller. The previous tree stays in the arena as a detached
    /// subtree; re-attach it or release it with [`destroy_subtree`](Self::destroy_subtree).
    #[must_use = "the previous root is still owned by the arena; destroy or re-attach it"]
    pub fn set_root(&mut self, id: NodeId) -> SceneResult<Option<NodeId>> {
        let node = self.get(id)?;
        if node.parent.is_some() {
            return Err(SceneError::InvalidReparent {
                node: node.name().to_string(),
                reason: "an attached node cannot become the root; detach it first",
            });
        }

        let previous = self.root.replace(id);
        if previous == Some(id) {
            return Ok(None);
        }
        self.refresh_subtree(id);
        tracing::debug!(scene = %self.name, root = %id, ?previous, "scene root replaced");
        Ok(previous)
    }

    /// Move `node` into the arena as a detached node and return its handle.
    pub fn create_node(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        node.depth = 0;
        node.path = node::root_path(node.name());
        node.world_transform = node.local_transform();
        tracing::trace!(name = %node.name(), kind = node.kind().label(), "creating scene node");
        self.nodes.insert(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    fn get(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes.get(id).ok_or(SceneError::StaleNode(id))
    }

    /// Append `child` to `parent`'s children and resolve depth, path and world
    /// transform for the whole attached subtree.
    ///
    /// A node attached elsewhere is rejected: callers must detach it first (or
    /// use [`reparent`](Self::reparent)). Adding a child to the parent it
    /// already has is a no-op.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;

        match child_node.parent {
            Some(current) if current == parent => return Ok(()),
            Some(_) => {
                return Err(SceneError::InvalidReparent {
                    node: child_node.name().to_string(),
                    reason: "node already has a parent; detach it first",
                });
            }
            None => {}
        }
        if self.root == Some(child) {
            return Err(SceneError::InvalidReparent {
                node: child_node.name().to_string(),
                reason: "the scene root cannot become a child",
            });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::InvalidReparent {
                node: child_node.name().to_string(),
                reason: "attaching would create a cycle",
            });
        }
        if self.get_child(parent, child_node.name()).is_some() {
            return Err(SceneError::DuplicateName {
                parent: parent_node.name().to_string(),
                name: child_node.name().to_string(),
            });
        }

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
        self.refresh_subtree(child);

        if let Some(node) = self.nodes.get(child) {
            tracing::debug!(name = %node.name(), path = %node.path(), depth = node.depth(), "attached scene node");
        }
        Ok(())
    }

    /// Detach the direct child called `name` and return its handle. The
    /// detached subtree keeps its own children and becomes root-relative.
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> SceneResult<NodeId> {
        self.get(parent)?;
        let child = self.get_child(parent, name).ok_or_else(|| SceneError::NotFound {
            name: name.to_string(),
        })?;

        self.unlink(child);
        tracing::debug!(%name, "detached scene node");
        Ok(child)
    }

    /// Detach `node` from its current parent (if any) and attach it to
    /// `new_parent`. On error the tree is left unchanged.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> SceneResult<()> {
        let moving = self.get(node)?;
        let target = self.get(new_parent)?;
        if moving.parent == Some(new_parent) {
            return Ok(());
        }
        if node == new_parent || self.is_ancestor(node, new_parent) {
            return Err(SceneError::InvalidReparent {
                node: moving.name().to_string(),
                reason: "attaching would create a cycle",
            });
        }
        if self.get_child(new_parent, moving.name()).is_some() {
            return Err(SceneError::DuplicateName {
                parent: target.name().to_string(),
                name: moving.name().to_string(),
            });
        }

        self.unlink(node);
        self.add_child(new_parent, node)
    }

    /// Direct child of `parent` named `name`. Grandchildren are not searched.
    pub fn get_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(parent)?.children.iter().copied().find(|&child| {
            self.nodes
                .get(child)
                .is_some_and(|node| node.name() == name)
        })
    }

    /// Borrowed view of `parent`'s children in insertion order.
    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        self.nodes.get(parent).map_or(&[], |node| node.children.as_slice())
    }

    /// Owned snapshot of `parent`'s children, safe to hold while mutating the
    /// graph.
    pub fn children_list(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).to_vec()
    }

    /// Remove a node from the arena. Its parent forgets it and its children are
    /// orphaned into detached, root-relative subtrees rather than destroyed.
    pub fn destroy_node(&mut self, id: NodeId) -> SceneResult<Node> {
        self.get(id)?;
        self.unlink(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut node = self.nodes.remove(id).ok_or(SceneError::StaleNode(id))?;
        for child in std::mem::take(&mut node.children) {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = None;
            }
            self.refresh_subtree(child);
        }
        tracing::debug!(name = %node.name(), "destroyed scene node");
        Ok(node)
    }

    /// Remove a node and all of its descendants. Returns how many nodes were
    /// freed.
    pub fn destroy_subtree(&mut self, id: NodeId) -> SceneResult<usize> {
        self.get(id)?;
        self.unlink(id);

        let doomed = self.descendants(id);
        if self.root.is_some_and(|root| doomed.contains(&root)) {
            self.root = None;
        }
        let freed = doomed
            .into_iter()
            .filter(|&node| self.nodes.remove(node).is_some())
            .count();
        tracing::debug!(root = %id, freed, "destroyed scene subtree");
        Ok(freed)
    }

    /// `id` followed by all of its descendants in depth-first pre-order
    /// (children in insertion order). Empty for a stale handle.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.nodes.contains(id) {
            return order;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        order
    }

    /// First node called `name` in depth-first pre-order from the root.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        let root = self.root?;
        self.descendants(root)
            .into_iter()
            .find(|&id| self.nodes.get(id).is_some_and(|node| node.name() == name))
    }

    /// Resolve an absolute path such as `/root/holder_earth/holder_moon`.
    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let root = self.root?;
        let mut segments = path.split(PATH_SEPARATOR).filter(|s| !s.is_empty());
        if segments.next()? != self.nodes.get(root)?.name() {
            return None;
        }
        segments.try_fold(root, |current, segment| self.get_child(current, segment))
    }

    /// Recompute world transforms for every node reachable from the root:
    /// the root's world is its local transform, every other node's world is
    /// `parent.world * local`.
    pub fn update_world_transforms(&mut self) {
        let Some(root) = self.root else {
            return;
        };

        let mut stack = vec![(root, Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let world = parent_world * node.local_transform();
            node.world_transform = world;
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
    }

    /// Textual listing of the tree down to [`DEFAULT_PRINT_DEPTH`], for
    /// diagnostics only.
    pub fn print_graph(&self) -> String {
        self.print_graph_to_depth(DEFAULT_PRINT_DEPTH)
    }

    /// One node name per line, indented with one tab per depth level, stopping
    /// below `max_depth`.
    pub fn print_graph_to_depth(&self, max_depth: u32) -> String {
        let mut out = String::new();
        let Some(root) = self.root else {
            let _ = writeln!(out, "{} (no root)", self.name);
            return out;
        };

        let _ = writeln!(out, "{}", self.name);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let _ = writeln!(out, "{}{}", "\t".repeat(node.depth() as usize + 1), node.name());
            if node.depth() < max_depth {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut current = self.nodes.get(of).and_then(Node::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(Node::parent);
        }
        false
    }

    /// Sever both directions of `id`'s parent link, if it has one.
    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id).and_then(Node::parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        self.refresh_subtree(id);
    }

    /// Re-derive path, depth and world transform for `top` and everything
    /// below it from `top`'s current parent.
    fn refresh_subtree(&mut self, top: NodeId) {
        let mut stack = vec![top];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let (path, depth, world) = match node.parent.and_then(|p| self.nodes.get(p)) {
                Some(parent) => (
                    format!("{}{}{}", parent.path(), PATH_SEPARATOR, node.name()),
                    parent.depth() + 1,
                    parent.world_transform() * node.local_transform(),
                ),
                None => (
                    node::root_path(node.name()),
                    0,
                    node.local_transform(),
                ),
            };
            let children = node.children.clone();

            if let Some(node) = self.nodes.get_mut(id) {
                node.path = path;
                node.depth = depth;
                node.world_transform = world;
            }
            stack.extend(children.into_iter().rev());
        }
    }
}
