use std::fmt;

use super::node::Node;

/// Stable handle to a node owned by a [`NodeArena`].
///
/// The generation is bumped every time a slot is freed, so a handle that
/// outlives its node resolves to `None` instead of aliasing whatever node
/// reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Slot storage for scene nodes with O(1) reuse of freed slots.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_indices: Vec<usize>,
}

impl NodeArena {
    pub fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free_indices.pop() {
            self.nodes[index] = Some(node);
            return NodeId::from_parts(index as u32, self.generations[index]);
        }

        let index = self.nodes.len();
        self.nodes.push(Some(node));
        self.generations.push(0);
        NodeId::from_parts(index as u32, 0)
    }

    fn slot(&self, id: NodeId) -> Option<usize> {
        let index = id.index as usize;
        (index < self.nodes.len() && self.generations[index] == id.generation).then_some(index)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).and_then(|index| self.nodes[index].as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot(id).and_then(|index| self.nodes[index].as_mut())
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let index = self.slot(id)?;
        let removed = self.nodes[index].take()?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_indices.push(index);
        Some(removed)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().filter_map(|(index, node)| {
            node.as_ref()
                .map(|n| (NodeId::from_parts(index as u32, self.generations[index]), n))
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_indices.len()
    }
}
