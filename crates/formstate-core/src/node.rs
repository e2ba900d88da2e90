//! State tree nodes and the arena that owns them

use crate::path::{FieldPath, Segment};
use crate::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Derived activity and requiredness of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// Node and every ancestor are active
    pub active: bool,
    /// Node or some ancestor is required
    pub required: bool,
}

impl Default for Flags {
    /// Active and not required; the identity for inheritance
    fn default() -> Self {
        Self {
            active: true,
            required: false,
        }
    }
}

/// What a node stands for in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// Leaf holding a primitive or a list of primitives
    Question,
    /// Named fields; also every recurring group element
    Group,
    /// Ordered list of same-shaped groups
    Recurring,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Question,
    Group(IndexMap<String, NodeId>),
    Recurring(Vec<NodeId>),
}

/// One position in the state tree
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub parent: Option<NodeId>,
    /// Field key under the parent group; `None` for the root and for elements
    pub key: Option<String>,
    pub shape: String,
    pub kind: NodeKind,
    pub flags: Flags,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Question => NodeType::Question,
            NodeKind::Group(_) => NodeType::Group,
            NodeKind::Recurring(_) => NodeType::Recurring,
        }
    }

    /// Recurring containers have no rule of their own
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Recurring(_))
    }

    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Question => Vec::new(),
            NodeKind::Group(fields) => fields.values().copied().collect(),
            NodeKind::Recurring(elements) => elements.clone(),
        }
    }
}

/// Arena of all live nodes of one state tree
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeStore {
    nodes: IndexMap<NodeId, Node>,
    next_id: u64,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node; the caller attaches it to its parent
    pub fn create(
        &mut self,
        parent: Option<NodeId>,
        key: Option<String>,
        shape: impl Into<String>,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                parent,
                key,
                shape: shape.into(),
                kind,
                flags: Flags::default(),
            },
        );
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn attach_field(&mut self, parent: NodeId, key: &str, child: NodeId) {
        if let Some(Node {
            kind: NodeKind::Group(fields),
            ..
        }) = self.nodes.get_mut(&parent)
        {
            fields.insert(key.to_string(), child);
        }
    }

    pub fn attach_element(&mut self, container: NodeId, position: usize, child: NodeId) {
        if let Some(Node {
            kind: NodeKind::Recurring(elements),
            ..
        }) = self.nodes.get_mut(&container)
        {
            let position = position.min(elements.len());
            elements.insert(position, child);
        }
    }

    pub fn detach_element(&mut self, container: NodeId, position: usize) -> Option<NodeId> {
        match self.nodes.get_mut(&container) {
            Some(Node {
                kind: NodeKind::Recurring(elements),
                ..
            }) if position < elements.len() => Some(elements.remove(position)),
            _ => None,
        }
    }

    /// Remove `id` and all of its descendants
    ///
    /// Does not detach `id` from its parent. Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.shift_remove(&next) {
                stack.extend(node.children());
                removed += 1;
            }
        }
        removed
    }

    /// Remove every descendant of `id`, leaving it childless
    pub fn clear_children(&mut self, id: NodeId) -> usize {
        let children = match self.nodes.get_mut(&id) {
            Some(node) => {
                let children = node.children();
                match &mut node.kind {
                    NodeKind::Group(fields) => fields.clear(),
                    NodeKind::Recurring(elements) => elements.clear(),
                    NodeKind::Question => {}
                }
                children
            }
            None => return 0,
        };
        children
            .into_iter()
            .map(|child| self.remove_subtree(child))
            .sum()
    }

    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match &self.get(id)?.kind {
            NodeKind::Group(fields) => fields.get(key).copied(),
            _ => None,
        }
    }

    pub fn elements(&self, id: NodeId) -> &[NodeId] {
        match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Recurring(elements)) => elements.as_slice(),
            _ => &[],
        }
    }

    /// Live position of `id` inside its recurring container
    pub fn position(&self, id: NodeId) -> Option<usize> {
        let parent = self.get(id)?.parent?;
        self.elements(parent).iter().position(|&e| e == id)
    }

    /// Nearest recurring element at or above `id`, with its live position
    pub fn instance_of(&self, id: NodeId) -> Option<(usize, NodeId)> {
        let mut current = id;
        loop {
            if let Some(position) = self.position(current) {
                return Some((position, current));
            }
            current = self.get(current)?.parent?;
        }
    }

    /// Full path of `id`, recomputed from parent links
    pub fn field_path(&self, id: NodeId) -> FieldPath {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(next) = current {
            let Some(node) = self.get(next) else { break };
            if let Some(key) = &node.key {
                segments.push(Segment::Key(key.clone()));
            } else if let Some(position) = self.position(next) {
                segments.push(Segment::Index(position));
            }
            current = node.parent;
        }
        segments.reverse();
        FieldPath::from_segments(segments)
    }

    /// Resolve a full path to a node, starting at `root`
    pub fn resolve(&self, root: NodeId, path: &[Segment]) -> Option<NodeId> {
        let mut current = root;
        for segment in path {
            current = match segment {
                Segment::Key(key) => self.child(current, key)?,
                Segment::Index(i) => *self.elements(current).get(*i)?,
            };
        }
        Some(current)
    }
}
