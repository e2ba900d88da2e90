//! Read access to the state tree
//!
//! Consumers read nodes through a cached [`FormView`]: flags are the snapshot
//! taken by the last refresh. Rules are handed a live view instead, where
//! reading another node's flags evaluates them against the current form
//! data, memoised for the duration of one refresh.

use crate::node::{Flags, NodeKind, NodeType};
use crate::path::FieldPath;
use crate::{FormState, NodeId, Value};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// A window onto a form state
#[derive(Clone, Copy)]
pub struct FormView<'a> {
    state: &'a FormState,
    live: Option<&'a Evaluator<'a>>,
}

impl<'a> FormView<'a> {
    pub(crate) fn cached(state: &'a FormState) -> Self {
        Self { state, live: None }
    }

    pub(crate) fn live(state: &'a FormState, evaluator: &'a Evaluator<'a>) -> Self {
        Self {
            state,
            live: Some(evaluator),
        }
    }

    /// The root node
    pub fn root(&self) -> NodeRef<'a> {
        NodeRef {
            view: *self,
            id: self.state.root_id(),
        }
    }

    /// The node at a full path (`group1.question3`, `items[1].name`)
    pub fn node(&self, path: &str) -> Option<NodeRef<'a>> {
        self.root().get(path)
    }

    /// The node with the given id, if it is still part of the tree
    pub fn node_by_id(&self, id: NodeId) -> Option<NodeRef<'a>> {
        self.state.nodes.get(id).map(|_| NodeRef { view: *self, id })
    }

    /// The value at a full path
    pub fn value(&self, path: &str) -> Option<&'a Value> {
        crate::path::get(self.state.form(), path)
    }

    /// The whole form data
    pub fn form(&self) -> &'a Value {
        self.state.form()
    }

    /// True iff the node at `path` exists, is active and `pred` holds for its value
    pub fn is_active_and(&self, path: &str, pred: impl FnOnce(&Value) -> bool) -> bool {
        self.node(path).is_some_and(|node| node.is_active_and(pred))
    }

    fn flags(&self, id: NodeId) -> Flags {
        match self.live {
            Some(evaluator) => evaluator.flags(id),
            None => self
                .state
                .nodes
                .get(id)
                .map(|node| node.flags)
                .unwrap_or_default(),
        }
    }
}

/// One node of the state tree
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    view: FormView<'a>,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Stable id of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// What this node stands for
    pub fn node_type(&self) -> NodeType {
        self.view
            .state
            .nodes
            .get(self.id)
            .map_or(NodeType::Question, |node| node.node_type())
    }

    /// Field key under the parent group; `None` for the root and for elements
    pub fn key(&self) -> Option<&'a str> {
        self.view.state.nodes.get(self.id)?.key.as_deref()
    }

    /// Rule lookup key of this node
    pub fn shape_path(&self) -> &'a str {
        self.view
            .state
            .nodes
            .get(self.id)
            .map_or("", |node| node.shape.as_str())
    }

    /// Full path, recomputed from the live tree
    pub fn field_path(&self) -> FieldPath {
        self.view.state.nodes.field_path(self.id)
    }

    /// Full path as a dot-joined string (`recurringGroup.1.question4`)
    pub fn path(&self) -> String {
        self.field_path().to_string()
    }

    /// Full path with bracketed indices (`recurringGroup[1].question4`)
    pub fn display_path(&self) -> String {
        self.field_path().display_path()
    }

    /// Index of the recurring instance this node is in, if any
    pub fn index(&self) -> Option<usize> {
        self.view.state.nodes.instance_of(self.id).map(|(i, _)| i)
    }

    /// Current value in the form data
    pub fn value(&self) -> Option<&'a Value> {
        self.view.state.form().get_path(&self.field_path())
    }

    /// Derived flags of this node
    pub fn flags(&self) -> Flags {
        self.view.flags(self.id)
    }

    /// Whether this node and all its ancestors are active
    pub fn is_active(&self) -> bool {
        self.flags().active
    }

    /// Whether this node or any ancestor is required
    pub fn is_required(&self) -> bool {
        self.flags().required
    }

    /// Active and `pred` holds for the current value
    ///
    /// An absent value never satisfies the predicate.
    pub fn is_active_and(&self, pred: impl FnOnce(&Value) -> bool) -> bool {
        self.is_active() && self.value().is_some_and(pred)
    }

    /// The parent node
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let parent = self.view.state.nodes.get(self.id)?.parent?;
        Some(NodeRef {
            view: self.view,
            id: parent,
        })
    }

    /// A direct field of this group
    pub fn field(&self, key: &str) -> Option<NodeRef<'a>> {
        let id = self.view.state.nodes.child(self.id, key)?;
        Some(NodeRef { view: self.view, id })
    }

    /// A descendant at a path relative to this node
    pub fn get(&self, path: &str) -> Option<NodeRef<'a>> {
        let path = FieldPath::parse(path).ok()?;
        let id = self.view.state.nodes.resolve(self.id, &path)?;
        Some(NodeRef { view: self.view, id })
    }

    /// An element of this recurring group
    pub fn element(&self, index: usize) -> Option<NodeRef<'a>> {
        let id = *self.view.state.nodes.elements(self.id).get(index)?;
        Some(NodeRef { view: self.view, id })
    }

    /// Elements of this recurring group, in order
    pub fn elements(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let view = self.view;
        view.state
            .nodes
            .elements(self.id)
            .iter()
            .map(move |&id| NodeRef { view, id })
    }

    /// Fields of this group, in configuration order
    pub fn fields(&self) -> Vec<(&'a str, NodeRef<'a>)> {
        match self.view.state.nodes.get(self.id).map(|node| &node.kind) {
            Some(NodeKind::Group(fields)) => fields
                .iter()
                .map(|(key, &id)| (key.as_str(), NodeRef { view: self.view, id }))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Element count of a recurring group, field count of a group, 0 for questions
    pub fn len(&self) -> usize {
        match self.view.state.nodes.get(self.id).map(|node| &node.kind) {
            Some(NodeKind::Group(fields)) => fields.len(),
            Some(NodeKind::Recurring(elements)) => elements.len(),
            _ => 0,
        }
    }

    /// Check if [`NodeRef::len`] is zero
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("path", &self.display_path())
            .field("flags", &self.flags())
            .finish()
    }
}

/// Computes fresh flags for every node during one refresh
///
/// Each node's own rules run at most once. A rule that reads the flags of a
/// node whose evaluation is still in progress gets that node's cached flags.
pub(crate) struct Evaluator<'a> {
    state: &'a FormState,
    memo: RefCell<HashMap<NodeId, Flags>>,
    visiting: RefCell<HashSet<NodeId>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(state: &'a FormState) -> Self {
        Self {
            state,
            memo: RefCell::new(HashMap::new()),
            visiting: RefCell::new(HashSet::new()),
        }
    }

    pub fn flags(&self, id: NodeId) -> Flags {
        if let Some(flags) = self.memo.borrow().get(&id) {
            return *flags;
        }
        let Some(node) = self.state.nodes.get(id) else {
            return Flags::default();
        };
        if !self.visiting.borrow_mut().insert(id) {
            tracing::warn!(
                node = %id,
                shape = %node.shape,
                "rule cycle detected, using cached flags"
            );
            return node.flags;
        }

        let inherited = node.parent.map(|p| self.flags(p)).unwrap_or_default();
        let flags = if node.is_container() {
            inherited
        } else {
            let view = FormView::live(self.state, self);
            let (active, required) = self.state.rules.evaluate(
                &node.shape,
                view,
                self.state.nodes.instance_of(id),
                inherited.active,
                inherited.required,
            );
            Flags { active, required }
        };

        self.visiting.borrow_mut().remove(&id);
        self.memo.borrow_mut().insert(id, flags);
        flags
    }
}
