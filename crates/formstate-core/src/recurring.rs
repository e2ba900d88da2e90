//! Recurring group mutations
//!
//! Elements carry no stored index: an element's index is its live position
//! in the container, so inserting or removing shifts every later element's
//! index-dependent rules without rebinding anything.

use crate::config::GroupConfig;
use crate::path::FieldPath;
use crate::state::TreeBuilder;
use crate::{Error, FormState, NodeId, Result, Value};

impl FormState {
    /// Push `group` onto the recurring group at `path`
    ///
    /// Returns the id of the new element.
    pub fn append(&mut self, path: &str, group: impl Into<Value>) -> Result<NodeId> {
        self.splice_in(path, None, group.into())
    }

    /// Insert `group` at `index` of the recurring group at `path`
    ///
    /// Later elements shift up by one. `index` may equal the length, which
    /// appends.
    pub fn insert(&mut self, path: &str, index: usize, group: impl Into<Value>) -> Result<NodeId> {
        self.splice_in(path, Some(index), group.into())
    }

    /// Remove and return the element at `index` of the recurring group at `path`
    pub fn remove(&mut self, path: &str, index: usize) -> Result<Value> {
        let (container, list_path) = self.recurring_target(path)?;
        let len = self.nodes.elements(container).len();
        if index >= len {
            return Err(Error::IndexOutOfBounds {
                path: list_path.display_path(),
                index,
                len,
            });
        }

        let (mut builder, _) = self.builder_parts();
        let removed = builder.splice_out(container, index, &list_path)?;
        self.refresh();
        tracing::debug!(path = %list_path.display_path(), index, len = len - 1, "removed element");
        Ok(removed)
    }

    fn splice_in(&mut self, path: &str, index: Option<usize>, group: Value) -> Result<NodeId> {
        let (container, list_path) = self.recurring_target(path)?;
        let shape = self
            .nodes
            .get(container)
            .map(|node| node.shape.clone())
            .unwrap_or_default();
        let len = self.nodes.elements(container).len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(Error::IndexOutOfBounds {
                path: list_path.display_path(),
                index,
                len,
            });
        }

        let (mut builder, config) = self.builder_parts();
        let instance = config
            .group_at(&shape)
            .ok_or_else(|| Error::NotRecurring(path.to_string()))?;
        let id = builder.splice_element(container, index, instance, &list_path, &shape, group)?;
        self.refresh();
        tracing::debug!(path = %list_path.display_path(), index, len = len + 1, "inserted element");
        Ok(id)
    }
}

impl TreeBuilder<'_> {
    /// Insert `value` into the form list and a matching element into the container
    ///
    /// If the element cannot be built the form list is restored.
    fn splice_element(
        &mut self,
        container: NodeId,
        index: usize,
        instance: &GroupConfig,
        path: &FieldPath,
        shape: &str,
        value: Value,
    ) -> Result<NodeId> {
        let list = self.list_mut(path)?;
        let index = index.min(list.len());
        list.insert(index, value);

        match self.build_element(container, index, instance, path, shape) {
            Ok(id) => {
                self.nodes.attach_element(container, index, id);
                Ok(id)
            }
            Err(error) => {
                if let Ok(list) = self.list_mut(path) {
                    list.remove(index);
                }
                Err(error)
            }
        }
    }

    /// Remove the element at `index` from the container and the form list
    fn splice_out(&mut self, container: NodeId, index: usize, path: &FieldPath) -> Result<Value> {
        let len = self.list_mut(path)?.len();
        let removed = self
            .form
            .remove_path(&path.join_index(index))
            .ok_or_else(|| Error::IndexOutOfBounds {
                path: path.display_path(),
                index,
                len,
            })?;
        if let Some(id) = self.nodes.detach_element(container, index) {
            self.nodes.remove_subtree(id);
        }
        Ok(removed)
    }

    fn list_mut(&mut self, path: &FieldPath) -> Result<&mut Vec<Value>> {
        let value = self
            .form
            .get_path_mut(path)
            .ok_or_else(|| Error::NodeNotFound(path.display_path()))?;
        let got = value.type_name();
        value
            .as_list_mut()
            .ok_or_else(|| Error::shape_conflict(path.display_path(), "list", got))
    }
}
