//! The form state: form data, its state tree and the rules bound to it

use crate::config::{FieldConfig, FormOptions, GroupConfig};
use crate::node::{NodeKind, NodeStore};
use crate::path::{join_shape, FieldPath};
use crate::rule::RuleStore;
use crate::view::{Evaluator, FormView, NodeRef};
use crate::{Error, NodeId, Result, Rule, Value};
use indexmap::IndexMap;

/// A built form: owns the form data and the derived state tree
///
/// The form data is the only source of truth for values; the tree derives
/// flags from it and writes values through to it. Every mutation refreshes
/// all flags before returning.
#[derive(Debug, Clone)]
pub struct FormState {
    form: Value,
    config: GroupConfig,
    options: FormOptions,
    pub(crate) nodes: NodeStore,
    pub(crate) rules: RuleStore,
    root: NodeId,
}

impl FormState {
    /// Build the state tree for `form` with default options
    pub fn build(form: impl Into<Value>, config: GroupConfig) -> Result<Self> {
        Self::build_with(form, config, FormOptions::default())
    }

    /// Build the state tree for `form`
    ///
    /// Walks the configuration and the form together, creating one node per
    /// configured field and materialising missing groups and recurring
    /// groups in the form (unless `options.strict`). Flags are refreshed
    /// once before returning.
    pub fn build_with(
        form: impl Into<Value>,
        config: GroupConfig,
        options: FormOptions,
    ) -> Result<Self> {
        let mut form = form.into();
        if form.is_null() {
            form = Value::map();
        } else if !matches!(form, Value::Map(_)) {
            return Err(Error::shape_conflict("<root>", "map", form.type_name()));
        }

        let mut rules = RuleStore::new();
        config.register_rules(&mut rules, "");

        let mut nodes = NodeStore::new();
        let root = nodes.create(None, None, "", NodeKind::Group(IndexMap::new()));
        TreeBuilder::new(&mut nodes, &mut form, options.strict).build_fields(
            root,
            &config,
            &FieldPath::root(),
            "",
        )?;

        let mut state = Self {
            form,
            config,
            options,
            nodes,
            rules,
            root,
        };
        state.refresh();
        tracing::debug!(
            nodes = state.nodes.len(),
            rules = state.rules.len(),
            "built form state"
        );
        Ok(state)
    }

    /// Recompute every node's cached flags from the current form data
    ///
    /// Visits every node in the tree. Idempotent without intervening
    /// mutations.
    pub fn refresh(&mut self) {
        let computed: Vec<_> = {
            let evaluator = Evaluator::new(self);
            self.nodes
                .ids()
                .map(|id| (id, evaluator.flags(id)))
                .collect()
        };
        let count = computed.len();
        for (id, flags) in computed {
            if let Some(node) = self.nodes.get_mut(id) {
                node.flags = flags;
            }
        }
        tracing::trace!(nodes = count, "refreshed flags");
    }

    /// Read access to the tree
    pub fn view(&self) -> FormView<'_> {
        FormView::cached(self)
    }

    /// The root node
    pub fn root(&self) -> NodeRef<'_> {
        self.view().root()
    }

    /// The node at a full path (`group1.question3`, `items[1].name`, `items.1.name`)
    pub fn node(&self, path: &str) -> Option<NodeRef<'_>> {
        self.view().node(path)
    }

    /// The value at a full path
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.view().value(path)
    }

    /// The live form data, including materialised containers
    pub fn form(&self) -> &Value {
        &self.form
    }

    /// Consume the state and return the form data
    pub fn into_form(self) -> Value {
        self.form
    }

    /// The configuration this state was built from
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// The options this state was built with
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// The rules bound to this tree
    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Number of nodes in the tree, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root node exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    /// Set the value at `path` and refresh
    ///
    /// Setting a group or a recurring group replaces its data and rebuilds
    /// its sub-tree from the configuration. If the rebuild fails nothing
    /// changes and the error is returned.
    pub fn set_value(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let field_path = FieldPath::parse(path)?;
        let id = self
            .nodes
            .resolve(self.root, &field_path)
            .ok_or_else(|| Error::NodeNotFound(path.to_string()))?;
        let value = value.into();

        let is_question = matches!(
            self.nodes.get(id).map(|node| &node.kind),
            Some(NodeKind::Question)
        );
        if is_question {
            self.form.set_path(&field_path, value)?;
        } else {
            self.replace_subtree(id, &field_path, value)?;
        }
        self.refresh();
        Ok(())
    }

    /// Write `value` and rebuild the sub-tree under `id`
    ///
    /// On failure the form data and the arena are put back as they were, so
    /// node ids and cached flags are unchanged.
    fn replace_subtree(&mut self, id: NodeId, path: &FieldPath, value: Value) -> Result<()> {
        if path.is_root() && !matches!(value, Value::Map(_)) {
            return Err(Error::shape_conflict("<root>", "map", value.type_name()));
        }
        let saved_form = self.form.clone();
        let saved_nodes = self.nodes.clone();

        let written = if path.is_root() {
            self.form = value;
            Ok(())
        } else {
            self.form.set_path(path, value)
        };
        if let Err(error) = written.and_then(|()| self.rebuild(id, path)) {
            self.form = saved_form;
            self.nodes = saved_nodes;
            tracing::debug!(path = %path.display_path(), %error, "rejected sub-tree write");
            return Err(error);
        }
        Ok(())
    }

    /// Drop the descendants of `id` and build them again from the configuration
    fn rebuild(&mut self, id: NodeId, path: &FieldPath) -> Result<()> {
        let (shape, container) = match self.nodes.get(id) {
            Some(node) => (node.shape.clone(), node.is_container()),
            None => return Err(Error::NodeNotFound(path.to_string())),
        };
        self.nodes.clear_children(id);

        let Some(group) = self.config.group_at(&shape) else {
            return Err(Error::NotAGroup(path.display_path()));
        };
        let mut builder = TreeBuilder::new(&mut self.nodes, &mut self.form, self.options.strict);
        if container {
            builder.materialize(path, ContainerKind::List)?;
            builder.build_elements(id, group, path, &shape)
        } else {
            builder.materialize(path, ContainerKind::Map)?;
            builder.build_fields(id, group, path, &shape)
        }
    }

    /// Replace the activity rule for every node sharing `path`'s shape, then refresh
    pub fn active_when(&mut self, path: &str, rule: impl Into<Rule>) -> Result<()> {
        let shape = self.rule_shape(path)?;
        self.rules.set_active(shape, rule.into());
        self.refresh();
        Ok(())
    }

    /// Replace the requiredness rule for every node sharing `path`'s shape, then refresh
    pub fn required_when(&mut self, path: &str, rule: impl Into<Rule>) -> Result<()> {
        let shape = self.rule_shape(path)?;
        self.rules.set_required(shape, rule.into());
        self.refresh();
        Ok(())
    }

    fn rule_shape(&self, path: &str) -> Result<String> {
        let shape = FieldPath::parse(path)?.shape_path();
        if !self.rules.contains(&shape) {
            tracing::warn!(%shape, "registering a rule for a shape with no configured field");
        }
        Ok(shape)
    }

    /// Resolve `path` to a recurring container
    pub(crate) fn recurring_target(&self, path: &str) -> Result<(NodeId, FieldPath)> {
        let field_path = FieldPath::parse(path)?;
        let id = self
            .nodes
            .resolve(self.root, &field_path)
            .ok_or_else(|| Error::NodeNotFound(path.to_string()))?;
        match self.nodes.get(id) {
            Some(node) if node.is_container() => Ok((id, field_path)),
            _ => Err(Error::NotRecurring(path.to_string())),
        }
    }

    /// Split borrow used by the recurring group handler
    pub(crate) fn builder_parts(&mut self) -> (TreeBuilder<'_>, &GroupConfig) {
        (
            TreeBuilder::new(&mut self.nodes, &mut self.form, self.options.strict),
            &self.config,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ContainerKind {
    Map,
    List,
}

impl ContainerKind {
    fn name(self) -> &'static str {
        match self {
            ContainerKind::Map => "map",
            ContainerKind::List => "list",
        }
    }

    fn empty(self) -> Value {
        match self {
            ContainerKind::Map => Value::map(),
            ContainerKind::List => Value::list(),
        }
    }

    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ContainerKind::Map, Value::Map(_)) | (ContainerKind::List, Value::List(_))
        )
    }
}

/// Walks configuration and form data together, creating nodes
pub(crate) struct TreeBuilder<'a> {
    pub nodes: &'a mut NodeStore,
    pub form: &'a mut Value,
    strict: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(nodes: &'a mut NodeStore, form: &'a mut Value, strict: bool) -> Self {
        Self {
            nodes,
            form,
            strict,
        }
    }

    /// Create the fields of `config` under the group node `parent`
    pub fn build_fields(
        &mut self,
        parent: NodeId,
        config: &GroupConfig,
        path: &FieldPath,
        shape: &str,
    ) -> Result<()> {
        for (key, field) in &config.fields {
            let child_path = path.join(key.as_str());
            let child_shape = join_shape(shape, key);
            let id = self.build_field(parent, key, field, &child_path, &child_shape)?;
            self.nodes.attach_field(parent, key, id);
        }
        Ok(())
    }

    fn build_field(
        &mut self,
        parent: NodeId,
        key: &str,
        field: &FieldConfig,
        path: &FieldPath,
        shape: &str,
    ) -> Result<NodeId> {
        let key = Some(key.to_string());
        match field {
            FieldConfig::Question(_) => {
                if self.strict && self.form.get_path(path).is_none() {
                    return Err(Error::MissingField(path.display_path()));
                }
                Ok(self.nodes.create(Some(parent), key, shape, NodeKind::Question))
            }
            FieldConfig::Group(group) => {
                self.materialize(path, ContainerKind::Map)?;
                let id = self
                    .nodes
                    .create(Some(parent), key, shape, NodeKind::Group(IndexMap::new()));
                self.build_fields(id, group, path, shape)?;
                Ok(id)
            }
            FieldConfig::Recurring(instance) => {
                self.materialize(path, ContainerKind::List)?;
                let id = self
                    .nodes
                    .create(Some(parent), key, shape, NodeKind::Recurring(Vec::new()));
                self.build_elements(id, instance, path, shape)?;
                Ok(id)
            }
        }
    }

    /// Create one element per entry of the form list at `path`
    pub fn build_elements(
        &mut self,
        container: NodeId,
        instance: &GroupConfig,
        path: &FieldPath,
        shape: &str,
    ) -> Result<()> {
        let len = self
            .form
            .get_path(path)
            .and_then(Value::as_list)
            .map_or(0, <[Value]>::len);
        for index in 0..len {
            let id = self.build_element(container, index, instance, path, shape)?;
            self.nodes.attach_element(container, index, id);
        }
        Ok(())
    }

    /// Create the sub-tree of the element at `index` of the container at `path`
    ///
    /// The element is not attached to the container. On failure nothing is
    /// left behind in the arena.
    pub fn build_element(
        &mut self,
        container: NodeId,
        index: usize,
        instance: &GroupConfig,
        path: &FieldPath,
        shape: &str,
    ) -> Result<NodeId> {
        let element_path = path.join_index(index);
        self.materialize(&element_path, ContainerKind::Map)?;
        let id = self.nodes.create(
            Some(container),
            None,
            shape,
            NodeKind::Group(IndexMap::new()),
        );
        if let Err(error) = self.build_fields(id, instance, &element_path, shape) {
            self.nodes.remove_subtree(id);
            return Err(error);
        }
        Ok(id)
    }

    /// Ensure a container of `kind` exists at `path`
    pub fn materialize(&mut self, path: &FieldPath, kind: ContainerKind) -> Result<()> {
        match self.form.get_path(path) {
            Some(value) if kind.matches(value) => Ok(()),
            None | Some(Value::Null) => {
                if self.strict {
                    return Err(Error::MissingField(path.display_path()));
                }
                self.form.set_path(path, kind.empty())
            }
            Some(other) => Err(Error::shape_conflict(
                path.display_path(),
                kind.name(),
                other.type_name(),
            )),
        }
    }
}

// Fails to compile if FormState stops being Send + Sync.
fn _assert_state_send_sync<T: Send + Sync>() {}
fn _state_is_send_sync() {
    _assert_state_send_sync::<FormState>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Expr, RuleConfig};

    fn gt(threshold: f64) -> impl Fn(&Value) -> bool {
        move |v| v.as_float().is_some_and(|x| x > threshold)
    }

    fn le(threshold: f64) -> impl Fn(&Value) -> bool {
        move |v| v.as_float().is_some_and(|x| x <= threshold)
    }

    fn example_form() -> Value {
        [
            ("question1", Value::Int(5)),
            ("question2", Value::from("answer")),
            (
                "group1",
                [("question3", Value::from(vec![22.5f64]))].into_iter().collect(),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn example_config() -> GroupConfig {
        GroupConfig::new()
            .question("question1", RuleConfig::new().required(true))
            .question(
                "question2",
                RuleConfig::new().active_when(|form, _| form.is_active_and("question1", gt(3.0))),
            )
            .group(
                "group1",
                GroupConfig::new()
                    .active_when(|form, _| form.is_active_and("question1", le(3.0)))
                    .question("question3", RuleConfig::new().active(true)),
            )
    }

    fn flags(state: &FormState, path: &str) -> (bool, bool) {
        let node = state.node(path).unwrap_or_else(|| panic!("no node at {}", path));
        (node.is_active(), node.is_required())
    }

    #[test]
    fn test_example_scenario() {
        let mut state = FormState::build(example_form(), example_config()).unwrap();

        assert!(!state.node("group1").unwrap().is_active());
        assert!(!state.node("group1.question3").unwrap().is_active());
        assert!(state.node("question2").unwrap().is_active());

        state.set_value("question1", 3i64).unwrap();

        assert!(state.node("group1").unwrap().is_active());
        assert!(state.node("group1.question3").unwrap().is_active());
        assert!(!state.node("question2").unwrap().is_active());
        assert_eq!(state.value("question1"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_defaults_hold_right_after_build() {
        let form: Value = [("a", Value::Int(1))].into_iter().collect();
        let config = GroupConfig::new()
            .question("a", RuleConfig::new())
            .group("g", GroupConfig::new().question("b", RuleConfig::new()));
        let state = FormState::build(form, config).unwrap();

        for path in ["", "a", "g", "g.b"] {
            assert_eq!(flags(&state, path), (true, false), "{}", path);
        }
    }

    #[test]
    fn test_inactive_group_deactivates_descendants() {
        let config = GroupConfig::new().group(
            "outer",
            GroupConfig::new().active(false).group(
                "inner",
                GroupConfig::new().question("leaf", RuleConfig::new().active(true)),
            ),
        );
        let state = FormState::build(Value::Null, config).unwrap();

        assert!(!state.node("outer").unwrap().is_active());
        assert!(!state.node("outer.inner").unwrap().is_active());
        assert!(!state.node("outer.inner.leaf").unwrap().is_active());
    }

    #[test]
    fn test_required_cascades_down() {
        let config = GroupConfig::new()
            .group(
                "parent",
                GroupConfig::new()
                    .required(true)
                    .question("child", RuleConfig::new().required(false)),
            )
            .question("own", RuleConfig::new().required(true))
            .question("plain", RuleConfig::new());
        let state = FormState::build(Value::Null, config).unwrap();

        assert!(state.node("parent").unwrap().is_required());
        assert!(state.node("parent.child").unwrap().is_required());
        assert!(state.node("own").unwrap().is_required());
        assert!(!state.node("plain").unwrap().is_required());
        assert!(!state.root().is_required());
    }

    #[test]
    fn test_root_rules_apply_to_everything() {
        let config = GroupConfig::new()
            .active(false)
            .required(true)
            .question("q", RuleConfig::new());
        let state = FormState::build(Value::Null, config).unwrap();
        assert_eq!(flags(&state, "q"), (false, true));
    }

    #[test]
    fn test_refresh_reaches_every_node() {
        let config = GroupConfig::new()
            .question("toggle", RuleConfig::new())
            .group(
                "a",
                GroupConfig::new().group(
                    "b",
                    GroupConfig::new().question(
                        "c",
                        RuleConfig::new().required_when(|form, _| {
                            form.value("toggle").and_then(Value::as_bool) == Some(true)
                        }),
                    ),
                ),
            );
        let mut state = FormState::build(Value::Null, config).unwrap();
        assert!(!state.node("a.b.c").unwrap().is_required());

        state.set_value("toggle", true).unwrap();
        assert!(state.node("a.b.c").unwrap().is_required());
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut state = FormState::build(example_form(), example_config()).unwrap();
        let snapshot = |state: &FormState| -> Vec<_> {
            state.nodes.ids().map(|id| (id, state.nodes.get(id).unwrap().flags)).collect()
        };

        state.refresh();
        let first = snapshot(&state);
        state.refresh();
        assert_eq!(first, snapshot(&state));
    }

    #[test]
    fn test_rules_see_fresh_flags_regardless_of_order() {
        // `first` is declared before the field it depends on
        let config = GroupConfig::new()
            .question(
                "first",
                RuleConfig::new().active_when(|form, _| {
                    form.node("second").is_some_and(|n| n.is_active())
                }),
            )
            .question(
                "second",
                RuleConfig::new()
                    .active_when(|form, _| form.value("switch") == Some(&Value::Bool(true))),
            )
            .question("switch", RuleConfig::new());
        let mut state = FormState::build(Value::Null, config).unwrap();
        assert!(!state.node("first").unwrap().is_active());

        state.set_value("switch", true).unwrap();
        assert!(state.node("second").unwrap().is_active());
        assert!(state.node("first").unwrap().is_active());
    }

    #[test]
    fn test_rule_cycle_falls_back_to_cached_flags() {
        let config = GroupConfig::new()
            .question(
                "a",
                RuleConfig::new()
                    .active_when(|form, _| form.node("b").is_some_and(|n| n.is_active())),
            )
            .question(
                "b",
                RuleConfig::new()
                    .active_when(|form, _| form.node("a").is_some_and(|n| n.is_active())),
            );
        let state = FormState::build(Value::Null, config).unwrap();
        // cached defaults are active, so the cycle settles on active
        assert!(state.node("a").unwrap().is_active());
        assert!(state.node("b").unwrap().is_active());
    }

    #[test]
    fn test_expression_rules() {
        let config = GroupConfig::new()
            .question("question1", RuleConfig::new())
            .question(
                "question2",
                RuleConfig::new().active(Expr::Gt(
                    Box::new(Expr::field("question1")),
                    Box::new(Expr::lit(3i64)),
                )),
            )
            .question(
                "broken",
                RuleConfig::new().active(Expr::Gt(
                    Box::new(Expr::lit("text")),
                    Box::new(Expr::lit(3i64)),
                )),
            );
        let mut state = FormState::build(example_form(), config).unwrap();
        assert!(state.node("question2").unwrap().is_active());
        assert!(!state.node("broken").unwrap().is_active());

        state.set_value("question1", 1i64).unwrap();
        assert!(!state.node("question2").unwrap().is_active());
    }

    #[test]
    fn test_missing_containers_are_materialised() {
        let config = GroupConfig::new()
            .question("question1", RuleConfig::new())
            .group("group1", GroupConfig::new().question("question3", RuleConfig::new()))
            .recurring("items", GroupConfig::new().question("name", RuleConfig::new()));
        let state = FormState::build(Value::map(), config).unwrap();

        assert_eq!(state.value("group1"), Some(&Value::map()));
        assert_eq!(state.value("items"), Some(&Value::list()));
        assert_eq!(state.value("question1"), None);
        assert!(state.node("question1").unwrap().value().is_none());
    }

    #[test]
    fn test_strict_mode_rejects_missing_fields() {
        let config = GroupConfig::new().group("group1", GroupConfig::new());
        let err = FormState::build_with(Value::map(), config, FormOptions::new().with_strict(true))
            .unwrap_err();
        assert_eq!(err, Error::MissingField("group1".into()));
    }

    #[test]
    fn test_shape_conflict_fails_build() {
        let form: Value = [("group1", Value::Int(3))].into_iter().collect();
        let config = GroupConfig::new().group("group1", GroupConfig::new());
        assert!(matches!(
            FormState::build(form, config),
            Err(Error::ShapeConflict { .. })
        ));
        assert!(matches!(
            FormState::build(Value::Int(1), GroupConfig::new()),
            Err(Error::ShapeConflict { .. })
        ));
    }

    #[test]
    fn test_invalid_mutation_targets_fail_fast() {
        let mut state = FormState::build(example_form(), example_config()).unwrap();
        assert_eq!(
            state.set_value("nowhere", 1i64),
            Err(Error::NodeNotFound("nowhere".into()))
        );
        assert!(matches!(state.set_value("a..b", 1i64), Err(Error::InvalidPath(_))));
        assert!(matches!(
            state.set_value("group1", 1i64),
            Err(Error::ShapeConflict { .. })
        ));
        // failed writes leave the data untouched
        assert_eq!(
            state.value("group1.question3"),
            Some(&Value::from(vec![22.5f64]))
        );
        let question3 = state.node("group1.question3").unwrap();
        assert!(!question3.is_active());
        assert!(!state.node("group1").unwrap().is_active());
    }

    #[test]
    fn test_rejected_group_write_keeps_tree() {
        let config = GroupConfig::new()
            .question("toggle", RuleConfig::new())
            .group(
                "g",
                GroupConfig::new()
                    .active_when(|form, _| form.value("toggle") == Some(&Value::Bool(true)))
                    .group("inner", GroupConfig::new().question("q", RuleConfig::new())),
            );
        let form: Value = [("toggle", Value::Bool(false))].into_iter().collect();
        let mut state = FormState::build(form, config).unwrap();
        let before = state.node("g.inner.q").unwrap().id();
        assert!(!state.node("g.inner.q").unwrap().is_active());

        let bad: Value = [("inner", Value::Int(5))].into_iter().collect();
        assert!(matches!(
            state.set_value("g", bad),
            Err(Error::ShapeConflict { .. })
        ));

        let q = state.node("g.inner.q").unwrap();
        assert_eq!(q.id(), before);
        assert!(!q.is_active());
        assert!(!state.node("g").unwrap().is_active());
        assert_eq!(state.value("g.inner"), Some(&Value::map()));
    }

    #[test]
    fn test_set_group_value_rebuilds_subtree() {
        let mut state = FormState::build(example_form(), example_config()).unwrap();
        let replacement: Value = [("question3", Value::from(vec![1i64, 2]))].into_iter().collect();
        state.set_value("group1", replacement.clone()).unwrap();

        assert_eq!(state.value("group1"), Some(&replacement));
        assert_eq!(
            state.node("group1.question3").unwrap().value(),
            Some(&Value::from(vec![1i64, 2]))
        );
    }

    #[test]
    fn test_rules_registered_after_build() {
        let mut state = FormState::build(example_form(), example_config()).unwrap();
        assert!(!state.node("question2").unwrap().is_required());

        state.required_when("question2", true).unwrap();
        assert!(state.node("question2").unwrap().is_required());

        state.active_when("question1", false).unwrap();
        assert!(!state.node("question1").unwrap().is_active());
        // question2 and group1 both test question1 only while it is active
        assert!(!state.node("question2").unwrap().is_active());
        assert!(!state.node("group1").unwrap().is_active());
    }

    #[test]
    fn test_late_rules_bind_by_shape() {
        let mut state = FormState::build(example_form(), example_config()).unwrap();
        let shapes = state.rules().len();
        assert!(state.rules().contains("group1.question3"));

        state.required_when("group1[0].question3", true).unwrap();
        assert_eq!(state.rules().len(), shapes);
        assert!(state.node("group1.question3").unwrap().is_required());

        state.active_when("later.field", false).unwrap();
        assert!(state.rules().contains("later.field"));
        assert_eq!(state.rules().len(), shapes + 1);
        assert!(matches!(state.active_when("a..b", true), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_paths_of_nodes() {
        let state = FormState::build(example_form(), example_config()).unwrap();
        let node = state.node("group1.question3").unwrap();
        assert_eq!(node.path(), "group1.question3");
        assert_eq!(node.shape_path(), "group1.question3");
        assert_eq!(node.key(), Some("question3"));
        assert_eq!(node.index(), None);
        assert_eq!(node.parent().unwrap().path(), "group1");
        assert_eq!(state.root().len(), 3);
    }
}
