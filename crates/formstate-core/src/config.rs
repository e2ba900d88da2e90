//! Form configuration: the rule tree mirroring the form's shape
//!
//! ```
//! use formstate_core::{GroupConfig, RuleConfig};
//!
//! let config = GroupConfig::new()
//!     .question("question1", RuleConfig::new().required(true))
//!     .question(
//!         "question2",
//!         RuleConfig::new().active_when(|form, _| {
//!             form.is_active_and("question1", |v| v.as_float().is_some_and(|x| x > 3.0))
//!         }),
//!     )
//!     .recurring(
//!         "recurringGroup",
//!         GroupConfig::new().question(
//!             "question4",
//!             RuleConfig::new().required_when(|_, index| index == Some(0)),
//!         ),
//!     );
//! assert!(config.group_at("recurringGroup").is_some());
//! ```

use crate::path::join_shape;
use crate::rule::{RulePair, RuleStore};
use crate::view::FormView;
use crate::Rule;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Optional `$isActive` / `$isRequired` declarations of one node
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub is_active: Option<Rule>,
    pub is_required: Option<Rule>,
}

impl RuleConfig {
    /// No declarations: active, not required
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the activity rule
    pub fn active(mut self, rule: impl Into<Rule>) -> Self {
        self.is_active = Some(rule.into());
        self
    }

    /// Declare the requiredness rule
    pub fn required(mut self, rule: impl Into<Rule>) -> Self {
        self.is_required = Some(rule.into());
        self
    }

    /// Declare the activity rule as a predicate
    pub fn active_when<F>(self, f: F) -> Self
    where
        F: Fn(&FormView<'_>, Option<usize>) -> bool + Send + Sync + 'static,
    {
        self.active(Rule::when(f))
    }

    /// Declare the requiredness rule as a predicate
    pub fn required_when<F>(self, f: F) -> Self
    where
        F: Fn(&FormView<'_>, Option<usize>) -> bool + Send + Sync + 'static,
    {
        self.required(Rule::when(f))
    }

    pub(crate) fn to_pair(&self) -> RulePair {
        RulePair::new(self.is_active.clone(), self.is_required.clone())
    }
}

/// Configuration of one field
#[derive(Debug, Clone)]
pub enum FieldConfig {
    /// Leaf
    Question(RuleConfig),
    /// Nested group
    Group(GroupConfig),
    /// Repeatable group; the configuration is shared by every instance
    Recurring(GroupConfig),
}

impl FieldConfig {
    /// The node's own rule declarations
    pub fn rules(&self) -> &RuleConfig {
        match self {
            FieldConfig::Question(rules) => rules,
            FieldConfig::Group(group) | FieldConfig::Recurring(group) => &group.rules,
        }
    }
}

/// Configuration of a group (and of the form root)
#[derive(Debug, Clone, Default)]
pub struct GroupConfig {
    pub rules: RuleConfig,
    pub fields: IndexMap<String, FieldConfig>,
}

impl GroupConfig {
    /// Empty group configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare this group's activity rule
    pub fn active(mut self, rule: impl Into<Rule>) -> Self {
        self.rules = self.rules.active(rule);
        self
    }

    /// Declare this group's requiredness rule
    pub fn required(mut self, rule: impl Into<Rule>) -> Self {
        self.rules = self.rules.required(rule);
        self
    }

    /// Declare this group's activity rule as a predicate
    pub fn active_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&FormView<'_>, Option<usize>) -> bool + Send + Sync + 'static,
    {
        self.rules = self.rules.active_when(f);
        self
    }

    /// Declare this group's requiredness rule as a predicate
    pub fn required_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&FormView<'_>, Option<usize>) -> bool + Send + Sync + 'static,
    {
        self.rules = self.rules.required_when(f);
        self
    }

    /// Add a field
    pub fn field(mut self, key: impl Into<String>, field: FieldConfig) -> Self {
        self.fields.insert(key.into(), field);
        self
    }

    /// Add a question
    pub fn question(self, key: impl Into<String>, rules: RuleConfig) -> Self {
        self.field(key, FieldConfig::Question(rules))
    }

    /// Add a nested group
    pub fn group(self, key: impl Into<String>, group: GroupConfig) -> Self {
        self.field(key, FieldConfig::Group(group))
    }

    /// Add a recurring group with its per-instance configuration
    pub fn recurring(self, key: impl Into<String>, instance: GroupConfig) -> Self {
        self.field(key, FieldConfig::Recurring(instance))
    }

    /// Get a direct field
    pub fn get(&self, key: &str) -> Option<&FieldConfig> {
        self.fields.get(key)
    }

    /// The field configuration at a shape path
    pub fn find(&self, shape: &str) -> Option<&FieldConfig> {
        let mut keys = shape.split('.');
        let mut field = self.get(keys.next()?)?;
        for key in keys {
            field = match field {
                FieldConfig::Group(group) | FieldConfig::Recurring(group) => group.get(key)?,
                FieldConfig::Question(_) => return None,
            };
        }
        Some(field)
    }

    /// The group configuration at a shape path
    ///
    /// The empty shape is this group; a recurring field yields its
    /// per-instance configuration.
    pub fn group_at(&self, shape: &str) -> Option<&GroupConfig> {
        if shape.is_empty() {
            return Some(self);
        }
        match self.find(shape)? {
            FieldConfig::Group(group) | FieldConfig::Recurring(group) => Some(group),
            FieldConfig::Question(_) => None,
        }
    }

    /// Register this group's rules and every descendant's under their shape paths
    pub(crate) fn register_rules(&self, store: &mut RuleStore, shape: &str) {
        store.register(shape, self.rules.to_pair());
        for (key, field) in &self.fields {
            let child = join_shape(shape, key);
            match field {
                FieldConfig::Question(rules) => {
                    store.register(child, rules.to_pair());
                }
                FieldConfig::Group(group) | FieldConfig::Recurring(group) => {
                    group.register_rules(store, &child);
                }
            }
        }
    }
}

/// Build-time options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// Fail the build when a configured path is absent from the form
    /// instead of materialising it
    pub strict: bool,
}

impl FormOptions {
    /// Default options: missing containers are materialised
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
