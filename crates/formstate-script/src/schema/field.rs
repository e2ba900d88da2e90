//! Field definition schema

use crate::error::{Error, Result};
use formstate_core::{path, Expr, FieldConfig, GroupConfig, Rule, RuleConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What a field definition stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Question,
    Group,
    Recurring,
}

/// A rule as written in a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleDef {
    /// Constant outcome
    Bool(bool),
    /// Expression decided by truthiness
    Expr(Expr),
}

impl From<RuleDef> for Rule {
    fn from(def: RuleDef) -> Self {
        match def {
            RuleDef::Bool(b) => Rule::Const(b),
            RuleDef::Expr(expr) => Rule::Expr(expr),
        }
    }
}

/// Definition of one field
///
/// `kind` may be omitted: a field with nested `fields` is a group, one
/// without is a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDef {
    pub kind: Option<FieldKind>,
    pub is_active: Option<RuleDef>,
    pub is_required: Option<RuleDef>,
    /// Nested fields of a group, or the per-instance fields of a recurring group
    pub fields: IndexMap<String, FieldDef>,
}

impl FieldDef {
    /// The declared kind, or the one implied by `fields`
    pub fn kind(&self) -> FieldKind {
        match self.kind {
            Some(kind) => kind,
            None if self.fields.is_empty() => FieldKind::Question,
            None => FieldKind::Group,
        }
    }

    fn rules(&self) -> RuleConfig {
        RuleConfig {
            is_active: self.is_active.clone().map(Into::into),
            is_required: self.is_required.clone().map(Into::into),
        }
    }

    /// Convert into a core field configuration
    ///
    /// `at` is the shape path of this field, used in error messages.
    pub fn to_field(&self, at: &str) -> Result<FieldConfig> {
        match self.kind() {
            FieldKind::Question if !self.fields.is_empty() => Err(Error::InvalidSchema(format!(
                "question '{}' cannot have fields",
                at
            ))),
            FieldKind::Question => Ok(FieldConfig::Question(self.rules())),
            FieldKind::Group => Ok(FieldConfig::Group(self.to_group(at)?)),
            FieldKind::Recurring => Ok(FieldConfig::Recurring(self.to_group(at)?)),
        }
    }

    fn to_group(&self, at: &str) -> Result<GroupConfig> {
        let mut group = GroupConfig::new();
        group.rules = self.rules();
        for (key, field) in &self.fields {
            check_key(key)?;
            let child = format!("{}.{}", at, key);
            group.fields.insert(key.clone(), field.to_field(&child)?);
        }
        Ok(group)
    }
}

/// Field keys must address a single structural path segment
pub(crate) fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['.', '[', ']']) || !path::is_structural_segment(key) {
        return Err(Error::InvalidSchema(format!("invalid field key '{}'", key)));
    }
    Ok(())
}
