//! Schema definitions for RON form definitions

pub mod field;

pub use field::{FieldDef, FieldKind, RuleDef};

use field::check_key;

use crate::error::Result;
use formstate_core::{FormOptions, GroupConfig, RuleConfig, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A whole form definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDef {
    /// Build options
    pub options: FormOptions,
    /// Rule of the form root
    pub is_active: Option<RuleDef>,
    /// Rule of the form root
    pub is_required: Option<RuleDef>,
    /// Top-level fields, in form order
    pub fields: IndexMap<String, FieldDef>,
    /// Initial form data
    pub initial: Option<Value>,
}

impl FormDef {
    /// Convert the field tree into a core configuration
    pub fn to_config(&self) -> Result<GroupConfig> {
        let mut config = GroupConfig::new();
        config.rules = RuleConfig {
            is_active: self.is_active.clone().map(Into::into),
            is_required: self.is_required.clone().map(Into::into),
        };
        for (key, field) in &self.fields {
            check_key(key)?;
            config.fields.insert(key.clone(), field.to_field(key)?);
        }
        Ok(config)
    }
}
