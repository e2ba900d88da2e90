//! Formstate Core - Declarative form state engine
//!
//! This crate derives per-field state for nested, JSON-like form data:
//! - Dynamic value types (`Value`, `ValueMap`) and the path get/set primitives
//! - Path algebra: full paths, shape paths, bracketed display paths
//! - Rules (`Rule`, `Expr`) bound by shape path in a `RuleStore`
//! - A state tree of questions, groups and recurring groups with cached
//!   `is_active` / `is_required` flags, refreshed after every mutation
//!
//! ## Inheritance
//!
//! A node is active when it and every ancestor are active under their own
//! rules, and required when it or any ancestor is required. Rules inside a
//! recurring group receive the live index of their element.
//!
//! ```
//! use formstate_core::{FormState, GroupConfig, RuleConfig, Value};
//!
//! let form: Value = [("question1", Value::Int(5))].into_iter().collect();
//! let config = GroupConfig::new()
//!     .question("question1", RuleConfig::new().required(true))
//!     .group(
//!         "group1",
//!         GroupConfig::new()
//!             .active_when(|form, _| {
//!                 form.is_active_and("question1", |v| v.as_int().is_some_and(|n| n <= 3))
//!             })
//!             .question("question3", RuleConfig::new()),
//!     );
//!
//! let mut state = FormState::build(form, config)?;
//! assert!(!state.node("group1.question3").unwrap().is_active());
//!
//! state.set_value("question1", 3i64)?;
//! assert!(state.node("group1.question3").unwrap().is_active());
//! # Ok::<(), formstate_core::Error>(())
//! ```

mod builder;
mod config;
mod error;
mod expr;
mod identity;
mod node;
pub mod path;
mod recurring;
mod rule;
mod state;
mod value;
mod view;

pub use builder::FormBuilder;
pub use config::{FieldConfig, FormOptions, GroupConfig, RuleConfig};
pub use error::{Error, Result};
pub use expr::{EvalContext, Expr};
pub use identity::NodeId;
pub use node::{Flags, NodeType};
pub use path::{FieldPath, Segment};
pub use rule::{Predicate, Rule, RulePair, RuleStore};
pub use state::FormState;
pub use value::{Value, ValueMap, MAX_LIST_PADDING};
pub use view::{FormView, NodeRef};
