//! Formstate Script - RON loader and schema definitions
//!
//! Loads form definitions from RON files:
//! - The field tree with optional `is_active` / `is_required` rules per field
//! - Build options
//! - Initial form data, also loadable on its own from JSON
//!
//! ```
//! let loaded = formstate_script::load_str(r#"(
//!     fields: {
//!         "question1": (is_required: Some(Bool(true))),
//!         "group1": (
//!             is_active: Some(Expr(Le(Field("question1"), Literal(3)))),
//!             fields: { "question3": () },
//!         ),
//!     },
//!     initial: Some({ "question1": 5 }),
//! )"#)?;
//! let state = loaded.build()?;
//! assert!(!state.node("group1").unwrap().is_active());
//! # Ok::<(), formstate_script::Error>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{load_file, load_form_file, load_form_json, load_str, LoadedForm};
pub use schema::{FieldDef, FieldKind, FormDef, RuleDef};
