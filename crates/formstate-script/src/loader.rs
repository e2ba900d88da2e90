//! RON form definition loader

use crate::error::{Error, Result};
use crate::schema::FormDef;
use formstate_core::{FormBuilder, FormOptions, FormState, GroupConfig, Value};
use std::fs;
use std::path::Path;

/// A form definition converted into core types
#[derive(Debug, Clone)]
pub struct LoadedForm {
    pub config: GroupConfig,
    pub options: FormOptions,
    /// Initial form data; an empty map when the definition has none
    pub initial: Value,
}

impl LoadedForm {
    /// Replace the initial form data
    pub fn with_initial(mut self, initial: Value) -> Self {
        self.initial = initial;
        self
    }

    /// Build the state tree from the initial data
    pub fn build(self) -> formstate_core::Result<FormState> {
        FormState::build_with(self.initial, self.config, self.options)
    }

    /// Wrap the build in a [`FormBuilder`]
    pub fn builder(self) -> FormBuilder {
        FormBuilder::with_options(self.initial, self.config, self.options)
    }
}

/// Load a form definition from a RON file
pub fn load_file(path: impl AsRef<Path>) -> Result<LoadedForm> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let loaded = load_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        fields = loaded.config.fields.len(),
        "loaded form definition"
    );
    Ok(loaded)
}

/// Load a form definition from a RON string
pub fn load_str(content: &str) -> Result<LoadedForm> {
    let def: FormDef = ron::from_str(content)?;
    let config = def.to_config()?;
    let initial = match def.initial {
        Some(Value::Map(map)) => Value::Map(map),
        None | Some(Value::Null) => Value::map(),
        Some(other) => {
            return Err(Error::InvalidSchema(format!(
                "initial form data must be a map, got {}",
                other.type_name()
            )))
        }
    };
    Ok(LoadedForm {
        config,
        options: def.options,
        initial,
    })
}

/// Parse form data from JSON
pub fn load_form_json(content: &str) -> Result<Value> {
    Ok(serde_json::from_str(content)?)
}

/// Load form data from a file; `.json` files are read as JSON, others as RON
pub fn load_form_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_form_json(&content)
    } else {
        Ok(ron::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formstate_core::FieldConfig;

    const EXAMPLE: &str = r#"(
        options: (strict: false),
        fields: {
            "question1": (is_required: Some(Bool(true))),
            "question2": (is_active: Some(Expr(Gt(Field("question1"), Literal(3))))),
            "group1": (
                is_active: Some(Expr(Le(Field("question1"), Literal(3)))),
                fields: { "question3": () },
            ),
            "recurringGroup": (
                kind: Some(Recurring),
                fields: {
                    "question4": (is_required: Some(Expr(Eq(Index, Literal(0))))),
                },
            ),
        },
        initial: Some({
            "question1": 5,
            "question2": "answer",
            "group1": { "question3": [22.5] },
        }),
    )"#;

    #[test]
    fn test_load_example_definition() {
        let loaded = load_str(EXAMPLE).unwrap();
        assert_eq!(loaded.config.fields.len(), 4);
        assert!(matches!(
            loaded.config.get("recurringGroup"),
            Some(FieldConfig::Recurring(_))
        ));
        assert!(!loaded.options.strict);

        let mut state = loaded.build().unwrap();
        assert!(state.node("question1").unwrap().is_required());
        assert!(state.node("question2").unwrap().is_active());
        assert!(!state.node("group1.question3").unwrap().is_active());

        state.set_value("question1", 3i64).unwrap();
        assert!(!state.node("question2").unwrap().is_active());
        assert!(state.node("group1.question3").unwrap().is_active());
    }

    #[test]
    fn test_index_expression_from_definition() {
        let mut state = load_str(EXAMPLE).unwrap().build().unwrap();
        let element: Value = [("question4", Value::from("a"))].into_iter().collect();
        state.append("recurringGroup", element.clone()).unwrap();
        state.append("recurringGroup", element).unwrap();

        assert!(state.node("recurringGroup[0].question4").unwrap().is_required());
        assert!(!state.node("recurringGroup[1].question4").unwrap().is_required());

        state.remove("recurringGroup", 0).unwrap();
        assert!(state.node("recurringGroup[0].question4").unwrap().is_required());
    }

    #[test]
    fn test_initial_defaults_to_empty_map() {
        let loaded = load_str(r#"(fields: { "question1": () })"#).unwrap();
        assert_eq!(loaded.initial, Value::map());

        let err = load_str(r#"(initial: Some([1, 2]))"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
    }

    #[test]
    fn test_json_form_data() {
        let form =
            load_form_json(r#"{"question1": 2, "group1": {"question3": [1.5, "x"]}}"#).unwrap();
        let state = load_str(EXAMPLE).unwrap().with_initial(form).build().unwrap();
        assert!(state.node("group1").unwrap().is_active());
        assert_eq!(
            state.value("group1.question3[1]"),
            Some(&Value::from("x"))
        );
    }

    #[test]
    fn test_strict_build_through_builder() {
        let definition = r#"(options: (strict: true), fields: { "group1": (kind: Some(Group)) })"#;
        let builder = load_str(definition).unwrap().builder();
        assert!(!builder.is_usable());
        assert!(matches!(
            builder.error(),
            Some(formstate_core::Error::MissingField(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(load_str("(fields: "), Err(Error::Ron(_))));
        assert!(matches!(load_form_json("{"), Err(Error::Json(_))));
        assert!(matches!(load_file("/nonexistent/form.ron"), Err(Error::Io(_))));
    }
}
