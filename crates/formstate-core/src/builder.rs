//! Consumer entry point wrapping a build

use crate::config::{FormOptions, GroupConfig};
use crate::{Error, FormState, Result, Value};

#[derive(Debug)]
enum Built {
    Ready(FormState),
    Unusable {
        form: Value,
        config: GroupConfig,
        error: Error,
    },
}

/// Builds a form state and keeps it together with its configuration
///
/// A failed build is logged and leaves the builder unusable instead of
/// returning the error: `state()` is `None` and `error()` holds the cause.
#[derive(Debug)]
pub struct FormBuilder {
    built: Built,
}

impl FormBuilder {
    /// Build with default options
    pub fn new(form: impl Into<Value>, config: GroupConfig) -> Self {
        Self::with_options(form, config, FormOptions::default())
    }

    /// Build with explicit options
    pub fn with_options(form: impl Into<Value>, config: GroupConfig, options: FormOptions) -> Self {
        let form = form.into();
        let fallback = (form.clone(), config.clone());
        let built = match FormState::build_with(form, config, options) {
            Ok(state) => Built::Ready(state),
            Err(error) => {
                tracing::error!(%error, "failed to build form state");
                let (form, config) = fallback;
                Built::Unusable {
                    form,
                    config,
                    error,
                }
            }
        };
        Self { built }
    }

    /// The state tree, if the build succeeded
    pub fn state(&self) -> Option<&FormState> {
        match &self.built {
            Built::Ready(state) => Some(state),
            Built::Unusable { .. } => None,
        }
    }

    /// Mutable access to the state tree, if the build succeeded
    pub fn state_mut(&mut self) -> Option<&mut FormState> {
        match &mut self.built {
            Built::Ready(state) => Some(state),
            Built::Unusable { .. } => None,
        }
    }

    /// The configuration the state was built from
    pub fn configurator(&self) -> &GroupConfig {
        match &self.built {
            Built::Ready(state) => state.config(),
            Built::Unusable { config, .. } => config,
        }
    }

    /// The form data; as given when the build failed
    pub fn form(&self) -> &Value {
        match &self.built {
            Built::Ready(state) => state.form(),
            Built::Unusable { form, .. } => form,
        }
    }

    /// Why the build failed
    pub fn error(&self) -> Option<&Error> {
        match &self.built {
            Built::Ready(_) => None,
            Built::Unusable { error, .. } => Some(error),
        }
    }

    /// Whether the build succeeded
    pub fn is_usable(&self) -> bool {
        matches!(self.built, Built::Ready(_))
    }

    /// Take the state tree, or the build error
    pub fn into_state(self) -> Result<FormState> {
        match self.built {
            Built::Ready(state) => Ok(state),
            Built::Unusable { error, .. } => Err(error),
        }
    }
}
