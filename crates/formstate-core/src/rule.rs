//! Rules and the store that maps shape paths to them

use crate::expr::EvalContext;
use crate::view::FormView;
use crate::{Expr, NodeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Consumer-authored predicate over the whole form and the instance index
///
/// The index is `None` when the node is not inside a recurring group.
pub type Predicate = Arc<dyn Fn(&FormView<'_>, Option<usize>) -> bool + Send + Sync>;

/// A node's own (non-inherited) activity or requiredness rule
#[derive(Clone)]
pub enum Rule {
    /// Constant outcome
    Const(bool),
    /// Native predicate
    When(Predicate),
    /// Declarative expression, decided by truthiness
    Expr(Expr),
}

impl Rule {
    /// Wrap a closure as a rule
    pub fn when<F>(f: F) -> Self
    where
        F: Fn(&FormView<'_>, Option<usize>) -> bool + Send + Sync + 'static,
    {
        Rule::When(Arc::new(f))
    }

    /// Evaluate this rule for one node
    ///
    /// Expression errors make the rule fail; they are logged, never raised.
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        match self {
            Rule::Const(b) => *b,
            Rule::When(f) => f(&ctx.view, ctx.index),
            Rule::Expr(expr) => match expr.eval(ctx) {
                Ok(v) => v.is_truthy(),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        index = ?ctx.index,
                        "rule expression failed, treating as false"
                    );
                    false
                }
            },
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Const(b) => f.debug_tuple("Const").field(b).finish(),
            Rule::When(_) => f.write_str("When(<predicate>)"),
            Rule::Expr(expr) => f.debug_tuple("Expr").field(expr).finish(),
        }
    }
}

impl From<bool> for Rule {
    fn from(b: bool) -> Self {
        Rule::Const(b)
    }
}

impl From<Expr> for Rule {
    fn from(expr: Expr) -> Self {
        Rule::Expr(expr)
    }
}

/// The activity and requiredness rules registered for one shape path
#[derive(Debug, Clone)]
pub struct RulePair {
    pub is_active: Rule,
    pub is_required: Rule,
}

impl RulePair {
    /// Normalize optional declarations; absent means the default
    pub fn new(is_active: Option<Rule>, is_required: Option<Rule>) -> Self {
        let default = Self::default();
        Self {
            is_active: is_active.unwrap_or(default.is_active),
            is_required: is_required.unwrap_or(default.is_required),
        }
    }
}

impl Default for RulePair {
    /// Active, not required
    fn default() -> Self {
        Self {
            is_active: Rule::Const(true),
            is_required: Rule::Const(false),
        }
    }
}

/// Rules keyed by shape path, one store per state tree
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: HashMap<String, RulePair>,
}

impl RuleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pair` under `shape`, replacing any earlier entry
    pub fn register(&mut self, shape: impl Into<String>, pair: RulePair) -> Option<RulePair> {
        self.rules.insert(shape.into(), pair)
    }

    /// Replace only the activity rule under `shape`
    pub fn set_active(&mut self, shape: impl Into<String>, rule: Rule) {
        self.rules.entry(shape.into()).or_default().is_active = rule;
    }

    /// Replace only the requiredness rule under `shape`
    pub fn set_required(&mut self, shape: impl Into<String>, rule: Rule) {
        self.rules.entry(shape.into()).or_default().is_required = rule;
    }

    /// The pair registered under `shape`, or the default pair
    pub fn resolve(&self, shape: &str) -> RulePair {
        self.rules.get(shape).cloned().unwrap_or_default()
    }

    /// Check if a pair is registered under `shape`
    pub fn contains(&self, shape: &str) -> bool {
        self.rules.contains_key(shape)
    }

    /// Number of registered shape paths
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate the own rules registered for `shape`
    ///
    /// Returns `(active, required)`. The activity rule is skipped when
    /// `inherited_active` is false, the requiredness rule when
    /// `inherited_required` is true.
    pub(crate) fn evaluate(
        &self,
        shape: &str,
        view: FormView<'_>,
        instance: Option<(usize, NodeId)>,
        inherited_active: bool,
        inherited_required: bool,
    ) -> (bool, bool) {
        let pair = self.resolve(shape);
        let mut ctx = EvalContext::new(view);
        if let Some((index, scope)) = instance {
            ctx = ctx.with_instance(index, scope);
        }
        let active = inherited_active && pair.is_active.evaluate(&ctx);
        let required = inherited_required || pair.is_required.evaluate(&ctx);
        (active, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_without_registering() {
        let store = RuleStore::new();
        let pair = store.resolve("question1");
        assert!(matches!(pair.is_active, Rule::Const(true)));
        assert!(matches!(pair.is_required, Rule::Const(false)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_register_overwrites() {
        let mut store = RuleStore::new();
        store.register("a", RulePair::new(Some(Rule::Const(false)), None));
        let previous = store.register("a", RulePair::new(None, Some(Rule::Const(true))));

        assert!(previous.is_some());
        assert_eq!(store.len(), 1);
        let pair = store.resolve("a");
        assert!(matches!(pair.is_active, Rule::Const(true)));
        assert!(matches!(pair.is_required, Rule::Const(true)));
    }

    #[test]
    fn test_set_active_keeps_required() {
        let mut store = RuleStore::new();
        store.register("a", RulePair::new(None, Some(Rule::Const(true))));
        store.set_active("a", Rule::when(|_, index| index == Some(0)));

        let pair = store.resolve("a");
        assert!(matches!(pair.is_active, Rule::When(_)));
        assert!(matches!(pair.is_required, Rule::Const(true)));
    }

    #[test]
    fn test_rule_debug() {
        assert_eq!(format!("{:?}", Rule::Const(true)), "Const(true)");
        assert_eq!(format!("{:?}", Rule::when(|_, _| true)), "When(<predicate>)");
    }
}
