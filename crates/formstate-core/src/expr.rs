//! Expression engine for declarative rules
//!
//! Expressions are loaded from RON form definitions and evaluated against
//! the current form state whenever the tree refreshes.

use crate::path::FieldPath;
use crate::view::{FormView, NodeRef};
use crate::{Error, NodeId, Result, Value};
use serde::{Deserialize, Serialize};

/// An expression that can be evaluated to produce a Value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    // === Literals ===
    /// A literal value
    Literal(Value),

    // === Form Access ===
    /// Value at an absolute path (null when absent)
    Field(String),
    /// Value at a path relative to the current recurring instance
    Local(String),
    /// Whether the node at a path is active
    IsActive(String),
    /// Whether the node at a path is required
    IsRequired(String),
    /// Index of the current recurring instance (null outside one)
    Index,
    /// Length of the list, map or string at a path (0 when absent)
    Len(String),

    // === Arithmetic ===
    /// Add two expressions
    Add(Box<Expr>, Box<Expr>),
    /// Subtract second from first
    Sub(Box<Expr>, Box<Expr>),
    /// Multiply two expressions
    Mul(Box<Expr>, Box<Expr>),
    /// Divide first by second
    Div(Box<Expr>, Box<Expr>),
    /// Modulo
    Mod(Box<Expr>, Box<Expr>),
    /// Negate a numeric value
    Neg(Box<Expr>),
    /// Absolute value
    Abs(Box<Expr>),
    /// Minimum of two values
    Min(Box<Expr>, Box<Expr>),
    /// Maximum of two values
    Max(Box<Expr>, Box<Expr>),

    // === Comparison ===
    /// Equal
    Eq(Box<Expr>, Box<Expr>),
    /// Not equal
    Ne(Box<Expr>, Box<Expr>),
    /// Less than
    Lt(Box<Expr>, Box<Expr>),
    /// Less than or equal
    Le(Box<Expr>, Box<Expr>),
    /// Greater than
    Gt(Box<Expr>, Box<Expr>),
    /// Greater than or equal
    Ge(Box<Expr>, Box<Expr>),

    // === Logical ===
    /// Logical AND (all must be true)
    And(Vec<Expr>),
    /// Logical OR (at least one must be true)
    Or(Vec<Expr>),
    /// Logical NOT
    Not(Box<Expr>),
    /// If-then-else
    If(Box<Expr>, Box<Expr>, Box<Expr>),

    // === Collections ===
    /// First operand (list or string) contains the second
    Contains(Box<Expr>, Box<Expr>),
    /// Null, empty string, empty list or empty map
    IsEmpty(Box<Expr>),
}

/// Context for evaluating expressions
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// The form state the rule is evaluated against
    pub view: FormView<'a>,
    /// Index of the recurring instance the rule is evaluated for
    pub index: Option<usize>,
    /// The recurring instance node itself
    pub scope: Option<NodeId>,
}

impl<'a> EvalContext<'a> {
    /// Create a new evaluation context
    pub fn new(view: FormView<'a>) -> Self {
        Self {
            view,
            index: None,
            scope: None,
        }
    }

    /// Set the recurring instance
    pub fn with_instance(mut self, index: usize, scope: NodeId) -> Self {
        self.index = Some(index);
        self.scope = Some(scope);
        self
    }

    fn node(&self, path: &str) -> Result<NodeRef<'a>> {
        self.view
            .node(path)
            .ok_or_else(|| Error::NodeNotFound(path.to_string()))
    }

    fn local_path(&self, path: &str) -> Result<FieldPath> {
        let scope = self.scope.ok_or_else(|| {
            Error::EvaluationError(format!("Local({}) outside a recurring group", path))
        })?;
        let base = self.view.node_by_id(scope).map(|n| n.field_path()).ok_or_else(|| {
            Error::NodeNotFound(scope.to_string())
        })?;
        Ok(base.concat(&FieldPath::parse(path)?))
    }
}

impl Expr {
    /// Evaluate this expression in the given context
    pub fn eval(&self, ctx: &EvalContext) -> Result<Value> {
        match self {
            // Literals
            Expr::Literal(v) => Ok(v.clone()),

            // Form access
            Expr::Field(path) => {
                let path = FieldPath::parse(path)?;
                Ok(ctx.view.form().get_path(&path).cloned().unwrap_or(Value::Null))
            }
            Expr::Local(path) => {
                let path = ctx.local_path(path)?;
                Ok(ctx.view.form().get_path(&path).cloned().unwrap_or(Value::Null))
            }
            Expr::IsActive(path) => Ok(Value::Bool(ctx.node(path)?.is_active())),
            Expr::IsRequired(path) => Ok(Value::Bool(ctx.node(path)?.is_required())),
            Expr::Index => Ok(ctx.index.map_or(Value::Null, |i| Value::Int(i as i64))),
            Expr::Len(path) => {
                let path = FieldPath::parse(path)?;
                let len = match ctx.view.form().get_path(&path) {
                    Some(Value::List(list)) => list.len(),
                    Some(Value::Map(map)) => map.len(),
                    Some(Value::String(s)) => s.chars().count(),
                    _ => 0,
                };
                Ok(Value::Int(len as i64))
            }

            // Arithmetic
            Expr::Add(a, b) => numeric_op(&a.eval(ctx)?, &b.eval(ctx)?, |x, y| x + y),
            Expr::Sub(a, b) => numeric_op(&a.eval(ctx)?, &b.eval(ctx)?, |x, y| x - y),
            Expr::Mul(a, b) => numeric_op(&a.eval(ctx)?, &b.eval(ctx)?, |x, y| x * y),
            Expr::Div(a, b) => {
                let va = a.eval(ctx)?;
                let vb = b.eval(ctx)?;
                if as_number(&vb)? == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                numeric_op(&va, &vb, |x, y| x / y)
            }
            Expr::Mod(a, b) => {
                let va = a.eval(ctx)?;
                let vb = b.eval(ctx)?;
                if as_number(&vb)? == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                numeric_op(&va, &vb, |x, y| x % y)
            }
            Expr::Neg(a) => Ok(Value::Float(-as_number(&a.eval(ctx)?)?)),
            Expr::Abs(a) => Ok(Value::Float(as_number(&a.eval(ctx)?)?.abs())),
            Expr::Min(a, b) => numeric_op(&a.eval(ctx)?, &b.eval(ctx)?, f64::min),
            Expr::Max(a, b) => numeric_op(&a.eval(ctx)?, &b.eval(ctx)?, f64::max),

            // Comparison
            Expr::Eq(a, b) => Ok(Value::Bool(values_equal(&a.eval(ctx)?, &b.eval(ctx)?))),
            Expr::Ne(a, b) => Ok(Value::Bool(!values_equal(&a.eval(ctx)?, &b.eval(ctx)?))),
            Expr::Lt(a, b) => compare_values(&a.eval(ctx)?, &b.eval(ctx)?, |x, y| x < y),
            Expr::Le(a, b) => compare_values(&a.eval(ctx)?, &b.eval(ctx)?, |x, y| x <= y),
            Expr::Gt(a, b) => compare_values(&a.eval(ctx)?, &b.eval(ctx)?, |x, y| x > y),
            Expr::Ge(a, b) => compare_values(&a.eval(ctx)?, &b.eval(ctx)?, |x, y| x >= y),

            // Logical
            Expr::And(exprs) => {
                for expr in exprs {
                    if !expr.eval(ctx)?.is_truthy() {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
            Expr::Or(exprs) => {
                for expr in exprs {
                    if expr.eval(ctx)?.is_truthy() {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Expr::Not(a) => Ok(Value::Bool(!a.eval(ctx)?.is_truthy())),
            Expr::If(cond, then_expr, else_expr) => {
                if cond.eval(ctx)?.is_truthy() {
                    then_expr.eval(ctx)
                } else {
                    else_expr.eval(ctx)
                }
            }

            // Collections
            Expr::Contains(haystack, needle) => {
                let haystack = haystack.eval(ctx)?;
                let needle = needle.eval(ctx)?;
                match (&haystack, &needle) {
                    (Value::List(list), _) => {
                        Ok(Value::Bool(list.iter().any(|v| values_equal(v, &needle))))
                    }
                    (Value::String(s), Value::String(sub)) => {
                        Ok(Value::Bool(s.contains(sub.as_str())))
                    }
                    (Value::Null, _) => Ok(Value::Bool(false)),
                    _ => Err(Error::type_error("list or string", haystack.type_name())),
                }
            }
            Expr::IsEmpty(a) => Ok(Value::Bool(match a.eval(ctx)? {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::List(list) => list.is_empty(),
                Value::Map(map) => map.is_empty(),
                _ => false,
            })),
        }
    }

    /// Create a literal expression
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Create an absolute field access expression
    pub fn field(path: impl Into<String>) -> Self {
        Expr::Field(path.into())
    }

    /// Create an instance-relative field access expression
    pub fn local(path: impl Into<String>) -> Self {
        Expr::Local(path.into())
    }
}

fn as_number(v: &Value) -> Result<f64> {
    v.as_float()
        .ok_or_else(|| Error::type_error("number", v.type_name()))
}

/// Helper to perform numeric operations
fn numeric_op(a: &Value, b: &Value, op: fn(f64, f64) -> f64) -> Result<Value> {
    Ok(Value::Float(op(as_number(a)?, as_number(b)?)))
}

/// Helper to compare values
fn compare_values(a: &Value, b: &Value, cmp: fn(f64, f64) -> bool) -> Result<Value> {
    Ok(Value::Bool(cmp(as_number(a)?, as_number(b)?)))
}

/// Check if two values are equal, treating ints and floats as numbers
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
            (*x as f64 - y).abs() < f64::EPSILON
        }
        (Value::Float(x), Value::Float(y)) => (x - y).abs() < f64::EPSILON,
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        _ => a == b,
    }
}
