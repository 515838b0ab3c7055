//! Expression trees
//!
//!     Every node owns its children outright (`Box`/`Vec`), so an expression is a strict
//!     tree: no sharing, no back references, and dropping the root releases everything.
//!
//!     The `Display` implementation is the canonical rendering. Binary nodes are always
//!     wrapped in parentheses, which makes the rendering independent of precedence and
//!     guarantees that parsing it again rebuilds the same tree.

use serde::Serialize;
use std::fmt;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// Binary operators, from loosest to tightest binding group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    And,
    Or,
    LessEqual,
    GreaterEqual,
    NotEqual,
    StrictEqual,
    Less,
    Greater,
    Equal,
    Concat,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Value(Scalar),
    /// A `$name` or `@macro` reference; the name keeps its sigil.
    Variable(String),
    /// A bare function name used as a value.
    FunctionReference(String),
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    Array(Vec<Expression>),
    Not(Box<Expression>),
    BinaryOperator {
        operator: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn value(value: impl Into<Scalar>) -> Self {
        Expression::Value(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expression::FunctionReference(name.into())
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    pub fn array(items: Vec<Expression>) -> Self {
        Expression::Array(items)
    }

    pub fn not(operand: Expression) -> Self {
        Expression::Not(Box::new(operand))
    }

    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOperator {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Short name of the node kind, as used by snapshots and assertions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Value(_) => "Value",
            Expression::Variable(_) => "Variable",
            Expression::FunctionReference(_) => "FunctionReference",
            Expression::FunctionCall { .. } => "FunctionCall",
            Expression::Array(_) => "Array",
            Expression::Not(_) => "Not",
            Expression::BinaryOperator { .. } => "BinaryOperator",
        }
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Value(_)
            | Expression::Variable(_)
            | Expression::FunctionReference(_) => Vec::new(),
            Expression::FunctionCall { arguments, .. } => arguments.iter().collect(),
            Expression::Array(items) => items.iter().collect(),
            Expression::Not(operand) => vec![operand.as_ref()],
            Expression::BinaryOperator { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

/// Quote a string with `"`, doubling any embedded `"`.
pub fn quote_string(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn format_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => f.write_str(&format_float(*value)),
            Scalar::Bool(true) => f.write_str("True"),
            Scalar::Bool(false) => f.write_str("False"),
            Scalar::Str(text) => f.write_str(&quote_string(text)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value(value) => write!(f, "{value}"),
            Expression::Variable(name) | Expression::FunctionReference(name) => f.write_str(name),
            Expression::FunctionCall { name, arguments } => {
                write!(f, "{name}(")?;
                write_list(f, arguments)?;
                f.write_str(")")
            }
            Expression::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Expression::Not(operand) => write!(f, "Not {operand}"),
            Expression::BinaryOperator {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
        }
    }
}
