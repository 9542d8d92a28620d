use super::operator::Operator;
use crate::error::{Error, Result};
use crate::values::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable predicate tree.
///
/// `Nil` is the "no filter" sentinel: it matches everything and lets the
/// predicate adapter skip evaluation entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Literal(Value),
    Path(Path),
    Call(Call),
    Nil,
}

/// Callback interface over the closed set of expression nodes.
pub trait Visitor {
    type Output;

    fn visit_literal(&mut self, value: &Value) -> Self::Output;
    fn visit_path(&mut self, path: &Path) -> Self::Output;
    fn visit_call(&mut self, call: &Call) -> Self::Output;
    fn visit_nil(&mut self) -> Self::Output;
}

impl Expression {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::Literal(value) => visitor.visit_literal(value),
            Expression::Path(path) => visitor.visit_path(path),
            Expression::Call(call) => visitor.visit_call(call),
            Expression::Nil => visitor.visit_nil(),
        }
    }

    pub fn nil() -> Self {
        Expression::Nil
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Expression::Nil)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Path from a dotted name such as `"address.city"`.
    pub fn path(name: &str) -> Result<Self> {
        Path::parse(name).map(Expression::Path)
    }

    pub fn call(operator: Operator, arguments: Vec<Expression>) -> Result<Self> {
        Call::new(operator, arguments).map(Expression::Call)
    }

    pub fn and(arguments: Vec<Expression>) -> Result<Self> {
        Self::call(Operator::And, arguments)
    }

    pub fn or(arguments: Vec<Expression>) -> Result<Self> {
        Self::call(Operator::Or, arguments)
    }

    pub fn equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::Equal, left, right)
    }

    pub fn not_equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::NotEqual, left, right)
    }

    pub fn is_in(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::In, left, right)
    }

    pub fn not_in(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::NotIn, left, right)
    }

    pub fn greater_than(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::GreaterThan, left, right)
    }

    pub fn greater_than_or_equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::GreaterThanOrEqual, left, right)
    }

    pub fn less_than(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::LessThan, left, right)
    }

    pub fn less_than_or_equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::LessThanOrEqual, left, right)
    }

    pub fn is_present(operand: Expression) -> Self {
        Expression::Call(Call {
            operator: Operator::IsPresent,
            arguments: vec![operand],
        })
    }

    pub fn is_absent(operand: Expression) -> Self {
        Expression::Call(Call {
            operator: Operator::IsAbsent,
            arguments: vec![operand],
        })
    }

    fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::Call(Call {
            operator,
            arguments: vec![left, right],
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{value:?}"),
            Expression::Path(path) => write!(f, "{path}"),
            Expression::Call(call) => {
                write!(f, "{}(", call.operator)?;
                for (i, arg) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expression::Nil => f.write_str("NIL"),
        }
    }
}

/// Field reference, one segment per nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn new(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::EmptyPath);
        }
        Ok(Self { segments })
    }

    pub fn parse(dotted: &str) -> Result<Self> {
        if dotted.is_empty() {
            return Err(Error::EmptyPath);
        }
        Self::new(dotted.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl TryFrom<Vec<String>> for Path {
    type Error = Error;

    fn try_from(segments: Vec<String>) -> Result<Self> {
        Path::new(segments)
    }
}

impl From<Path> for Vec<String> {
    fn from(path: Path) -> Self {
        path.segments
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Operator application. Arity is checked by [`Call::new`]; trees that
/// arrive through deserialization are checked again during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    operator: Operator,
    arguments: Vec<Expression>,
}

impl Call {
    pub fn new(operator: Operator, arguments: Vec<Expression>) -> Result<Self> {
        let expected = operator.arity();
        if !expected.accepts(arguments.len()) {
            return Err(Error::Arity {
                operator,
                expected,
                actual: arguments.len(),
            });
        }
        Ok(Self {
            operator,
            arguments,
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }
}
