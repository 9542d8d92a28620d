use crate::query::operator::{Arity, Operator};
use thiserror::Error;

/// Which operand of a binary operator failed a precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Instance is null")]
    NullInstance,

    #[error("Size should be {expected} for {operator} but was {actual}")]
    Arity {
        operator: Operator,
        expected: Arity,
        actual: usize,
    },

    #[error("The {side} operand of {operator} is not expected to be null")]
    NullOperand { operator: Operator, side: Side },

    #[error("The right operand of {operator} must be a list, got {found}")]
    NotIterable {
        operator: Operator,
        found: &'static str,
    },

    #[error("Cannot order {left} against {right} for {operator}")]
    Incomparable {
        operator: Operator,
        left: &'static str,
        right: &'static str,
    },

    #[error("Field not found: {path}")]
    UnknownField { path: String },

    #[error("Failed to resolve '{path}': {message}")]
    Resolution { path: String, message: String },

    #[error("Path must have at least one segment")]
    EmptyPath,

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
