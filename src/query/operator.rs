use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equal,
    NotEqual,
    In,
    NotIn,
    IsAbsent,
    IsPresent,
    And,
    Or,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// Number of arguments an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Equality,
    Membership,
    Presence,
    Logical,
    Ordering,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::In,
        Operator::NotIn,
        Operator::IsAbsent,
        Operator::IsPresent,
        Operator::And,
        Operator::Or,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
    ];

    pub fn category(self) -> Category {
        match self {
            Operator::Equal | Operator::NotEqual => Category::Equality,
            Operator::In | Operator::NotIn => Category::Membership,
            Operator::IsAbsent | Operator::IsPresent => Category::Presence,
            Operator::And | Operator::Or => Category::Logical,
            Operator::GreaterThan
            | Operator::GreaterThanOrEqual
            | Operator::LessThan
            | Operator::LessThanOrEqual => Category::Ordering,
        }
    }

    pub fn arity(self) -> Arity {
        match self.category() {
            Category::Presence => Arity::Exactly(1),
            Category::Logical => Arity::AtLeast(1),
            Category::Equality | Category::Membership | Category::Ordering => Arity::Exactly(2),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Equal => "EQUAL",
            Operator::NotEqual => "NOT_EQUAL",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::IsAbsent => "IS_ABSENT",
            Operator::IsPresent => "IS_PRESENT",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Operator::LessThan => "LESS_THAN",
            Operator::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_table() {
        for op in Operator::ALL {
            let expected = match op {
                Operator::IsAbsent | Operator::IsPresent => Arity::Exactly(1),
                Operator::And | Operator::Or => Arity::AtLeast(1),
                _ => Arity::Exactly(2),
            };
            assert_eq!(op.arity(), expected, "{op}");
        }
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exactly(2).accepts(2));
        assert!(!Arity::Exactly(2).accepts(1));
        assert!(!Arity::Exactly(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
    }

    #[test]
    fn test_serde_name_matches_display() {
        for op in Operator::ALL {
            let yaml = serde_yaml::to_string(&op).unwrap();
            assert_eq!(yaml.trim(), op.name());
        }
    }
}
