pub mod ast;
pub mod eval;
pub mod operator;
pub mod predicate;

pub use ast::{Call, Expression, Path, Visitor};
pub use eval::{evaluate, Evaluator};
pub use operator::{Arity, Category, Operator};
pub use predicate::{Matcher, Predicate};
