//! Backend-agnostic predicate expressions and an in-memory evaluator.
//!
//! An [`Expression`] tree is built elsewhere, handed to [`Matcher::of`], and
//! tested against instances one at a time:
//!
//! ```
//! use criteria_eval::{Expression, Matcher, Predicate};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//!     age: i64,
//! }
//!
//! let expr = Expression::and(vec![
//!     Expression::equal(Expression::path("name")?, Expression::literal("alice")),
//!     Expression::greater_than(Expression::path("age")?, Expression::literal(18)),
//! ])?;
//! let matcher = Matcher::of(expr);
//! assert!(matcher.test(&User { name: "alice".into(), age: 30 })?);
//! # Ok::<(), criteria_eval::Error>(())
//! ```

pub mod error;
pub mod extract;
pub mod query;
pub mod values;

pub use error::{Error, Result};
pub use extract::{AccessorExtractor, DocumentExtractor, Extractor, ExtractorConfig, SerdeExtractor};
pub use query::{evaluate, Expression, Matcher, Operator, Path, Predicate};
pub use values::{Date, Value};
