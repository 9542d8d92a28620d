use super::ast::Expression;
use super::eval::evaluate;
use crate::error::Result;
use crate::extract::{DocumentExtractor, Extractor, ExtractorConfig, SerdeExtractor};
use crate::values::Value;
use tracing::debug;

/// Single-instance boolean test.
pub trait Predicate<T: ?Sized> {
    fn test(&self, instance: &T) -> Result<bool>;
}

impl<T, F> Predicate<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> Result<bool>,
{
    fn test(&self, instance: &T) -> Result<bool> {
        self(instance)
    }
}

/// In-memory predicate over an expression.
///
/// The nil expression becomes [`Matcher::Always`], which never touches the
/// extractor or the evaluator.
#[derive(Debug, Clone)]
pub enum Matcher<E = SerdeExtractor> {
    Always,
    Evaluate { expression: Expression, extractor: E },
}

impl Matcher<SerdeExtractor> {
    pub fn of(expression: Expression) -> Self {
        Self::with_extractor(expression, SerdeExtractor::default())
    }
}

impl Matcher<DocumentExtractor> {
    pub fn for_documents(expression: Expression, config: ExtractorConfig) -> Self {
        Self::with_extractor(expression, DocumentExtractor::new(config))
    }
}

impl<E> Matcher<E> {
    pub fn with_extractor(expression: Expression, extractor: E) -> Self {
        if expression.is_nil() {
            debug!("nil expression, matching every instance");
            return Matcher::Always;
        }
        debug!(expression = %expression, "building in-memory matcher");
        Matcher::Evaluate {
            expression,
            extractor,
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Matcher::Always)
    }

    /// Matching items in input order. Stops at the first evaluation error.
    pub fn filter<'a, T, I>(&self, items: I) -> Result<Vec<&'a T>>
    where
        T: ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
        E: Extractor<T>,
    {
        let mut matched = Vec::new();
        for item in items {
            if self.test(item)? {
                matched.push(item);
            }
        }
        Ok(matched)
    }
}

impl<T, E> Predicate<T> for Matcher<E>
where
    T: ?Sized,
    E: Extractor<T>,
{
    fn test(&self, instance: &T) -> Result<bool> {
        match self {
            Matcher::Always => Ok(true),
            Matcher::Evaluate {
                expression,
                extractor,
            } => {
                extractor.check_instance(instance)?;
                Ok(evaluate(expression, instance, extractor)? == Value::Bool(true))
            }
        }
    }
}
