//! Path resolution against concrete instances.
//!
//! The evaluator never inspects instances itself; it asks an [`Extractor`]
//! for the value behind each path node. Backends swap the extractor and keep
//! the operator semantics.

mod accessor;
mod document;

pub use accessor::AccessorExtractor;
pub use document::{DocumentExtractor, SerdeExtractor};

use crate::error::{Error, Result};
use crate::query::ast::Path;
use crate::values::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub trait Extractor<T: ?Sized> {
    /// Precondition run once per test before the tree is walked. Fails with
    /// [`Error::NullInstance`] when the instance stands for null.
    fn check_instance(&self, _instance: &T) -> Result<()> {
        Ok(())
    }

    /// Value behind `path` on `instance`. Optional wrappers come back as
    /// `Value::Null` when empty. Fails when the field is not declared.
    fn extract(&self, instance: &T, path: &Path) -> Result<Value>;
}

impl<T: ?Sized, E: Extractor<T> + ?Sized> Extractor<T> for &E {
    fn check_instance(&self, instance: &T) -> Result<()> {
        (**self).check_instance(instance)
    }

    fn extract(&self, instance: &T, path: &Path) -> Result<Value> {
        (**self).extract(instance, path)
    }
}

impl<T: ?Sized, E: Extractor<T> + ?Sized> Extractor<T> for Arc<E> {
    fn check_instance(&self, instance: &T) -> Result<()> {
        (**self).check_instance(instance)
    }

    fn extract(&self, instance: &T, path: &Path) -> Result<Value> {
        (**self).extract(instance, path)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMatching {
    #[default]
    Exact,
    CaseInsensitive,
}

impl FieldMatching {
    pub fn matches(self, declared: &str, requested: &str) -> bool {
        match self {
            FieldMatching::Exact => declared == requested,
            FieldMatching::CaseInsensitive => declared.to_lowercase() == requested.to_lowercase(),
        }
    }
}

/// Settings shared by the document based extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub field_matching: FieldMatching,
}

impl ExtractorConfig {
    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }
}

/// Walks the remaining segments of `path` through nested records.
///
/// `consumed` is the number of segments already resolved to reach `value`.
pub(crate) fn descend(
    mut value: Value,
    path: &Path,
    consumed: usize,
    matching: FieldMatching,
) -> Result<Value> {
    for (i, segment) in path.segments().iter().enumerate().skip(consumed) {
        value = match value {
            Value::Null => return Ok(Value::Null),
            Value::Record(mut fields) => {
                let key = fields
                    .keys()
                    .find(|k| matching.matches(k, segment))
                    .cloned()
                    .ok_or_else(|| unknown_field(path, i))?;
                fields.remove(&key).unwrap_or(Value::Null)
            }
            _ => return Err(unknown_field(path, i)),
        };
    }
    Ok(value)
}

pub(crate) fn unknown_field(path: &Path, index: usize) -> Error {
    Error::UnknownField {
        path: path.segments()[..=index].join("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(entries: &[(&str, Value)]) -> Value {
        Value::Record(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_config_from_yaml() {
        let config = ExtractorConfig::from_yaml("field_matching: case_insensitive").unwrap();
        assert_eq!(config.field_matching, FieldMatching::CaseInsensitive);

        let config = ExtractorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ExtractorConfig::default());

        assert!(ExtractorConfig::from_yaml("field_matching: fuzzy").is_err());
    }

    #[test]
    fn test_descend_nested() {
        let value = record(&[("address", record(&[("city", Value::from("Oslo"))]))]);
        let path = Path::parse("address.city").unwrap();
        assert_eq!(
            descend(value, &path, 0, FieldMatching::Exact).unwrap(),
            Value::from("Oslo")
        );
    }

    #[test]
    fn test_descend_through_null_is_null() {
        let value = record(&[("address", Value::Null)]);
        let path = Path::parse("address.city").unwrap();
        assert_eq!(
            descend(value, &path, 0, FieldMatching::Exact).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_descend_into_scalar_fails() {
        let value = record(&[("name", Value::from("alice"))]);
        let path = Path::parse("name.first").unwrap();
        let err = descend(value, &path, 0, FieldMatching::Exact).unwrap_err();
        assert!(matches!(err, Error::UnknownField { path } if path == "name.first"));
    }
}
