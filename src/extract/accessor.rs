use super::{descend, unknown_field, Extractor, FieldMatching};
use crate::error::Result;
use crate::query::ast::Path;
use crate::values::Value;
use std::collections::HashMap;
use std::fmt;

type Accessor<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;

/// Extractor backed by explicitly registered accessor functions.
///
/// Nested segments after the first are resolved inside the record the
/// accessor returns.
pub struct AccessorExtractor<T> {
    accessors: HashMap<String, Accessor<T>>,
}

impl<T> AccessorExtractor<T> {
    pub fn new() -> Self {
        Self {
            accessors: HashMap::new(),
        }
    }

    pub fn with<F, V>(mut self, name: &str, accessor: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value> + 'static,
    {
        self.accessors
            .insert(name.to_string(), Box::new(move |t: &T| accessor(t).into()));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }
}

impl<T> Default for AccessorExtractor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AccessorExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.fields().collect();
        fields.sort_unstable();
        f.debug_struct("AccessorExtractor")
            .field("fields", &fields)
            .finish()
    }
}

impl<T> Extractor<T> for AccessorExtractor<T> {
    fn extract(&self, instance: &T, path: &Path) -> Result<Value> {
        let head = &path.segments()[0];
        let accessor = self
            .accessors
            .get(head)
            .ok_or_else(|| unknown_field(path, 0))?;
        descend(accessor(instance), path, 1, FieldMatching::Exact)
    }
}
