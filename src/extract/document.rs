use super::{unknown_field, Extractor, ExtractorConfig, FieldMatching};
use crate::error::{Error, Result};
use crate::query::ast::Path;
use crate::values::{yaml_key, Value};
use serde::Serialize;
use serde_yaml::Value as YamlValue;
use tracing::trace;

/// Resolves paths on YAML documents such as parsed front matter. Unquoted
/// `YYYY-MM-DD` strings are read as dates.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    config: ExtractorConfig,
}

impl DocumentExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl Extractor<YamlValue> for DocumentExtractor {
    fn check_instance(&self, instance: &YamlValue) -> Result<()> {
        non_null(instance)
    }

    fn extract(&self, instance: &YamlValue, path: &Path) -> Result<Value> {
        non_null(instance)?;
        let leaf = resolve(instance, path, self.config.field_matching)?;
        Ok(leaf.map_or(Value::Null, Value::from_front_matter))
    }
}

/// Default extractor: reads fields through the instance's `Serialize` impl,
/// so every serialized field is reachable regardless of visibility.
///
/// Strings are never reinterpreted; only [`crate::Date`] fields come back as
/// dates.
#[derive(Debug, Clone, Default)]
pub struct SerdeExtractor {
    config: ExtractorConfig,
}

impl SerdeExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl<T: Serialize + ?Sized> Extractor<T> for SerdeExtractor {
    fn check_instance(&self, instance: &T) -> Result<()> {
        non_null(&to_document(instance, "$")?)
    }

    fn extract(&self, instance: &T, path: &Path) -> Result<Value> {
        let doc = to_document(instance, &path.to_string())?;
        non_null(&doc)?;
        let leaf = resolve(&doc, path, self.config.field_matching)?;
        Ok(leaf.map_or(Value::Null, Value::from_yaml))
    }
}

fn to_document<T: Serialize + ?Sized>(instance: &T, path: &str) -> Result<YamlValue> {
    serde_yaml::to_value(instance).map_err(|e| Error::Resolution {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn non_null(doc: &YamlValue) -> Result<()> {
    if untag(doc).is_null() {
        return Err(Error::NullInstance);
    }
    Ok(())
}

/// Node behind `path`, or `None` when a null sits on the way.
fn resolve<'a>(
    doc: &'a YamlValue,
    path: &Path,
    matching: FieldMatching,
) -> Result<Option<&'a YamlValue>> {
    trace!(path = %path, "resolving field");
    let mut current = doc;
    for (i, segment) in path.segments().iter().enumerate() {
        current = match untag(current) {
            YamlValue::Null => return Ok(None),
            YamlValue::Mapping(mapping) => mapping
                .iter()
                .find(|(k, _)| yaml_key(k).is_some_and(|k| matching.matches(&k, segment)))
                .map(|(_, v)| v)
                .ok_or_else(|| unknown_field(path, i))?,
            _ => return Err(unknown_field(path, i)),
        };
    }
    Ok(Some(current))
}

fn untag(v: &YamlValue) -> &YamlValue {
    match v {
        YamlValue::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}
