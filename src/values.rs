use serde::de::{self, EnumAccess, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value as YamlValue;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Runtime value produced by literals and path lookups.
///
/// `Null` is the only representation of absence: optional wrappers are
/// flattened into `Null` or their inner value before they reach the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(Date),
    String(String),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

/// Structural equality. Floats compare by bit pattern with every NaN equal
/// to every other NaN, so `0.0 != -0.0`.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => {
                a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
            }
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Date(_) => "date",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Natural ordering between two values of the same kind.
    ///
    /// Floats use `total_cmp`: `-0.0 < 0.0` and NaN sorts above every number.
    /// Returns `None` for mismatched kinds, for lists, records and nulls.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Converts a YAML node into a value without reinterpreting strings.
    /// Only nodes tagged `!Date` (how [`Date`] serializes) become dates.
    ///
    /// Mapping entries whose key is a sequence, mapping or null are skipped:
    /// no path segment can name them.
    pub fn from_yaml(v: &YamlValue) -> Value {
        convert(v, false)
    }

    /// Like [`Value::from_yaml`], but plain strings shaped like `YYYY-MM-DD`
    /// also become dates, as front matter writes them unquoted.
    pub fn from_front_matter(v: &YamlValue) -> Value {
        convert(v, true)
    }
}

const DATE_TAG: &str = "Date";

fn convert(v: &YamlValue, date_strings: bool) -> Value {
    match v {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        YamlValue::String(s) if date_strings => match s.parse::<Date>() {
            Ok(d) => Value::Date(d),
            Err(_) => Value::String(s.clone()),
        },
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => {
            Value::List(items.iter().map(|item| convert(item, date_strings)).collect())
        }
        YamlValue::Mapping(mapping) => Value::Record(
            mapping
                .iter()
                .filter_map(|(k, v)| Some((yaml_key(k)?, convert(v, date_strings))))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => {
            let date = match &tagged.value {
                YamlValue::String(s) if is_date_tag(&tagged.tag) => s.parse::<Date>().ok(),
                _ => None,
            };
            match date {
                Some(d) => Value::Date(d),
                None => convert(&tagged.value, date_strings),
            }
        }
    }
}

fn is_date_tag(tag: &serde_yaml::value::Tag) -> bool {
    tag.to_string().trim_start_matches('!') == DATE_TAG
}

/// Mapping key as a path segment. Scalars only.
pub(crate) fn yaml_key(k: &YamlValue) -> Option<String> {
    match k {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Calendar date, ordered by year, then month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDateError(String);

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date '{}', expected YYYY-MM-DD", self.0)
    }
}

impl std::error::Error for ParseDateError {}

impl FromStr for Date {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDateError(s.to_string());
        let parts: Vec<&str> = s.split('-').collect();
        let &[year, month, day] = parts.as_slice() else {
            return Err(err());
        };
        let digits = |p: &str, len: usize| p.len() == len && p.bytes().all(|b| b.is_ascii_digit());
        if !digits(year, 4) || !digits(month, 2) || !digits(day, 2) {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        let day: u8 = day.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(err());
        }
        Ok(Date::new(year, month, day))
    }
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Serialized as a `Date` newtype variant, which YAML renders as
/// `!Date 2024-05-01`. The tag keeps dates apart from strings that merely
/// look like one.
impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_variant(DATE_TAG, 0, DATE_TAG, &self.to_string())
    }
}

struct DateVisitor;

impl<'de> Visitor<'de> for DateVisitor {
    type Value = Date;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YYYY-MM-DD date")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Date, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Date, A::Error> {
        let (tag, variant): (String, _) = data.variant()?;
        if tag != DATE_TAG {
            return Err(de::Error::custom(format!("unexpected tag '{tag}'")));
        }
        let s: String = variant.newtype_variant()?;
        s.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::from_str;

    #[test]
    fn test_from_yaml_scalars() {
        let doc: YamlValue = from_str("{name: alice, age: 30, score: 1.5, admin: false}").unwrap();
        let Value::Record(fields) = Value::from_yaml(&doc) else {
            panic!("expected record");
        };
        assert_eq!(fields["name"], Value::from("alice"));
        assert_eq!(fields["age"], Value::Int(30));
        assert_eq!(fields["score"], Value::Float(1.5));
        assert_eq!(fields["admin"], Value::Bool(false));
    }

    #[test]
    fn test_front_matter_reads_date_strings() {
        let doc: YamlValue = from_str("2024-03-09").unwrap();
        assert_eq!(Value::from_front_matter(&doc), Value::Date(Date::new(2024, 3, 9)));

        let doc: YamlValue = from_str("\"2024-3-9\"").unwrap();
        assert_eq!(Value::from_front_matter(&doc), Value::from("2024-3-9"));
    }

    #[test]
    fn test_from_yaml_keeps_date_shaped_strings() {
        let doc: YamlValue = from_str("{code: 2024-05-01}").unwrap();
        let Value::Record(fields) = Value::from_yaml(&doc) else {
            panic!("expected record");
        };
        assert_eq!(fields["code"], Value::from("2024-05-01"));
    }

    #[test]
    fn test_serialized_date_is_tagged() {
        let doc = serde_yaml::to_value(Date::new(2024, 5, 1)).unwrap();
        assert!(matches!(doc, YamlValue::Tagged(_)));
        assert_eq!(Value::from_yaml(&doc), Value::Date(Date::new(2024, 5, 1)));

        let back: Date = serde_yaml::from_value(doc).unwrap();
        assert_eq!(back, Date::new(2024, 5, 1));
    }

    #[test]
    fn test_skips_non_scalar_keys() {
        let doc: YamlValue = from_str("? [a, b]\n: 1\n7: seven\nname: x").unwrap();
        let Value::Record(fields) = Value::from_yaml(&doc) else {
            panic!("expected record");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["7"], Value::from("seven"));
    }

    #[test]
    fn test_float_equality_by_bits() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(Value::Float(1.5), Value::Float(1.5));
        assert_eq!(
            Value::List(vec![Value::Float(f64::NAN)]),
            Value::List(vec![Value::Float(f64::NAN)])
        );
    }

    #[test]
    fn test_option_flattens_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_compare_same_kind_only() {
        assert_eq!(Value::Int(1).compare(&Value::Int(2)), Some(Ordering::Less));
        assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::Int(1).compare(&Value::Float(1.0)), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(
            Value::Float(f64::NAN).compare(&Value::Float(1.0)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Float(-0.0).compare(&Value::Float(0.0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_date_ordering_is_lexicographic() {
        let a = Date::new(2023, 12, 31);
        let b = Date::new(2024, 1, 1);
        assert!(a < b);
        assert!(Date::new(2024, 2, 1) > Date::new(2024, 1, 31));
    }

    #[test]
    fn test_date_parse_rejects_garbage() {
        assert!("2024-13-01".parse::<Date>().is_err());
        assert!("not-a-date".parse::<Date>().is_err());
        assert!("2024-01".parse::<Date>().is_err());
        assert!("2024-02-31".parse::<Date>().is_err());
        assert!("2023-02-29".parse::<Date>().is_err());
        assert!("2024-04-31".parse::<Date>().is_err());
        assert!("+123-01-01".parse::<Date>().is_err());
        assert_eq!("2024-02-29".parse::<Date>(), Ok(Date::new(2024, 2, 29)));
    }

    #[test]
    fn test_untagged_roundtrip_keeps_date() {
        let v: Value = from_str("[1, 2.5, 2024-01-02, hello, null]").unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Date(Date::new(2024, 1, 2)),
                Value::from("hello"),
                Value::Null,
            ])
        );
    }
}
