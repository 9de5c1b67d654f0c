//! Property values and the ordered property map carried by every event.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// Ordered map of property name to value. Keys are unique; insertion order is kept.
pub type Properties = IndexMap<String, PropertyValue>;

/// A loosely-typed scalar property value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer that does not fit `i64`.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
}

impl PropertyValue {
    /// Borrow the text value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, if this is an integer that fits `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            PropertyValue::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::UInt(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

impl From<&String> for PropertyValue {
    fn from(v: &String) -> Self {
        PropertyValue::Str(v.clone())
    }
}

impl From<Cow<'_, str>> for PropertyValue {
    fn from(v: Cow<'_, str>) -> Self {
        PropertyValue::Str(v.into_owned())
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float(f64::from(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<u64> for PropertyValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => PropertyValue::Int(v),
            Err(_) => PropertyValue::UInt(v),
        }
    }
}

impl From<usize> for PropertyValue {
    fn from(v: usize) -> Self {
        PropertyValue::from(v as u64)
    }
}

macro_rules! from_lossless {
    ($($t:ty),*) => {
        $(impl From<$t> for PropertyValue {
            fn from(v: $t) -> Self {
                PropertyValue::Int(i64::from(v))
            }
        })*
    };
}

from_lossless!(i8, i16, i32, i64, u8, u16, u32);

/// Upper-case the first character of `key`, leaving the rest untouched.
///
/// Only ASCII letters are changed, so the transform is locale-independent and
/// never alters the byte length of the key. Keys that are already PascalCase
/// are borrowed without allocating.
pub fn pascal_case(key: &str) -> Cow<'_, str> {
    match key.as_bytes().first() {
        Some(b) if b.is_ascii_lowercase() => {
            let mut owned = key.to_string();
            owned[..1].make_ascii_uppercase();
            Cow::Owned(owned)
        }
        _ => Cow::Borrowed(key),
    }
}

/// Merge event properties with call-site extras into a fresh map.
///
/// Every key is PascalCased. Event properties are written first, extras
/// second, so an extra wins over an event property that normalizes to the
/// same key. Neither input is modified.
pub fn merge_properties(event: &Properties, extra: Option<&Properties>) -> Properties {
    let capacity = event.len() + extra.map_or(0, |e| e.len());
    let mut merged = Properties::with_capacity(capacity);
    let layers = std::iter::once(event).chain(extra);
    for layer in layers {
        for (key, value) in layer {
            merged.insert(pascal_case(key).into_owned(), value.clone());
        }
    }
    merged
}

/// `Display` adapter rendering a property map as `Key=value, Key=value`.
#[derive(Debug, Clone, Copy)]
pub struct DisplayProperties<'a>(pub &'a Properties);

impl fmt::Display for DisplayProperties<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                PropertyValue::Str(s) => write!(f, "{}={:?}", key, s)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        Ok(())
    }
}

/// Convert a property map into a JSON object, keeping key order.
#[cfg(feature = "telemetry-json")]
pub fn properties_to_json(properties: &Properties) -> serde_json::Value {
    let object = properties
        .iter()
        .map(|(key, value)| {
            let json = match value {
                PropertyValue::Bool(v) => serde_json::Value::from(*v),
                PropertyValue::Int(v) => serde_json::Value::from(*v),
                PropertyValue::UInt(v) => serde_json::Value::from(*v),
                // Non-finite floats have no JSON form and become null.
                PropertyValue::Float(v) => serde_json::Value::from(*v),
                PropertyValue::Str(v) => serde_json::Value::from(v.as_str()),
            };
            (key.clone(), json)
        })
        .collect::<serde_json::Map<String, serde_json::Value>>();
    serde_json::Value::Object(object)
}

#[cfg(all(test, feature = "telemetry-json"))]
mod json_tests {
    use super::*;

    #[test]
    fn properties_json_keeps_types() {
        let mut props = Properties::new();
        props.insert("Name".into(), "checkout".into());
        props.insert("Count".into(), 3.into());
        props.insert("Ok".into(), true.into());
        let v = properties_to_json(&props);
        assert_eq!(v["Name"], "checkout");
        assert_eq!(v["Count"], 3);
        assert_eq!(v["Ok"], true);
    }

    #[test]
    fn non_finite_float_becomes_null() {
        let mut props = Properties::new();
        props.insert("Ratio".into(), f64::NAN.into());
        let v = properties_to_json(&props);
        assert!(v["Ratio"].is_null());
    }
}
