//! Parameter value model
//!
//! A [`ParameterValue`] is a finite tree of scalars, lists and ordered maps.
//! Maps keep insertion order at every level because the query encoder walks
//! them depth-first in that order. Values are owned, so cyclic graphs cannot
//! be constructed.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParameterValue {
    /// Absent value; dropped by the query encoder
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Encoded as a map keyed by the zero-based index
    List(Vec<ParameterValue>),
    Map(ParameterMap),
}

impl ParameterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParameterValue::Null)
    }

    /// `None` for null, `Some` otherwise
    pub fn non_null(&self) -> Option<&ParameterValue> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    /// `None` for null and `false`, `Some` otherwise
    pub fn truthy(&self) -> Option<&ParameterValue> {
        match self {
            ParameterValue::Null | ParameterValue::Bool(false) => None,
            _ => Some(self),
        }
    }

    /// Canonical text of a scalar leaf
    ///
    /// Booleans print as `true`/`false`, numbers through [`serde_json::Number`]
    /// and strings verbatim. Null, lists and maps have no scalar form.
    pub fn as_scalar_string(&self) -> Option<String> {
        match self {
            ParameterValue::Bool(b) => Some(b.to_string()),
            ParameterValue::Number(n) => Some(n.to_string()),
            ParameterValue::String(s) => Some(s.clone()),
            ParameterValue::Null | ParameterValue::List(_) | ParameterValue::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&ParameterMap> {
        match self {
            ParameterValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParameterValue {
                fn from(value: $ty) -> Self {
                    ParameterValue::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for ParameterValue {
    /// NaN and infinities have no query representation and become null
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(ParameterValue::Number)
            .unwrap_or(ParameterValue::Null)
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        ParameterValue::from(f64::from(value))
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParameterValue::Null)
    }
}

impl<T: Into<ParameterValue>> From<Vec<T>> for ParameterValue {
    fn from(value: Vec<T>) -> Self {
        ParameterValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<ParameterMap> for ParameterValue {
    fn from(value: ParameterMap) -> Self {
        ParameterValue::Map(value)
    }
}

impl From<serde_json::Value> for ParameterValue {
    /// Object keys keep their source order (`preserve_order`)
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ParameterValue::Null,
            serde_json::Value::Bool(b) => ParameterValue::Bool(b),
            serde_json::Value::Number(n) => ParameterValue::Number(n),
            serde_json::Value::String(s) => ParameterValue::String(s),
            serde_json::Value::Array(items) => {
                ParameterValue::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(object) => ParameterValue::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (k, ParameterValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParameterValue::Null => serializer.serialize_unit(),
            ParameterValue::Bool(b) => serializer.serialize_bool(*b),
            ParameterValue::Number(n) => n.serialize(serializer),
            ParameterValue::String(s) => serializer.serialize_str(s),
            ParameterValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ParameterValue::Map(map) => map.serialize(serializer),
        }
    }
}

struct ParameterValueVisitor;

impl<'de> Visitor<'de> for ParameterValueVisitor {
    type Value = ParameterValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, list or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ParameterValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ParameterValue::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ParameterValue::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ParameterValue::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ParameterValue::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ParameterValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParameterValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParameterValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ParameterValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
        ParameterMapVisitor.visit_map(access).map(ParameterValue::Map)
    }
}

impl<'de> Deserialize<'de> for ParameterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParameterValueVisitor)
    }
}

/// Insertion-ordered mapping from name to [`ParameterValue`]
///
/// Inserting an existing key replaces its value in place, so the key keeps
/// the position of its first insertion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterMap {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace, returning the previous value
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Option<ParameterValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<ParameterValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Shallow overwrite: every top-level entry of `other` wins over `self`
    pub fn merge(&mut self, other: &ParameterMap) {
        for (key, value) in other.iter() {
            self.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for ParameterMap {
    type Item = (String, ParameterValue);
    type IntoIter = std::vec::IntoIter<(String, ParameterValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ParameterMapVisitor;

impl<'de> Visitor<'de> for ParameterMapVisitor {
    type Value = ParameterMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of parameter names to values")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParameterMap::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = ParameterMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<MapKey, ParameterValue>()? {
            map.insert(key.0, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for ParameterMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParameterMapVisitor)
    }
}

/// Map key accepting strings as well as the bare numbers and booleans YAML
/// allows as keys
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = ParameterValue::deserialize(deserializer)?;
        value
            .as_scalar_string()
            .map(MapKey)
            .ok_or_else(|| de::Error::custom("parameter names must be scalars"))
    }
}
