//! Meta fields
//!
//! Meta values describe the render request itself (size, id, cache version)
//! rather than template content. Callers may address them either with the
//! typed [`MetaField`] or with its textual name; both forms are normalised to
//! a single [`MetaKey`] when stored, so a value written under one form is
//! always readable under the other.

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::value::ParameterValue;

/// Known meta fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaField {
    /// Cache-busting version (`v`)
    Version,
    /// Stable identifier (`id`)
    Id,
    Width,
    Height,
    /// Device pixel ratio (`resolution`)
    Resolution,
    /// User agent tag (`agent`)
    Agent,
}

impl MetaField {
    pub const ALL: [MetaField; 6] = [
        MetaField::Version,
        MetaField::Id,
        MetaField::Width,
        MetaField::Height,
        MetaField::Resolution,
        MetaField::Agent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Version => "v",
            Self::Id => "id",
            Self::Width => "width",
            Self::Height => "height",
            Self::Resolution => "resolution",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for MetaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaField {
    type Err = String;

    /// Accepts the bare name and the `:name` symbol spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(':').unwrap_or(s);
        MetaField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| format!("unknown meta field: {}", s))
    }
}

/// Canonical key of a meta entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Known(MetaField),
    /// Unrecognised names are kept but never contribute a derived field
    Other(String),
}

impl From<MetaField> for MetaKey {
    fn from(field: MetaField) -> Self {
        MetaKey::Known(field)
    }
}

impl From<&str> for MetaKey {
    fn from(name: &str) -> Self {
        name.parse::<MetaField>()
            .map(MetaKey::Known)
            .unwrap_or_else(|_| MetaKey::Other(name.to_string()))
    }
}

impl From<String> for MetaKey {
    fn from(name: String) -> Self {
        MetaKey::from(name.as_str())
    }
}

impl From<&String> for MetaKey {
    fn from(name: &String) -> Self {
        MetaKey::from(name.as_str())
    }
}

impl MetaKey {
    pub fn as_str(&self) -> &str {
        match self {
            MetaKey::Known(field) => field.as_str(),
            MetaKey::Other(name) => name,
        }
    }
}

/// Meta values keyed by canonical [`MetaKey`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Meta {
    entries: Vec<(MetaKey, ParameterValue)>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value; the textual and typed forms of a key share one slot
    pub fn insert(
        &mut self,
        key: impl Into<MetaKey>,
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

    /// Builder-style [`Meta::insert`]
    pub fn with(mut self, key: impl Into<MetaKey>, value: impl Into<ParameterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: impl Into<MetaKey>) -> Option<&ParameterValue> {
        let key = key.into();
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Value of a known field, treating null and `false` as absent
    pub fn field(&self, field: MetaField) -> Option<&ParameterValue> {
        self.get(field).and_then(ParameterValue::truthy)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetaKey, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K: Into<MetaKey>, V: Into<ParameterValue>> FromIterator<(K, V)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Meta::new();
        for (key, value) in iter {
            meta.insert(key, value);
        }
        meta
    }
}

impl Serialize for Meta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

struct MetaVisitor;

impl<'de> Visitor<'de> for MetaVisitor {
    type Value = Meta;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of meta fields")
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(Meta::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut meta = Meta::new();
        while let Some((key, value)) = access.next_entry::<String, ParameterValue>()? {
            meta.insert(key, value);
        }
        Ok(meta)
    }
}

impl<'de> Deserialize<'de> for Meta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetaVisitor)
    }
}
