//! Query string encoding
//!
//! Flattens a [`ParameterValue`] tree into `key=value` pairs using the
//! bracket convention of the JavaScript `qs` library:
//!
//! ```text
//! {a: {aa: "bar"}, b: [{c: "foo"}]}  ->  a[aa]=bar&b[0][c]=foo
//! ```
//!
//! Lists are treated as maps keyed by their zero-based index. Null leaves are
//! dropped. Keys and values are form-urlencoded (space becomes `+`), except
//! for the brackets introduced by nesting, which stay literal.
//!
//! One encoder serves both orderings so escaping and null handling cannot
//! drift between the public query and the signing input.

use std::collections::HashMap;
use std::fmt;

use crate::params::{ParameterMap, ParameterValue};

/// Order of the emitted pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairOrdering {
    /// Depth-first, following map insertion order
    #[default]
    Insertion,
    /// Lexicographic by the encoded `key=value` string
    Sorted,
}

/// Flattened key, kept as its path segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    segments: Vec<String>,
}

impl QueryKey {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Form-encoded segments joined with literal brackets
    pub fn encoded(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('[');
            }
            out.push_str(&form_encode(segment));
            if i > 0 {
                out.push(']');
            }
        }
        out
    }
}

impl fmt::Display for QueryKey {
    /// Unescaped `a[b][c]` form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i == 0 {
                f.write_str(segment)?;
            } else {
                write!(f, "[{}]", segment)?;
            }
        }
        Ok(())
    }
}

/// One flattened leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair {
    pub key: QueryKey,
    pub value: String,
}

impl QueryPair {
    pub fn encoded(&self) -> String {
        format!("{}={}", self.key.encoded(), form_encode(&self.value))
    }
}

/// Form-urlencode one key segment or value
///
/// Alphanumerics and `*-._` pass through, space becomes `+`, everything else
/// is percent-escaped byte by byte.
pub fn form_encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

#[derive(Default)]
struct PairCollector {
    pairs: Vec<QueryPair>,
    index: HashMap<String, usize>,
}

impl PairCollector {
    /// A repeated flattened key replaces the earlier value in place
    fn push(&mut self, key: QueryKey, value: String) {
        let raw = key.to_string();
        match self.index.get(&raw) {
            Some(&position) => self.pairs[position].value = value,
            None => {
                self.index.insert(raw, self.pairs.len());
                self.pairs.push(QueryPair { key, value });
            }
        }
    }

    fn walk_map<'a>(
        &mut self,
        entries: impl Iterator<Item = (String, &'a ParameterValue)>,
        prefix: Option<&QueryKey>,
    ) {
        for (name, value) in entries {
            let key = match prefix {
                Some(parent) => parent.child(name),
                None => QueryKey::root(name),
            };
            self.walk(value, key);
        }
    }

    fn walk(&mut self, value: &ParameterValue, key: QueryKey) {
        match value {
            ParameterValue::Null => {}
            ParameterValue::Map(map) => {
                self.walk_map(map.iter().map(|(k, v)| (k.clone(), v)), Some(&key))
            }
            ParameterValue::List(items) => self.walk_map(
                items.iter().enumerate().map(|(i, v)| (i.to_string(), v)),
                Some(&key),
            ),
            scalar => {
                if let Some(text) = scalar.as_scalar_string() {
                    self.push(key, text);
                }
            }
        }
    }
}

/// Flatten a value into ordered pairs
///
/// With no prefix, only maps and lists produce pairs; a bare scalar has no
/// key to live under.
pub fn flatten(value: &ParameterValue, prefix: Option<&QueryKey>) -> Vec<QueryPair> {
    let mut collector = PairCollector::default();
    match (value, prefix) {
        (ParameterValue::Map(map), _) => {
            collector.walk_map(map.iter().map(|(k, v)| (k.clone(), v)), prefix)
        }
        (ParameterValue::List(items), _) => collector.walk_map(
            items.iter().enumerate().map(|(i, v)| (i.to_string(), v)),
            prefix,
        ),
        (scalar, Some(key)) => collector.walk(scalar, key.clone()),
        (_, None) => {}
    }
    collector.pairs
}

/// Join pairs into a query string under the given ordering
pub fn stringify(pairs: &[QueryPair], ordering: PairOrdering) -> String {
    let mut encoded: Vec<String> = pairs.iter().map(QueryPair::encoded).collect();
    if ordering == PairOrdering::Sorted {
        encoded.sort();
    }
    encoded.join("&")
}

/// Query encoder parameterised by pair ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEncoder {
    ordering: PairOrdering,
}

impl QueryEncoder {
    pub fn new(ordering: PairOrdering) -> Self {
        Self { ordering }
    }

    pub fn sorted() -> Self {
        Self::new(PairOrdering::Sorted)
    }

    pub fn ordering(&self) -> PairOrdering {
        self.ordering
    }

    pub fn encode(&self, value: &ParameterValue) -> String {
        stringify(&flatten(value, None), self.ordering)
    }

    pub fn encode_map(&self, map: &ParameterMap) -> String {
        let pairs = {
            let mut collector = PairCollector::default();
            collector.walk_map(map.iter().map(|(k, v)| (k.clone(), v)), None);
            collector.pairs
        };
        stringify(&pairs, self.ordering)
    }
}

/// Insertion-ordered query string
pub fn encode_query(value: &ParameterValue) -> String {
    QueryEncoder::new(PairOrdering::Insertion).encode(value)
}

/// Lexicographically sorted query string, used as signing input
pub fn encode_query_sorted(value: &ParameterValue) -> String {
    QueryEncoder::sorted().encode(value)
}
