//! Attribute values and attribute stores for graphs, nodes and edges
//!
//! Every entity of the tree carries an [`Attributes`] store. Keys are unique
//! and always rendered in ascending byte-wise order, so the output does not
//! depend on insertion order.

use crate::serialization::{escape, key as render_key};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Well-known attribute keys
pub mod keys {
    pub const CLASS: &str = "class";
    pub const COLOR: &str = "color";
    pub const FILL_COLOR: &str = "fillcolor";
    pub const FONT_NAME: &str = "fontname";
    pub const LABEL: &str = "label";
    pub const RANK_DIR: &str = "rankdir";
    pub const SHAPE: &str = "shape";
    pub const STYLE: &str = "style";
}

/// Attribute value
///
/// - `Quoted` text is escaped and wrapped in double quotes
/// - `Raw` text is emitted verbatim (escape sequences such as `\l` survive)
/// - `Markup` text is emitted inside angle brackets (HTML-like labels)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    Quoted(String),
    Raw(String),
    Markup(String),
}

impl AttributeValue {
    pub fn quoted(text: impl Into<String>) -> Self {
        AttributeValue::Quoted(text.into())
    }

    pub fn raw(text: impl Into<String>) -> Self {
        AttributeValue::Raw(text.into())
    }

    pub fn markup(text: impl Into<String>) -> Self {
        AttributeValue::Markup(text.into())
    }

    /// The unrendered text of the value
    pub fn as_str(&self) -> &str {
        match self {
            AttributeValue::Quoted(s) | AttributeValue::Raw(s) | AttributeValue::Markup(s) => s,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Quoted(_) => "Quoted",
            AttributeValue::Raw(_) => "Raw",
            AttributeValue::Markup(_) => "Markup",
        }
    }
}

/// Renders the value in its DOT form
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Quoted(s) => write!(f, "\"{}\"", escape(s)),
            AttributeValue::Raw(s) => f.write_str(s),
            AttributeValue::Markup(s) => write!(f, "<{}>", s),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Quoted(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Quoted(s.to_string())
    }
}

impl From<&String> for AttributeValue {
    fn from(s: &String) -> Self {
        AttributeValue::Quoted(s.clone())
    }
}

/// Ordered, key-unique attribute store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    entries: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the one it replaced
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set several values at once; later pairs win on duplicate keys
    pub fn extend<K, V, I>(&mut self, pairs: I)
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttributeValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        attributes.extend(iter);
        attributes
    }
}

/// Renders the bracketed list `[a="1",b=2]`; an empty store renders nothing
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", render_key(key), value)?;
        }
        f.write_str("]")
    }
}
