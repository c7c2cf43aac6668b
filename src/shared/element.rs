//! Element Model
//!
//! An element is one addressable node of a project's document: a frame, a
//! text block, an image. Elements are stored flat; hierarchy is expressed
//! through the optional `parent` pointer.
//!
//! # Wire Format
//!
//! Elements travel as flat JSON objects. `id` and `parent` are lifted into
//! typed fields, every other key lands in `attrs`:
//!
//! ```json
//! {"id": "b1", "parent": "frame-1", "name": "Button", "x": 10, "width": 120}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::shared::error::CommandError;

/// Identifier of an element inside one document
///
/// Clients generate UUID strings, older documents use integers. The two
/// forms never compare equal: `1` and `"1"` are different elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementId {
    Int(i64),
    Text(String),
}

impl ElementId {
    /// Decode an id from a JSON value
    ///
    /// Only integers and strings are ids. Floats, booleans, objects and
    /// arrays are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// `0` and `""` are the "unset" forms of an id reference.
    fn is_unset(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ElementId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ElementId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Attribute value of an element
///
/// Variant order matters for untagged deserialization: integers must be
/// tried before floats so `50` stays an `Int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Nested visual descriptions (borders, shadow, per-corner radius)
    Composite(Value),
}

impl AttrValue {
    /// Whether this value counts as "unset" for update merging
    ///
    /// `0`, `0.0`, `""` and `null` are defaults. `false` is a real value.
    pub fn is_default(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Int(n) => *n == 0,
            Self::Float(f) => *f == 0.0,
            Self::Text(s) => s.is_empty(),
            Self::Bool(_) | Self::Composite(_) => false,
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Composite(other),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A node of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style parent setter
    pub fn with_parent(mut self, parent: impl Into<ElementId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Build an element from a decoded command payload
    ///
    /// `after` is a positioning directive, never an attribute, and is dropped.
    /// A `parent` of `null` means "no parent". `0` and `""` are valid ids and
    /// are kept as parents.
    pub fn from_json_object(mut map: Map<String, Value>) -> Result<Self, CommandError> {
        let id = take_id(&mut map)?;
        let parent = match map.remove("parent") {
            None => None,
            Some(value) => parse_parent(&value)?,
        };
        map.remove("after");

        let attrs = map
            .into_iter()
            .map(|(key, value)| (key, AttrValue::from(value)))
            .collect();

        Ok(Self { id, parent, attrs })
    }

    /// Merge a patch into this element, then drop every default-valued field
    pub fn merge(&mut self, patch: ElementPatch) {
        if let Some(parent) = patch.parent {
            self.parent = parent;
        }
        self.attrs.extend(patch.attrs);
        self.attrs.retain(|_, value| !value.is_default());
    }
}

/// Partial element carried by an `update` command
///
/// `parent` distinguishes "not mentioned" (`None`) from "cleared"
/// (`Some(None)`). Patching `parent` to `0` or `""` clears it, like any other
/// default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementPatch {
    pub id: ElementId,
    pub parent: Option<Option<ElementId>>,
    pub attrs: BTreeMap<String, AttrValue>,
}

impl ElementPatch {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn from_json_object(mut map: Map<String, Value>) -> Result<Self, CommandError> {
        let id = take_id(&mut map)?;
        let parent = match map.remove("parent") {
            None => None,
            Some(value) => Some(parse_parent(&value)?.filter(|id| !id.is_unset())),
        };
        map.remove("after");

        let attrs = map
            .into_iter()
            .map(|(key, value)| (key, AttrValue::from(value)))
            .collect();

        Ok(Self { id, parent, attrs })
    }
}

fn take_id(map: &mut Map<String, Value>) -> Result<ElementId, CommandError> {
    let raw = map.remove("id").ok_or(CommandError::MissingId)?;
    ElementId::from_json(&raw).ok_or_else(|| CommandError::InvalidId {
        field: "id",
        value: raw.to_string(),
    })
}

fn parse_parent(value: &Value) -> Result<Option<ElementId>, CommandError> {
    if value.is_null() {
        return Ok(None);
    }
    ElementId::from_json(value)
        .map(Some)
        .ok_or_else(|| CommandError::InvalidId {
            field: "parent",
            value: value.to_string(),
        })
}
