//! Project Document and Element-Tree Operations
//!
//! A document is the ordered list of elements of one project. Order is
//! significant (z-order / layout order). Hierarchy is expressed through
//! `parent` pointers over the flat list.
//!
//! The four tree operations are pure: they take the document by value and
//! return the resulting document. None of them fails; a missing target is a
//! silent no-op. Payload validation happens earlier, when the client frame is
//! decoded into a [`Command`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::shared::command::Command;
use crate::shared::element::{Element, ElementId, ElementPatch};
use crate::shared::error::SharedError;

/// Ordered sequence of elements owned by one project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    /// Decode stored project content
    ///
    /// Accepts a bare JSON array, or the older `{"elements": [...]}` wrapper
    /// that early projects were created with. An empty string is an empty
    /// document.
    pub fn from_json_str(raw: &str) -> Result<Self, SharedError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        match serde_json::from_str::<Value>(raw)? {
            Value::Array(_) => Ok(serde_json::from_str(raw)?),
            Value::Object(mut map) => match map.remove("elements") {
                Some(elements @ Value::Array(_)) => Ok(serde_json::from_value(elements)?),
                _ => Err(SharedError::validation(
                    "content",
                    "object content must carry an 'elements' array",
                )),
            },
            _ => Err(SharedError::validation("content", "document must be a JSON array")),
        }
    }

    pub fn to_json_string(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Apply a decoded command
    pub fn apply(self, command: Command) -> Self {
        match command {
            Command::Create(element) => create(self, element),
            Command::Update(patch) => update(self, patch),
            Command::Put { id, after } => put(self, &id, after.as_ref()),
            Command::Delete { id } => delete(self, &id),
        }
    }
}

impl From<Vec<Element>> for Document {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Element> for Document {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

/// Append `element` unless its id is already present
pub fn create(mut doc: Document, element: Element) -> Document {
    if !doc.contains(&element.id) {
        doc.elements.push(element);
    }
    doc
}

/// Merge `patch` into the first element with a matching id
///
/// Fields set to a default value (`0`, `""`, `null`) are removed from the
/// element after the merge.
pub fn update(mut doc: Document, patch: ElementPatch) -> Document {
    if let Some(index) = doc.position(&patch.id) {
        doc.elements[index].merge(patch);
    }
    doc
}

/// Move element `id` right after `after`, or to the head when `after` is `None`
///
/// An unknown `id` or an unknown anchor leaves the document untouched.
pub fn put(doc: Document, id: &ElementId, after: Option<&ElementId>) -> Document {
    let Some(from) = doc.position(id) else {
        return doc;
    };

    let mut moved = doc.clone();
    let element = moved.elements.remove(from);
    let to = match after {
        None => 0,
        Some(anchor) => match moved.position(anchor) {
            Some(index) => index + 1,
            None => return doc,
        },
    };
    moved.elements.insert(to, element);
    moved
}

/// Remove element `id` and every element descending from it via `parent`
///
/// Children of each removed id are found with a linear scan, so cost is
/// O(n * removed). Each id is expanded once, which keeps parent cycles finite.
pub fn delete(mut doc: Document, id: &ElementId) -> Document {
    let mut doomed: HashSet<ElementId> = HashSet::new();
    let mut pending = vec![id.clone()];

    while let Some(current) = pending.pop() {
        if !doomed.insert(current.clone()) {
            continue;
        }
        pending.extend(
            doc.elements
                .iter()
                .filter(|e| e.parent.as_ref() == Some(&current))
                .map(|e| e.id.clone()),
        );
    }

    doc.elements.retain(|e| !doomed.contains(&e.id));
    doc
}
