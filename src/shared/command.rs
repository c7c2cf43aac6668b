//! Collaboration Commands
//!
//! Client frames on the collaboration socket have the form
//! `"<command> <json-payload>"`, for example:
//!
//! ```text
//! create {"id": "f1", "name": "Frame", "width": 100}
//! update {"id": "f1", "width": 0}
//! put {"id": "f1", "after": "f0"}
//! delete {"id": "f1"}
//! ```
//!
//! Decoding validates the payload completely, so the tree operations in
//! [`crate::shared::document`] never see a malformed element.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::element::{Element, ElementId, ElementPatch};
use crate::shared::error::CommandError;

/// A decoded client instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create(Element),
    Update(ElementPatch),
    Put {
        id: ElementId,
        after: Option<ElementId>,
    },
    Delete {
        id: ElementId,
    },
}

impl Command {
    /// Decode a raw text frame
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let raw = raw.trim();
        let (tag, payload) = match raw.split_once(char::is_whitespace) {
            Some((tag, payload)) => (tag, payload.trim()),
            None => (raw, ""),
        };

        if !matches!(tag, "create" | "update" | "put" | "delete") {
            return Err(CommandError::UnknownCommand(tag.to_string()));
        }
        if payload.is_empty() {
            return Err(CommandError::MissingPayload(tag.to_string()));
        }

        let map = match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(CommandError::NotAnObject),
            Err(e) => return Err(CommandError::MalformedJson(e.to_string())),
        };

        match tag {
            "create" => Ok(Self::Create(Element::from_json_object(map)?)),
            "update" => Ok(Self::Update(ElementPatch::from_json_object(map)?)),
            "put" => decode_put(map),
            _ => Ok(Self::Delete { id: decode_id(&map)? }),
        }
    }

    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Put { .. } => "put",
            Self::Delete { .. } => "delete",
        }
    }

    /// Id of the element the command targets
    pub fn target(&self) -> &ElementId {
        match self {
            Self::Create(element) => &element.id,
            Self::Update(patch) => &patch.id,
            Self::Put { id, .. } | Self::Delete { id } => id,
        }
    }
}

fn decode_id(map: &Map<String, Value>) -> Result<ElementId, CommandError> {
    let raw = map.get("id").ok_or(CommandError::MissingId)?;
    ElementId::from_json(raw).ok_or_else(|| CommandError::InvalidId {
        field: "id",
        value: raw.to_string(),
    })
}

fn decode_put(map: Map<String, Value>) -> Result<Command, CommandError> {
    let id = decode_id(&map)?;
    let after = match map.get("after") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(ElementId::from_json(raw).ok_or_else(|| CommandError::InvalidId {
            field: "after",
            value: raw.to_string(),
        })?),
    };
    Ok(Command::Put { id, after })
}

/// Why a client frame was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidCommand,
    ReadOnly,
    PersistenceFailed,
}

/// Error frame sent to the originating client only
///
/// Serialized as `{"error": "<kind>", "message": "<text>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub error: RejectionKind,
    pub message: String,
}

impl Rejection {
    pub fn new(error: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }

    pub fn read_only() -> Self {
        Self::new(
            RejectionKind::ReadOnly,
            "this connection has read access only",
        )
    }

    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"error":"{}"}}"#, self.error_name())
        })
    }

    fn error_name(&self) -> &'static str {
        match self.error {
            RejectionKind::InvalidCommand => "invalid_command",
            RejectionKind::ReadOnly => "read_only",
            RejectionKind::PersistenceFailed => "persistence_failed",
        }
    }
}
