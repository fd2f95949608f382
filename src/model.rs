//! Box records as they are stored on disk and returned over HTTP

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A positioned, colored box.
///
/// Stored elements missing a field still load: coordinates fall back to zero,
/// the color to empty and the id to a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRecord {
    /// Server-assigned identifier, serialized in hyphenated form
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub color: String,
}

impl BoxRecord {
    /// Create a record from a creation request with a freshly generated id
    pub fn from_new(new: NewBox) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: new.x,
            y: new.y,
            color: new.color,
        }
    }
}

/// Body of a creation request.
///
/// Missing fields fall back to zero / empty. An `id` sent by the client is
/// not a field here, so it is dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewBox {
    pub x: i32,
    pub y: i32,
    pub color: String,
}

impl NewBox {
    #[cfg(test)]
    pub fn new(x: i32, y: i32, color: impl Into<String>) -> Self {
        Self {
            x,
            y,
            color: color.into(),
        }
    }
}
