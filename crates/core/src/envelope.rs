// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stream envelopes: one event plus the ordering metadata that chains it to
//! the message before it.
//!
//! ```text
//! {"metadata": {"messageId": "<uuid>", "prevMessageId": "<uuid>|null"},
//!  "content": {"newAnswer": {...}}}
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trivia::Event;

/// Ordering metadata of a stream message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub message_id: Uuid,
    /// Id of the message the server sent immediately before this one.
    ///
    /// `None` marks a notification without ordering requirements.
    #[serde(default)]
    pub prev_message_id: Option<Uuid>,
}

/// A stream message: ordering metadata plus one application event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    pub metadata: Metadata,
    pub content: Event,
}

impl Envelope {
    /// Creates an envelope chained to `prev_message_id`.
    pub fn chained(message_id: Uuid, prev_message_id: Uuid, content: Event) -> Self {
        Envelope {
            metadata: Metadata {
                message_id,
                prev_message_id: Some(prev_message_id),
            },
            content,
        }
    }

    /// Creates an ordering-exempt envelope.
    pub fn unordered(message_id: Uuid, content: Event) -> Self {
        Envelope {
            metadata: Metadata {
                message_id,
                prev_message_id: None,
            },
            content,
        }
    }

    pub fn message_id(&self) -> Uuid {
        self.metadata.message_id
    }

    pub fn prev_message_id(&self) -> Option<Uuid> {
        self.metadata.prev_message_id
    }

    /// Returns true if this envelope is exempt from continuity checks.
    pub fn is_unordered(&self) -> bool {
        self.metadata.prev_message_id.is_none()
    }

    /// Serializes the envelope to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an envelope from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
