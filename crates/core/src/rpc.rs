// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 message shapes used on the stream endpoint.
//!
//! Frames are classified without knowing their static type: an object with a
//! `method` field is request-shaped, anything else is a response.
//!
//! ```text
//! request:  {"jsonrpc": "2.0", "id": "<uuid>"?, "method": "...", "params": ...?}
//! response: {"jsonrpc": "2.0", "id": "<uuid>", "result": ...}
//!           {"jsonrpc": "2.0", "id": "<uuid>", "error": {"code", "message", "data"}}
//! ```

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::{Error, Result};

/// Protocol version string carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name of the notifications that carry stream envelopes.
pub const EVENT_METHOD: &str = "event";

/// A request or notification.
///
/// A request without an `id` is a notification: no response is expected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "P: Deserialize<'de>"))]
pub struct RequestMessage<P> {
    /// Responses to this request carry the same id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub jsonrpc: String,
    pub method: String,
    /// A present `"params": null` decodes as `Some`, not `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub params: Option<P>,
}

impl<P> RequestMessage<P> {
    /// Creates a request expecting a response correlated by `id`.
    pub fn request(id: Uuid, method: impl Into<String>, params: Option<P>) -> Self {
        RequestMessage {
            id: Some(id),
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }

    /// Creates a notification.
    pub fn notification(method: impl Into<String>, params: Option<P>) -> Self {
        RequestMessage {
            id: None,
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

impl RequestMessage<Envelope> {
    /// Creates the notification that delivers one envelope on the stream.
    pub fn event(envelope: Envelope) -> Self {
        RequestMessage::notification(EVENT_METHOD, Some(envelope))
    }
}

impl<P: Serialize> RequestMessage<P> {
    /// Serializes the message to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<P: DeserializeOwned> RequestMessage<P> {
    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Either the result of a request or the error it produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome<R> {
    Result(R),
    Error(MessageError),
}

/// A response to a request.
///
/// On the wire exactly one of `result` and `error` is present; a frame with
/// both or neither fails to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMessage<R> {
    pub jsonrpc: String,
    /// Always matches the id of the originating request.
    pub id: Uuid,
    pub outcome: ResponseOutcome<R>,
}

impl<R> ResponseMessage<R> {
    /// Creates a successful response.
    pub fn success(id: Uuid, result: R) -> Self {
        ResponseMessage {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: ResponseOutcome::Result(result),
        }
    }

    /// Creates an error response.
    pub fn failure(id: Uuid, error: MessageError) -> Self {
        ResponseMessage {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: ResponseOutcome::Error(error),
        }
    }

    /// Returns the error carried by this response, if any.
    pub fn error(&self) -> Option<&MessageError> {
        match &self.outcome {
            ResponseOutcome::Error(error) => Some(error),
            ResponseOutcome::Result(_) => None,
        }
    }
}

impl<R: Serialize> ResponseMessage<R> {
    /// Serializes the message to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<R: DeserializeOwned> ResponseMessage<R> {
    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[derive(Serialize)]
struct ResponseRef<'a, R> {
    jsonrpc: &'a str,
    id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a R>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a MessageError>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
struct RawResponse<R> {
    jsonrpc: String,
    id: Uuid,
    #[serde(default, deserialize_with = "present")]
    result: Option<R>,
    error: Option<MessageError>,
}

/// Maps a field that is present on the wire to `Some`, even when it is
/// `null`. Absent fields fall back to `None` through `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<R: Serialize> Serialize for ResponseMessage<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let (result, error) = match &self.outcome {
            ResponseOutcome::Result(result) => (Some(result), None),
            ResponseOutcome::Error(error) => (None, Some(error)),
        };
        ResponseRef {
            jsonrpc: &self.jsonrpc,
            id: self.id,
            result,
            error,
        }
        .serialize(serializer)
    }
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for ResponseMessage<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawResponse::<R>::deserialize(deserializer)?;
        let outcome = match (raw.result, raw.error) {
            (Some(result), None) => ResponseOutcome::Result(result),
            (None, Some(error)) => ResponseOutcome::Error(error),
            (Some(_), Some(_)) => {
                return Err(de::Error::custom("response carries both result and error"))
            }
            (None, None) => {
                return Err(de::Error::custom(
                    "response carries neither result nor error",
                ))
            }
        };
        Ok(ResponseMessage {
            jsonrpc: raw.jsonrpc,
            id: raw.id,
            outcome,
        })
    }
}

/// Structured error carried by an error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageError {
    pub code: ErrorCode,
    pub message: String,
    /// Opaque payload, base64 encoded on the wire.
    #[serde(default, with = "base64_data")]
    pub data: Option<Vec<u8>>,
}

impl MessageError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        MessageError {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl std::fmt::Display for MessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, i64::from(self.code))
    }
}

mod base64_data {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => serializer.serialize_some(&general_purpose::STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| {
                general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(de::Error::custom)
            })
            .transpose()
    }
}

/// JSON-RPC error codes, with the reserved bands parsed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid request object.
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
    /// Reserved for implementation-defined server errors (-32099..=-32000).
    ServerError(i64),
    /// Application-defined error.
    Other(i64),
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => ErrorCode::ParseError,
            -32600 => ErrorCode::InvalidRequest,
            -32601 => ErrorCode::MethodNotFound,
            -32602 => ErrorCode::InvalidParams,
            -32603 => ErrorCode::InternalError,
            -32099..=-32000 => ErrorCode::ServerError(code),
            _ => ErrorCode::Other(code),
        }
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError(code) | ErrorCode::Other(code) => code,
        }
    }
}

/// Shape of an incoming frame, decided by the presence of `method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

impl MessageKind {
    /// Classifies a decoded JSON frame.
    pub fn detect(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidMessage("frame is not a JSON object".to_string()))?;
        match object.get("method") {
            None | Some(Value::Null) => Ok(MessageKind::Response),
            Some(Value::String(_)) => Ok(MessageKind::Request),
            Some(_) => Err(Error::InvalidMessage(
                "method must be a string".to_string(),
            )),
        }
    }
}

/// A decoded frame whose static type was not known in advance.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage<P, R> {
    Request(RequestMessage<P>),
    Response(ResponseMessage<R>),
}

/// Frames received on the stream endpoint.
pub type StreamMessage = IncomingMessage<Envelope, Value>;

impl<P: DeserializeOwned, R: DeserializeOwned> IncomingMessage<P, R> {
    /// Decodes a text or binary frame payload.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Decodes an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match MessageKind::detect(&value)? {
            MessageKind::Request => Ok(IncomingMessage::Request(serde_json::from_value(value)?)),
            MessageKind::Response => Ok(IncomingMessage::Response(serde_json::from_value(value)?)),
        }
    }
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
