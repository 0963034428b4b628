// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use uuid::Uuid;
use yare::parameterized;

#[parameterized(
    not_connected = { Error::NotConnected, "not connected" },
    send_failed = { Error::SendFailed("broken pipe".into()), "broken pipe" },
    invalid_team = { Error::InvalidTeamName("  ".into()), "invalid team name" },
    config = { Error::Config("bad url".into()), "bad url" },
    request = { Error::Request(RequestError::Status(503)), "503" },
    retry = { Error::Retry(RetryError::MaxRetriesExceeded { request_id: Uuid::nil(), last_error: RequestError::Status(500) }), "max retries" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_transport() {
    let err: Error = TransportError::AuthFailed.into();
    assert!(matches!(err, Error::Transport(TransportError::AuthFailed)));
}

#[test]
fn error_from_decode() {
    let decode_err = trivia_core::Error::InvalidMessage("frame is not a JSON object".into());
    let err: Error = decode_err.into();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}
