// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::request::{RequestError, RetryError};
use crate::sync::TransportError;

/// All possible errors that can occur in the trivia client library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not connected to trivia server")]
    NotConnected,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("request error: {0}")]
    Request(#[from] RequestError),

    #[error("request abandoned: {0}")]
    Retry(#[from] RetryError),

    #[error("decode error: {0}")]
    Decode(#[from] trivia_core::Error),

    #[error("invalid team name: '{0}'\n  hint: team names must contain at least one non-space character")]
    InvalidTeamName(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for trivia client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
