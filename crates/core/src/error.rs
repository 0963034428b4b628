// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for trivia-core decoding.

use thiserror::Error;
use uuid::Uuid;

/// All possible errors that can occur while decoding wire messages.
#[derive(Debug, Error)]
pub enum Error {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("duplicate question id in round: {0}")]
    DuplicateQuestion(Uuid),
}

/// A specialized Result type for trivia-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
