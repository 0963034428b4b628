// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the client are defined here
//! with typed accessor functions.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    /// Path of the TOML configuration file.
    pub const TRIVIA_CONFIG: &str = "TRIVIA_CONFIG";
    /// Bearer token presented to the stream endpoint.
    pub const TRIVIA_AUTH_TOKEN: &str = "TRIVIA_AUTH_TOKEN";
}

/// Returns the value of `TRIVIA_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(vars::TRIVIA_CONFIG).ok().map(PathBuf::from)
}

/// Returns the value of `TRIVIA_AUTH_TOKEN` if set and not blank.
pub fn auth_token() -> Option<String> {
    std::env::var(vars::TRIVIA_AUTH_TOKEN)
        .ok()
        .filter(|token| !token.trim().is_empty())
}
