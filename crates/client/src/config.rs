// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from a TOML file and includes:
//! - the HTTP base URL (status and registration endpoints)
//! - the stream URL
//! - retry, reconnect and resync tuning

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::request::{RetryPolicy, SessionMode, DEFAULT_MAX_RETRIES};
use crate::sync::{ConnectionConfig, SessionConfig, DEFAULT_MAX_HELD, DEFAULT_STREAM_URL};

/// Client configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the HTTP API (default: "http://localhost:8080").
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// WebSocket URL of the event stream.
    #[serde(default = "default_stream_url")]
    pub stream_url: String,

    /// Retries per request before giving up (default: 5).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before reconnecting a closed stream, in milliseconds (default: 1000).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Fetch a snapshot when the stream starts (default: true).
    #[serde(default = "default_resync_on_start")]
    pub resync_on_start: bool,

    /// Envelopes held while a resync is pending (default: 256).
    #[serde(default = "default_max_held_envelopes")]
    pub max_held_envelopes: usize,

    /// Caching behaviour of HTTP requests (default: "cached").
    #[serde(default)]
    pub session_mode: SessionMode,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_stream_url() -> String {
    DEFAULT_STREAM_URL.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

fn default_resync_on_start() -> bool {
    true
}

fn default_max_held_envelopes() -> usize {
    DEFAULT_MAX_HELD
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: default_server_url(),
            stream_url: default_stream_url(),
            max_retries: default_max_retries(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            resync_on_start: default_resync_on_start(),
            max_held_envelopes: default_max_held_envelopes(),
            session_mode: SessionMode::default(),
        }
    }
}

impl ClientConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_scheme("server_url", &self.server_url, &["http", "https"])?;
        check_scheme("stream_url", &self.stream_url, &["ws"])?;
        if self.max_held_envelopes == 0 {
            return Err(Error::Config(
                "max_held_envelopes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `{server_url}/status`
    pub fn status_url(&self) -> Result<String> {
        endpoint_url(&self.server_url, &["status"])
    }

    /// `{server_url}/register/{team}`, with the team name as one path segment.
    pub fn registration_url(&self, team: &str) -> Result<String> {
        endpoint_url(&self.server_url, &["register", team])
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
        }
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.stream_url.clone(),
            reconnect_delay: self.reconnect_delay(),
            ..ConnectionConfig::default()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            resync_on_start: self.resync_on_start,
            max_held: self.max_held_envelopes,
        }
    }
}

fn check_scheme(field: &str, value: &str, schemes: &[&str]) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("invalid {}: '{}': {}", field, value, e)))?;
    if !schemes.contains(&url.scheme()) {
        return Err(Error::Config(format!(
            "invalid {}: '{}'\n  hint: expected one of {}",
            field,
            value,
            schemes.join(", ")
        )));
    }
    Ok(())
}

/// Appends percent-encoded path segments to `base`.
fn endpoint_url(base: &str, segments: &[&str]) -> Result<String> {
    let mut url =
        Url::parse(base).map_err(|e| Error::Config(format!("invalid server_url: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("server_url cannot be a base: '{}'", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
