// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP request execution.
//!
//! [`DataRequestClient`] is the seam between the retrying data sources and
//! the network. [`ReqwestClient`] is the production implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::{LogSink, Logger};

/// Log category for request execution.
pub const CATEGORY: &str = "Networking";

/// Errors from a single request attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("malformed url: {0}")]
    MalformedUrl(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("hit max retries, not retrying any more")]
    MaxRetries,
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;

/// How a request treats connection and response caching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Shared client with pooled connections.
    #[default]
    Cached,
    /// Fresh client per request; responses are never served from a cache.
    Ephemeral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            body: None,
        }
    }

    /// Attaches a JSON body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Executes one HTTP request attempt and returns the response body.
pub trait DataRequestClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: &'a HttpRequest,
        mode: SessionMode,
    ) -> Pin<Box<dyn Future<Output = RequestResult<Vec<u8>>> + Send + 'a>>;
}

/// Request client backed by reqwest.
pub struct ReqwestClient {
    shared: reqwest::Client,
    logger: Logger,
}

impl ReqwestClient {
    pub fn new(sink: Arc<dyn LogSink>) -> RequestResult<Self> {
        let shared = reqwest::Client::builder()
            .build()
            .map_err(|e| RequestError::Network(e.to_string()))?;
        Ok(ReqwestClient {
            shared,
            logger: Logger::new(CATEGORY, sink),
        })
    }

    fn client_for(&self, mode: SessionMode) -> RequestResult<reqwest::Client> {
        match mode {
            SessionMode::Cached => Ok(self.shared.clone()),
            SessionMode::Ephemeral => reqwest::Client::builder()
                .pool_max_idle_per_host(0)
                .build()
                .map_err(|e| RequestError::Network(e.to_string())),
        }
    }
}

impl DataRequestClient for ReqwestClient {
    fn execute<'a>(
        &'a self,
        request: &'a HttpRequest,
        mode: SessionMode,
    ) -> Pin<Box<dyn Future<Output = RequestResult<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.logger.log_errors(
                reqwest::Url::parse(&request.url)
                    .map_err(|_| RequestError::MalformedUrl(request.url.clone())),
            )?;
            let client = self.client_for(mode)?;

            let mut builder = match request.method {
                HttpMethod::Get => client.get(url),
                HttpMethod::Post => client.post(url),
            };
            if mode == SessionMode::Ephemeral {
                builder = builder.header(CACHE_CONTROL, "no-cache");
            }
            if let Some(body) = &request.body {
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| RequestError::Network(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(RequestError::Status(status.as_u16()));
            }
            let body = response
                .bytes()
                .await
                .map_err(|e| RequestError::Network(e.to_string()))?;
            Ok(body.to_vec())
        })
    }
}

/// Decodes a JSON response body. An empty body decodes as `null`.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> RequestResult<T> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| RequestError::Decode(e.to_string()))
}
