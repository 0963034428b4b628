// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::http::{decode_body, DataRequestClient, HttpRequest, SessionMode};
use super::retry::{Correlated, RequestContext, RequestExecutor, RetryError};

/// A retrying JSON endpoint that decodes responses into `T`.
pub struct HttpDataSource<T> {
    executor: RequestExecutor,
    client: Arc<dyn DataRequestClient>,
    _response: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> HttpDataSource<T> {
    pub fn new(
        source_id: impl Into<String>,
        context: &RequestContext,
        client: Arc<dyn DataRequestClient>,
    ) -> Self {
        HttpDataSource {
            executor: RequestExecutor::new(source_id, context),
            client,
            _response: PhantomData,
        }
    }

    pub fn source_id(&self) -> &str {
        self.executor.source_id()
    }

    /// GETs `url` and decodes the body.
    pub async fn fetch(&self, url: &str, mode: SessionMode) -> Result<Correlated<T>, RetryError> {
        self.request(HttpRequest::get(url), mode).await
    }

    /// Sends `request`, retrying failed attempts, and decodes the body.
    pub async fn request(
        &self,
        request: HttpRequest,
        mode: SessionMode,
    ) -> Result<Correlated<T>, RetryError> {
        let client = &self.client;
        let request = &request;
        self.executor
            .execute(
                move || async move {
                    let body = client.execute(request, mode).await?;
                    decode_body::<T>(&body)
                },
                None,
                0,
            )
            .await
    }
}
