// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot resynchronization with coalescing.
//!
//! At most one snapshot fetch is outstanding. Requests made while one is
//! pending are folded into it and only counted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use trivia_core::Snapshot;

use crate::logging::{LogSink, Logger};
use crate::request::{DataRequestClient, HttpDataSource, RequestContext, RetryError, SessionMode};

/// Log category and request source id for resyncs.
pub const SOURCE_ID: &str = "Resync";

type PendingFetch = Pin<Box<dyn Future<Output = Result<Snapshot, RetryError>> + Send>>;

/// Whether a resync request started a fetch or joined the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncRequest {
    Started,
    Coalesced,
}

pub struct ResyncCoordinator {
    source: Arc<HttpDataSource<Snapshot>>,
    status_url: String,
    mode: SessionMode,
    pending: Option<PendingFetch>,
    started: u64,
    coalesced: u64,
    logger: Logger,
}

impl ResyncCoordinator {
    pub fn new(
        source: Arc<HttpDataSource<Snapshot>>,
        status_url: impl Into<String>,
        mode: SessionMode,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        ResyncCoordinator {
            source,
            status_url: status_url.into(),
            mode,
            pending: None,
            started: 0,
            coalesced: 0,
            logger: Logger::new(SOURCE_ID, sink),
        }
    }

    /// Builds a coordinator whose fetches are tagged with the `Resync`
    /// source id.
    pub fn with_context(
        status_url: impl Into<String>,
        mode: SessionMode,
        context: &RequestContext,
        client: Arc<dyn DataRequestClient>,
    ) -> Self {
        let source = Arc::new(HttpDataSource::new(SOURCE_ID, context, client));
        Self::new(source, status_url, mode, Arc::clone(&context.sink))
    }

    /// Fetches a snapshot directly, outside the coalescing bookkeeping.
    pub async fn resynchronize(&self) -> Result<Snapshot, RetryError> {
        let snapshot = self.source.fetch(&self.status_url, self.mode).await?;
        Ok(snapshot.value)
    }

    /// Starts a snapshot fetch unless one is already pending.
    pub fn request(&mut self) -> ResyncRequest {
        if self.pending.is_some() {
            self.coalesced += 1;
            self.logger.debug("resync already pending, coalescing");
            return ResyncRequest::Coalesced;
        }

        let source = Arc::clone(&self.source);
        let url = self.status_url.clone();
        let mode = self.mode;
        self.pending = Some(Box::pin(async move {
            let snapshot = source.fetch(&url, mode).await?;
            Ok(snapshot.value)
        }));
        self.started += 1;
        self.logger.info(format!("resynchronizing from {}", self.status_url));
        ResyncRequest::Started
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fetches started over the coordinator's lifetime.
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Requests folded into a pending fetch.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Resolves with the pending fetch's outcome and clears it.
    ///
    /// Never resolves while nothing is pending. Cancel safe: dropping the
    /// returned future keeps the fetch pending.
    pub async fn completion(&mut self) -> Result<Snapshot, RetryError> {
        match self.pending.as_mut() {
            Some(fetch) => {
                let outcome = fetch.await;
                self.pending = None;
                outcome
            }
            None => std::future::pending().await,
        }
    }
}
