// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client facade wiring configuration, HTTP and the event stream.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::logging::LogSink;
use crate::registration::Registration;
use crate::request::{DataRequestClient, ReqwestClient, RequestContext, SignalSender};
use crate::sync::{ConnectionManager, ContinuitySession, ResyncCoordinator, Transport};

pub struct TriviaClient {
    config: ClientConfig,
    context: RequestContext,
    http: Arc<dyn DataRequestClient>,
}

impl TriviaClient {
    /// Builds a client that talks HTTP through reqwest.
    pub fn new(config: ClientConfig, sink: Arc<dyn LogSink>, signals: SignalSender) -> Result<Self> {
        let http: Arc<dyn DataRequestClient> = Arc::new(ReqwestClient::new(Arc::clone(&sink))?);
        Self::with_http_client(config, sink, signals, http)
    }

    pub fn with_http_client(
        config: ClientConfig,
        sink: Arc<dyn LogSink>,
        signals: SignalSender,
        http: Arc<dyn DataRequestClient>,
    ) -> Result<Self> {
        config.validate()?;
        let context = RequestContext::new(sink)
            .with_policy(config.retry_policy())
            .with_signals(signals);
        Ok(TriviaClient {
            config,
            context,
            http,
        })
    }

    /// Replaces the clock, ids, signals, retry policy and cancellation
    /// shared by this client's requests and streams.
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token that stops every request and stream of this client.
    pub fn cancel_token(&self) -> CancellationToken {
        self.context.cancel.clone()
    }

    pub fn registration(&self) -> Registration {
        Registration::new(self.config.clone(), &self.context, Arc::clone(&self.http))
    }

    pub async fn register(&self, team_name: &str) -> Result<bool> {
        self.registration().submit(team_name).await
    }

    pub fn resync_coordinator(&self) -> Result<ResyncCoordinator> {
        Ok(ResyncCoordinator::with_context(
            self.config.status_url()?,
            self.config.session_mode,
            &self.context,
            Arc::clone(&self.http),
        ))
    }

    /// Streams events into `dispatcher` until the client is cancelled.
    pub async fn watch<D, T>(&self, dispatcher: D, transport: T) -> Result<D>
    where
        D: Dispatcher,
        T: Transport + 'static,
    {
        let session = ContinuitySession::new(
            self.resync_coordinator()?,
            dispatcher,
            self.config.session_config(),
            Arc::clone(&self.context.sink),
            self.context.cancel.clone(),
        );

        let mut connection = ConnectionManager::new(
            self.config.connection_config(),
            transport,
            Arc::clone(&self.context.clock),
            Arc::clone(&self.context.sink),
            self.context.cancel.child_token(),
        );
        let frames = connection.start().ok_or(Error::NotConnected)?;

        let session = session.run(frames).await;
        connection.shutdown().await;
        Ok(session.into_dispatcher())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
