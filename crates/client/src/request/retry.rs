// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retrying request execution with exponential backoff.
//!
//! A request chain starts without a correlation id. The first failure
//! allocates one; every later attempt of the same chain reuses it, so the
//! error signals of one logical request collapse into one banner. A
//! success clears that banner.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::http::{RequestError, RequestResult};
use super::signals::{RequestSignal, SignalSender};
use crate::clock::{Clock, IdGenerator, RandomIds, TokioClock};
use crate::logging::{LogSink, Logger};

/// Log category for retry bookkeeping.
pub const CATEGORY: &str = "HTTPDataSource";

pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Delay before retrying after a failed `attempt`: `100ms + 2^attempt ms`.
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100u64.saturating_add(2u64.saturating_pow(attempt)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Failed attempts retried before giving up. Attempts run 0..=max_retries.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Progress of one request chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    pub request_id: Uuid,
    pub attempt: u32,
    pub source_id: String,
}

/// A successful value with the chain's correlation id, if one was allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlated<T> {
    pub value: T,
    pub request_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    #[error("max retries exceeded for request {request_id}: {last_error}")]
    MaxRetriesExceeded {
        request_id: Uuid,
        last_error: RequestError,
    },

    #[error("request cancelled")]
    Cancelled,
}

/// Collaborators shared by every data source of a client.
#[derive(Clone)]
pub struct RequestContext {
    pub policy: RetryPolicy,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub signals: SignalSender,
    pub cancel: CancellationToken,
    pub sink: Arc<dyn LogSink>,
}

impl RequestContext {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        RequestContext {
            policy: RetryPolicy::default(),
            clock: Arc::new(TokioClock),
            ids: Arc::new(RandomIds),
            signals: SignalSender::disabled(),
            cancel: CancellationToken::new(),
            sink,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_signals(mut self, signals: SignalSender) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Runs request operations for one data source.
pub struct RequestExecutor {
    source_id: String,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    signals: SignalSender,
    cancel: CancellationToken,
    logger: Logger,
}

impl RequestExecutor {
    pub fn new(source_id: impl Into<String>, context: &RequestContext) -> Self {
        RequestExecutor {
            source_id: source_id.into(),
            policy: context.policy,
            clock: Arc::clone(&context.clock),
            ids: Arc::clone(&context.ids),
            signals: context.signals.clone(),
            cancel: context.cancel.clone(),
            logger: Logger::new(CATEGORY, Arc::clone(&context.sink)),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Runs `operation` until it succeeds, the retry budget is spent, or the
    /// executor is cancelled.
    ///
    /// `request_id` continues an existing chain; `attempt` is the attempt
    /// number of the first invocation. Exhausting the budget raises exactly
    /// one terminal error signal.
    pub async fn execute<T, F, Fut>(
        &self,
        mut operation: F,
        request_id: Option<Uuid>,
        attempt: u32,
    ) -> Result<Correlated<T>, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RequestResult<T>>,
    {
        let mut retry = request_id.map(|request_id| RetryState {
            request_id,
            attempt,
            source_id: self.source_id.clone(),
        });
        let mut attempt = attempt;

        loop {
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(RetryError::Cancelled),
                result = operation() => result,
            };

            let error = match result {
                Ok(value) => {
                    let request_id = retry.map(|state| state.request_id);
                    if let Some(request_id) = request_id {
                        self.signals.emit(RequestSignal::ClearError {
                            source_id: self.source_id.clone(),
                            request_id,
                        });
                    }
                    return Ok(Correlated { value, request_id });
                }
                Err(error) => error,
            };

            let state = retry.get_or_insert_with(|| RetryState {
                request_id: self.ids.next_id(),
                attempt,
                source_id: self.source_id.clone(),
            });
            state.attempt = attempt;
            let request_id = state.request_id;

            if attempt >= self.policy.max_retries {
                self.report(request_id, RequestError::MaxRetries);
                return Err(RetryError::MaxRetriesExceeded {
                    request_id,
                    last_error: error,
                });
            }

            self.report(request_id, error);
            let delay = backoff(attempt);
            self.logger.debug(format!(
                "{}: retrying request {} in {}ms (attempt {})",
                self.source_id,
                request_id,
                delay.as_millis(),
                attempt + 1
            ));

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(RetryError::Cancelled),
                _ = self.clock.sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    fn report(&self, request_id: Uuid, error: RequestError) {
        self.logger
            .request_error(&self.source_id, request_id, &error);
        self.signals.emit(RequestSignal::Error {
            source_id: self.source_id.clone(),
            request_id,
            error,
        });
    }
}
