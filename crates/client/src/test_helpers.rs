// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for client tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use trivia_core::{Envelope, Event, Question, RequestMessage, Round, Snapshot};
use uuid::Uuid;

use crate::clock::{Clock, IdGenerator};
use crate::logging::{LogLevel, LogRecord, LogSink};
use crate::request::{
    DataRequestClient, HttpRequest, RequestContext, RequestError, RequestResult, RetryPolicy,
    SessionMode, SignalSender,
};
use crate::sync::Frame;

/// Deterministic uuid for tests.
pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Sink that keeps every record in memory.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// True if any record at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.level == level)
            .count()
    }
}

impl LogSink for MemorySink {
    fn log(&self, record: LogRecord) {
        self.records.lock().unwrap().push(record);
    }
}

/// Clock that records requested delays.
///
/// An instant clock yields once and completes; a stalled clock never
/// completes, which parks the caller in its delay.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
    stalled: bool,
}

impl RecordingClock {
    pub fn instant() -> Self {
        RecordingClock::default()
    }

    pub fn stalled() -> Self {
        RecordingClock {
            sleeps: Mutex::new(Vec::new()),
            stalled: true,
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.sleeps.lock().unwrap().push(duration);
        let stalled = self.stalled;
        Box::pin(async move {
            if stalled {
                std::future::pending::<()>().await;
            }
            tokio::task::yield_now().await;
        })
    }
}

/// Ids 0xA1, 0xA2, ... in allocation order.
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// The id returned by the `n`th call, counting from 1.
    pub fn nth(n: u64) -> Uuid {
        Uuid::from_u128(0xA0 + u128::from(n))
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        SequentialIds::nth(n)
    }
}

/// Request client that replays scripted responses and records requests.
///
/// Once the script is exhausted every request fails with a network error.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<RequestResult<Vec<u8>>>>,
    requests: Mutex<Vec<(HttpRequest, SessionMode)>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: RequestResult<Vec<u8>>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn respond_json<T: serde::Serialize>(&self, value: &T) -> &Self {
        self.respond(Ok(serde_json::to_vec(value).unwrap()))
    }

    pub fn fail(&self, error: RequestError) -> &Self {
        self.respond(Err(error))
    }

    pub fn requests(&self) -> Vec<(HttpRequest, SessionMode)> {
        self.requests.lock().unwrap().clone()
    }
}

impl DataRequestClient for MockHttpClient {
    fn execute<'a>(
        &'a self,
        request: &'a HttpRequest,
        mode: SessionMode,
    ) -> Pin<Box<dyn Future<Output = RequestResult<Vec<u8>>> + Send + 'a>> {
        self.requests.lock().unwrap().push((request.clone(), mode));
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Network("no scripted response".into())));
        Box::pin(async move { response })
    }
}

/// Context with a recording clock, sequential ids and the given signals.
pub fn test_context(
    sink: Arc<MemorySink>,
    clock: Arc<RecordingClock>,
    signals: SignalSender,
) -> RequestContext {
    RequestContext::new(sink)
        .with_clock(clock)
        .with_ids(Arc::new(SequentialIds::default()))
        .with_signals(signals)
        .with_policy(RetryPolicy::default())
}

pub fn round(n: u128, description: &str) -> Round {
    Round::new(id(n), description)
}

pub fn snapshot(most_recent: u128, round: Round) -> Snapshot {
    Snapshot {
        most_recent_message_id: id(most_recent),
        current_round: round,
    }
}

/// Envelope `n` chained onto `prev`, carrying a new question.
pub fn chained(n: u128, prev: u128) -> Envelope {
    Envelope::chained(
        id(n),
        id(prev),
        Event::NewQuestion(Question::new(id(1000 + n), format!("question {n}"))),
    )
}

/// Wraps an envelope in an event notification frame.
pub fn event_frame(envelope: Envelope) -> Frame {
    Frame::Text(RequestMessage::event(envelope).to_json().unwrap())
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
