// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background connection management for the event stream.
//!
//! The [`ConnectionManager`] owns the socket in a background task. Received
//! frames are forwarded through a channel; outgoing frames go through a
//! second channel so callers never touch the transport directly. A lost
//! connection is retried after a fixed delay until the manager is
//! cancelled.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use trivia_core::RequestMessage;

use super::transport::{Frame, Transport};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::logging::{LogSink, Logger};

/// Log category for connection lifecycle.
pub const CATEGORY: &str = "ConnectionManager";

pub const DEFAULT_STREAM_URL: &str = "ws://localhost:8080/stream";
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle phase of the managed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Idle,
    Connecting,
    Open,
    Closed,
    Cancelled,
}

/// Inputs that move a connection between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    Connected,
    ConnectFailed,
    Disconnected,
    DelayElapsed,
    Cancel,
}

impl ConnectionPhase {
    /// Phase after `event`. Events that do not apply leave the phase as is;
    /// cancellation is terminal.
    pub fn next(self, event: PhaseEvent) -> Self {
        use ConnectionPhase::*;
        match (self, event) {
            (Cancelled, _) | (_, PhaseEvent::Cancel) => Cancelled,
            (Idle, PhaseEvent::Start) | (Closed, PhaseEvent::DelayElapsed) => Connecting,
            (Connecting, PhaseEvent::Connected) => Open,
            (Connecting, PhaseEvent::ConnectFailed) | (Open, PhaseEvent::Disconnected) => Closed,
            (phase, _) => phase,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ConnectionPhase::Idle => 0,
            ConnectionPhase::Connecting => 1,
            ConnectionPhase::Open => 2,
            ConnectionPhase::Closed => 3,
            ConnectionPhase::Cancelled => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionPhase::Connecting,
            2 => ConnectionPhase::Open,
            3 => ConnectionPhase::Closed,
            4 => ConnectionPhase::Cancelled,
            _ => ConnectionPhase::Idle,
        }
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionPhase::Idle => "idle",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Open => "open",
            ConnectionPhase::Closed => "closed",
            ConnectionPhase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Connection state visible to both the background task and callers.
///
/// Uses atomic fields for lock-free reads.
pub struct SharedConnectionState {
    phase: AtomicU8,
    /// Attempts since the last successful connect.
    attempt: AtomicU32,
    /// Successful connects over the manager's lifetime.
    sessions: AtomicU32,
}

impl SharedConnectionState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(ConnectionPhase::Idle.as_u8()),
            attempt: AtomicU32::new(0),
            sessions: AtomicU32::new(0),
        }
    }

    pub fn get(&self) -> ConnectionPhase {
        ConnectionPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub fn set(&self, phase: ConnectionPhase) {
        self.phase.store(phase.as_u8(), Ordering::Release);
    }

    pub fn attempt(&self) -> u32 {
        self.attempt.load(Ordering::Acquire)
    }

    pub(super) fn begin_attempt(&self) -> u32 {
        self.attempt.fetch_add(1, Ordering::AcqRel).saturating_add(1)
    }

    pub(super) fn connected(&self) {
        self.attempt.store(0, Ordering::Release);
        self.sessions.fetch_add(1, Ordering::AcqRel);
    }

    pub fn sessions(&self) -> u32 {
        self.sessions.load(Ordering::Acquire)
    }

    pub fn is_open(&self) -> bool {
        self.get() == ConnectionPhase::Open
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> String {
        match self.get() {
            ConnectionPhase::Connecting => {
                let attempt = self.attempt();
                if attempt > 1 {
                    format!("connecting (attempt {})", attempt)
                } else {
                    "connecting".to_string()
                }
            }
            phase => phase.to_string(),
        }
    }
}

impl Default for SharedConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the connection manager.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// URL to connect to.
    pub url: String,
    /// Fixed delay between losing a connection and the next attempt.
    pub reconnect_delay: Duration,
    /// Capacity of the received frame channel.
    pub frame_buffer: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STREAM_URL.to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            frame_buffer: 64,
        }
    }
}

/// Manages the background connection task.
pub struct ConnectionManager<T> {
    config: ConnectionConfig,
    transport: Option<T>,
    shared_state: Arc<SharedConnectionState>,
    clock: Arc<dyn Clock>,
    logger: Logger,
    cancel_token: CancellationToken,
    outgoing_tx: mpsc::Sender<Frame>,
    outgoing_rx: Option<mpsc::Receiver<Frame>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Transport + 'static> ConnectionManager<T> {
    pub fn new(
        config: ConnectionConfig,
        transport: T,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn LogSink>,
        cancel_token: CancellationToken,
    ) -> Self {
        let (outgoing_tx, outgoing_rx) = mpsc::channel(config.frame_buffer.max(1));
        Self {
            config,
            transport: Some(transport),
            shared_state: Arc::new(SharedConnectionState::new()),
            clock,
            logger: Logger::new(CATEGORY, sink),
            cancel_token,
            outgoing_tx,
            outgoing_rx: Some(outgoing_rx),
            task: None,
        }
    }

    pub fn shared_state(&self) -> Arc<SharedConnectionState> {
        Arc::clone(&self.shared_state)
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.shared_state.get()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Starts the background connection task.
    ///
    /// Returns the receiver of incoming frames on the first call and `None`
    /// afterwards; a started manager keeps its single connection.
    pub fn start(&mut self) -> Option<mpsc::Receiver<Frame>> {
        let transport = self.transport.take()?;
        let outgoing = self.outgoing_rx.take()?;
        let (frames_tx, frames_rx) = mpsc::channel(self.config.frame_buffer.max(1));

        let task = ConnectionTask {
            url: self.config.url.clone(),
            reconnect_delay: self.config.reconnect_delay,
            shared_state: Arc::clone(&self.shared_state),
            clock: Arc::clone(&self.clock),
            logger: self.logger.clone(),
            cancel_token: self.cancel_token.clone(),
            frames: frames_tx,
            outgoing,
        };
        self.task = Some(tokio::spawn(task.run(transport)));
        Some(frames_rx)
    }

    /// Queues a frame for the open connection.
    pub fn send(&self, frame: Frame) -> Result<()> {
        if !self.shared_state.is_open() {
            return Err(Error::NotConnected);
        }
        self.outgoing_tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => Error::SendFailed("outgoing queue is full".to_string()),
            TrySendError::Closed(_) => Error::NotConnected,
        })
    }

    /// Encodes a JSON-RPC request and queues it as a text frame.
    pub fn send_message<P: Serialize>(&self, message: &RequestMessage<P>) -> Result<()> {
        let json = message
            .to_json()
            .map_err(|e| Error::Decode(trivia_core::Error::Json(e)))?;
        self.send(Frame::Text(json))
    }

    /// Cancel the connection and any pending reconnect.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Cancels the connection and waits for the background task to finish.
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// How a receive loop ended.
enum LoopExit {
    /// The connection dropped; reconnect after the delay.
    Closed,
    /// Cancelled, or nobody is listening for frames any more.
    Stopped,
}

/// State owned by the background task.
struct ConnectionTask {
    url: String,
    reconnect_delay: Duration,
    shared_state: Arc<SharedConnectionState>,
    clock: Arc<dyn Clock>,
    logger: Logger,
    cancel_token: CancellationToken,
    frames: mpsc::Sender<Frame>,
    outgoing: mpsc::Receiver<Frame>,
}

impl ConnectionTask {
    async fn run<T: Transport>(mut self, mut transport: T) {
        let mut phase = self.advance(ConnectionPhase::Idle, PhaseEvent::Start);

        loop {
            let attempt = self.shared_state.begin_attempt();
            self.logger
                .debug(format!("connecting to {} (attempt {})", self.url, attempt));

            let connect_result = tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                result = transport.connect(&self.url) => result,
            };

            match connect_result {
                Ok(()) => {
                    self.discard_unsent();
                    phase = self.advance(phase, PhaseEvent::Connected);
                    self.shared_state.connected();
                    self.logger.info(format!("connected to {}", self.url));

                    match self.receive_loop(&mut transport).await {
                        LoopExit::Stopped => break,
                        LoopExit::Closed => {
                            let _ = transport.disconnect().await;
                            phase = self.advance(phase, PhaseEvent::Disconnected);
                            self.discard_unsent();
                        }
                    }
                }
                Err(e) => {
                    self.logger.error(&e);
                    phase = self.advance(phase, PhaseEvent::ConnectFailed);
                }
            }

            self.logger.debug(format!(
                "reconnecting in {}ms",
                self.reconnect_delay.as_millis()
            ));
            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                _ = self.clock.sleep(self.reconnect_delay) => {}
            }
            phase = self.advance(phase, PhaseEvent::DelayElapsed);
        }

        let _ = transport.disconnect().await;
        self.advance(phase, PhaseEvent::Cancel);
        self.logger.info("connection stopped");
    }

    async fn receive_loop<T: Transport>(&mut self, transport: &mut T) -> LoopExit {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => return LoopExit::Stopped,
                Some(frame) = self.outgoing.recv() => {
                    if let Err(e) = transport.send(frame).await {
                        self.logger.error(&Error::SendFailed(e.to_string()));
                    }
                }
                received = transport.recv() => match received {
                    Ok(Some(frame)) => {
                        if self.frames.send(frame).await.is_err() {
                            self.logger.info("frame receiver dropped");
                            return LoopExit::Stopped;
                        }
                    }
                    Ok(None) => {
                        self.logger.info("connection closed by server");
                        return LoopExit::Closed;
                    }
                    Err(e) => {
                        self.logger.warn(format!("connection lost: {e}"));
                        return LoopExit::Closed;
                    }
                },
            }
        }
    }

    /// Drops frames queued for a connection that is gone. They are never
    /// sent on a later connection.
    fn discard_unsent(&mut self) {
        while let Ok(frame) = self.outgoing.try_recv() {
            self.logger.error(&Error::SendFailed(format!(
                "connection closed before {} byte frame was sent",
                frame.payload().len()
            )));
        }
    }

    fn advance(&self, phase: ConnectionPhase, event: PhaseEvent) -> ConnectionPhase {
        let next = phase.next(event);
        self.shared_state.set(next);
        next
    }
}
