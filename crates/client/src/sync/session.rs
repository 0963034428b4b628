// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The receive side of one stream connection.
//!
//! A [`ContinuitySession`] decodes frames, checks each envelope against the
//! hash chain and forwards validated events to a [`Dispatcher`]. A gap
//! starts a resync. While the resync is pending, chained envelopes are held
//! and replayed once the snapshot has been dispatched.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use trivia_core::{Envelope, IncomingMessage, Snapshot, StreamMessage};

use super::continuity::{ContinuityTracker, Verdict};
use super::resync::{ResyncCoordinator, ResyncRequest};
use super::transport::Frame;
use crate::dispatch::Dispatcher;
use crate::logging::{LogSink, Logger};
use crate::request::RetryError;

pub const CATEGORY: &str = "Continuity";

pub const DEFAULT_MAX_HELD: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fetch a snapshot before the first frame is validated.
    pub resync_on_start: bool,
    /// Envelopes held while a resync is pending; the oldest is dropped first.
    pub max_held: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            resync_on_start: true,
            max_held: DEFAULT_MAX_HELD,
        }
    }
}

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Chained envelopes applied, including replays.
    pub applied: u64,
    /// Envelopes without ordering metadata.
    pub exempt: u64,
    /// Gaps detected.
    pub gaps: u64,
    /// Frames that failed to decode or carried no envelope.
    pub dropped_frames: u64,
    /// Held envelopes applied after a snapshot.
    pub replayed: u64,
    /// Held envelopes dropped as stale, overflowed or abandoned.
    pub discarded: u64,
}

pub struct ContinuitySession<D> {
    tracker: ContinuityTracker,
    resync: ResyncCoordinator,
    dispatcher: D,
    held: VecDeque<Envelope>,
    config: SessionConfig,
    stats: SessionStats,
    logger: Logger,
    cancel_token: CancellationToken,
}

impl<D: Dispatcher> ContinuitySession<D> {
    pub fn new(
        resync: ResyncCoordinator,
        dispatcher: D,
        config: SessionConfig,
        sink: Arc<dyn LogSink>,
        cancel_token: CancellationToken,
    ) -> Self {
        ContinuitySession {
            tracker: ContinuityTracker::new(),
            resync,
            dispatcher,
            held: VecDeque::new(),
            config,
            stats: SessionStats::default(),
            logger: Logger::new(CATEGORY, sink),
            cancel_token,
        }
    }

    /// Continues an existing chain instead of starting empty.
    pub fn with_tracker(mut self, tracker: ContinuityTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &ContinuityTracker {
        &self.tracker
    }

    pub fn resync(&self) -> &ResyncCoordinator {
        &self.resync
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn held(&self) -> usize {
        self.held.len()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Waits for the pending resync and applies its outcome.
    pub async fn settle_resync(&mut self) {
        let outcome = self.resync.completion().await;
        self.finish_resync(outcome);
    }

    /// Processes frames until cancelled or the frame channel closes.
    ///
    /// A finished resync is handled before the next frame, so its snapshot
    /// always reaches the dispatcher ahead of envelopes validated after it.
    pub async fn run(mut self, mut frames: mpsc::Receiver<Frame>) -> Self {
        if self.config.resync_on_start {
            self.request_resync();
        }

        loop {
            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                outcome = self.resync.completion() => self.finish_resync(outcome),
                frame = frames.recv() => match frame {
                    Some(frame) => self.handle_frame(&frame),
                    None => break,
                },
            }
        }

        self.logger.debug(format!("session ended: {:?}", self.stats));
        self
    }

    /// Decodes one frame and routes its content.
    pub fn handle_frame(&mut self, frame: &Frame) {
        let message = match StreamMessage::from_slice(frame.payload()) {
            Ok(message) => message,
            Err(e) => {
                self.stats.dropped_frames += 1;
                self.logger.warn(format!("dropping undecodable frame: {e}"));
                return;
            }
        };

        match message {
            IncomingMessage::Request(request) => match request.params {
                Some(envelope) => self.handle_envelope(envelope),
                None => {
                    self.stats.dropped_frames += 1;
                    self.logger
                        .warn(format!("dropping '{}' notification without envelope", request.method));
                }
            },
            IncomingMessage::Response(response) => match response.error() {
                Some(error) => self
                    .logger
                    .warn(format!("request {} failed: {error}", response.id)),
                None => self.logger.debug(format!("response for request {}", response.id)),
            },
        }
    }

    /// Applies, holds or rejects one envelope according to the chain.
    pub fn handle_envelope(&mut self, envelope: Envelope) {
        if envelope.is_unordered() {
            self.stats.exempt += 1;
            self.dispatcher.apply(envelope.content);
            return;
        }

        if self.resync.is_pending() {
            if self.breaks_held_chain(&envelope) {
                self.stats.gaps += 1;
                self.request_resync();
            }
            self.hold(envelope);
            return;
        }

        match self.tracker.observe(&envelope.metadata) {
            Verdict::InOrder | Verdict::Exempt => {
                self.stats.applied += 1;
                self.dispatcher.apply(envelope.content);
            }
            Verdict::Gap { expected, found } => {
                self.stats.gaps += 1;
                self.logger.info(format!(
                    "gap before {}: expected predecessor {}, found {found}",
                    envelope.metadata.message_id,
                    expected.map_or_else(|| "none".to_string(), |id| id.to_string()),
                ));
                self.hold(envelope);
                self.request_resync();
            }
        }
    }

    /// Applies a finished resync: snapshot first, then held envelopes.
    pub fn finish_resync(&mut self, outcome: Result<Snapshot, RetryError>) {
        match outcome {
            Ok(snapshot) => {
                self.tracker.rebaseline(snapshot.most_recent_message_id);
                self.logger.info(format!(
                    "resynchronized at {}",
                    snapshot.most_recent_message_id
                ));
                self.dispatcher.replace(snapshot);
                self.replay_held();
            }
            Err(RetryError::Cancelled) => {
                self.discard_held();
            }
            Err(e) => {
                self.logger.error(&e);
                self.discard_held();
            }
        }
    }

    fn replay_held(&mut self) {
        let mut held = std::mem::take(&mut self.held).into_iter();
        let mut chained = false;

        while let Some(envelope) = held.next() {
            match self.tracker.observe(&envelope.metadata) {
                Verdict::InOrder | Verdict::Exempt => {
                    chained = true;
                    self.stats.applied += 1;
                    self.stats.replayed += 1;
                    self.dispatcher.apply(envelope.content);
                }
                Verdict::Gap { .. } if !chained => {
                    // Predates the snapshot.
                    self.stats.discarded += 1;
                }
                Verdict::Gap { .. } => {
                    self.stats.gaps += 1;
                    self.held.push_back(envelope);
                    self.held.extend(held.by_ref());
                    self.request_resync();
                    return;
                }
            }
        }
    }

    /// True if `envelope` does not follow the newest held envelope, or the
    /// last applied message when nothing is held.
    fn breaks_held_chain(&self, envelope: &Envelope) -> bool {
        let predecessor = self
            .held
            .back()
            .map(Envelope::message_id)
            .or_else(|| self.tracker.last_seen());
        predecessor.is_some() && envelope.prev_message_id() != predecessor
    }

    fn hold(&mut self, envelope: Envelope) {
        if self.held.len() >= self.config.max_held.max(1) {
            self.held.pop_front();
            self.stats.discarded += 1;
        }
        self.held.push_back(envelope);
    }

    fn discard_held(&mut self) {
        let dropped = self.held.len();
        if dropped > 0 {
            self.logger
                .warn(format!("discarding {dropped} held envelopes after failed resync"));
        }
        self.stats.discarded += dropped as u64;
        self.held.clear();
    }

    fn request_resync(&mut self) {
        match self.resync.request() {
            ResyncRequest::Started => self.logger.debug("resync started"),
            ResyncRequest::Coalesced => self.logger.debug("resync coalesced"),
        }
    }
}
