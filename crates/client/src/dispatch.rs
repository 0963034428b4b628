// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of validated events and snapshots to application state.

use std::sync::Arc;

use tokio::sync::mpsc;
use trivia_core::{Event, Round, Snapshot};

use crate::logging::{LogSink, Logger};

pub const CATEGORY: &str = "TriviaState";

/// Receives events in validation order and full-state replacements.
pub trait Dispatcher: Send {
    fn apply(&mut self, event: Event);
    fn replace(&mut self, snapshot: Snapshot);
}

/// Message forwarded by a channel dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Event(Event),
    Snapshot(Snapshot),
}

impl Dispatcher for mpsc::UnboundedSender<Dispatch> {
    fn apply(&mut self, event: Event) {
        let _ = self.send(Dispatch::Event(event));
    }

    fn replace(&mut self, snapshot: Snapshot) {
        let _ = self.send(Dispatch::Snapshot(snapshot));
    }
}

/// The current round as seen by the client.
#[derive(Debug)]
pub struct TriviaState {
    round: Option<Round>,
    logger: Logger,
}

impl TriviaState {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        TriviaState {
            round: None,
            logger: Logger::new(CATEGORY, sink),
        }
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }
}

impl Dispatcher for TriviaState {
    fn apply(&mut self, event: Event) {
        let kind = event.kind();
        match event {
            Event::NewRound(round) => {
                self.logger.debug(format!("round {} started", round.id));
                self.round = Some(round);
            }
            Event::NewQuestion(question) | Event::NewAnswer(question) => match &mut self.round {
                Some(round) => {
                    round.questions.upsert(question);
                }
                None => self.logger.warn(format!(
                    "ignoring {kind} for question {}: no round loaded",
                    question.id
                )),
            },
        }
    }

    fn replace(&mut self, snapshot: Snapshot) {
        self.round = Some(snapshot.current_round);
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
