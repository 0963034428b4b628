// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hash-chain continuity tracking.
//!
//! Every ordered envelope names the message it follows. An envelope is
//! in order when that predecessor is the last message applied; anything
//! else is a gap. Envelopes without a predecessor are exempt: they are
//! applied but never move the chain.

use trivia_core::Metadata;
use uuid::Uuid;

/// Outcome of checking one envelope against the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No predecessor; apply without touching the chain.
    Exempt,
    /// Follows the last applied message.
    InOrder,
    /// Predecessor is not the last applied message.
    Gap { expected: Option<Uuid>, found: Uuid },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuityTracker {
    last_seen: Option<Uuid>,
}

impl ContinuityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_seen(last_seen: Uuid) -> Self {
        ContinuityTracker {
            last_seen: Some(last_seen),
        }
    }

    /// Id of the last in-order message, if any.
    pub fn last_seen(&self) -> Option<Uuid> {
        self.last_seen
    }

    /// Classifies `metadata` without changing the tracker.
    pub fn check(&self, metadata: &Metadata) -> Verdict {
        match metadata.prev_message_id {
            None => Verdict::Exempt,
            Some(prev) if Some(prev) == self.last_seen => Verdict::InOrder,
            Some(prev) => Verdict::Gap {
                expected: self.last_seen,
                found: prev,
            },
        }
    }

    /// Classifies `metadata` and advances the chain if it is in order.
    pub fn observe(&mut self, metadata: &Metadata) -> Verdict {
        let verdict = self.check(metadata);
        if verdict == Verdict::InOrder {
            self.last_seen = Some(metadata.message_id);
        }
        verdict
    }

    /// Restarts the chain at a snapshot's most recent message.
    pub fn rebaseline(&mut self, message_id: Uuid) {
        self.last_seen = Some(message_id);
    }
}
