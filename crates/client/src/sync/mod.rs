// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live event stream synchronization.
//!
//! Keeps the client's view of the trivia stream consistent with the server
//! over a socket that can drop messages or close at any time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Transport   │────►│  Connection  │────►│  Continuity  │────► Dispatcher
//! │   (trait)    │◄────│   Manager    │     │   Session    │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                                                  │ gap
//!                                                  ▼
//!                                           ┌──────────────┐
//!                                           │    Resync    │  (snapshot fetch)
//!                                           │ Coordinator  │
//!                                           └──────────────┘
//! ```
//!
//! # Features
//!
//! - WebSocket connection with bearer auth and a fixed reconnect delay
//! - Hash-chain gap detection on every ordered envelope
//! - Coalesced snapshot resync, with held envelopes replayed after it
//! - Injectable transport trait for testing

mod connection;
mod continuity;
mod resync;
mod session;
mod transport;

pub use connection::{
    ConnectionConfig, ConnectionManager, ConnectionPhase, PhaseEvent, SharedConnectionState,
    DEFAULT_RECONNECT_DELAY, DEFAULT_STREAM_URL,
};
pub use continuity::{ContinuityTracker, Verdict};
pub use resync::{ResyncCoordinator, ResyncRequest};
pub use session::{ContinuitySession, SessionConfig, SessionStats, DEFAULT_MAX_HELD};
pub use transport::{
    EnvToken, Frame, StaticToken, TokenProvider, Transport, TransportError, TransportResult,
    WebSocketTransport,
};

#[cfg(test)]
pub(crate) mod transport_tests;
