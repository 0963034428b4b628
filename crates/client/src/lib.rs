// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! trivia-client: keeps a local view of a live trivia event stream
//! consistent with the server.
//!
//! # Main Components
//!
//! - [`TriviaClient`] - wires configuration, HTTP and the event stream
//! - [`sync`] - socket lifecycle, hash-chain continuity and resync
//! - [`request`] - retrying HTTP data sources with error signals
//! - [`TriviaState`] - the default [`Dispatcher`] holding the current round
//! - [`ClientConfig`] - TOML configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use trivia_client::{ClientConfig, TracingSink, TriviaClient, TriviaState};
//! use trivia_client::request::SignalSender;
//! use trivia_client::sync::WebSocketTransport;
//!
//! let sink = Arc::new(TracingSink);
//! let client = TriviaClient::new(ClientConfig::default(), sink.clone(), SignalSender::disabled())?;
//! client.register("Night Owls").await?;
//! let state = client.watch(TriviaState::new(sink), WebSocketTransport::new()).await?;
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod logging;
pub mod registration;
pub mod request;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use client::TriviaClient;
pub use config::ClientConfig;
pub use dispatch::{Dispatch, Dispatcher, TriviaState};
pub use error::{Error, Result};
pub use logging::{LogSink, Logger, TracingSink};
pub use registration::Registration;
